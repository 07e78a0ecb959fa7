use super::time::consecutive_days;
use chrono::NaiveDate;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tracing::debug;

/// Reaction markers offered on the prompt, in display order
pub const MARKERS: [&str; 5] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣"];

/// Number of days offered by the prompt
pub const SELECTION_DAYS: usize = 5;

/// How long the prompt accepts reactions
pub const SELECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// A reaction added to the prompt message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub user_id: u64,
    pub marker: String,
}

/// How a selection session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The issuer picked a date
    Resolved(NaiveDate),
    /// A valid marker had no date behind it
    Invalid,
    /// Nobody picked a date in time
    TimedOut,
}

/// State of one pending date prompt
#[derive(Debug, Clone)]
pub struct SelectionSession {
    candidates: Vec<NaiveDate>,
    issuer: u64,
    timeout: Duration,
}

impl SelectionSession {
    /// Offer `today` and the following days to `issuer`
    pub fn new(today: NaiveDate, issuer: u64) -> Self {
        Self {
            candidates: consecutive_days(today, SELECTION_DAYS),
            issuer,
            timeout: SELECTION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn candidates(&self) -> &[NaiveDate] {
        &self.candidates
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Markers to attach, one per candidate date
    pub fn markers(&self) -> &'static [&'static str] {
        &MARKERS[..self.candidates.len().min(MARKERS.len())]
    }

    /// Marker and date pairs, in prompt order
    pub fn options(&self) -> Vec<(&'static str, NaiveDate)> {
        self.markers()
            .iter()
            .copied()
            .zip(self.candidates.iter().copied())
            .collect()
    }

    /// Whether a reaction may resolve this session
    pub fn accepts(&self, reaction: &ReactionEvent) -> bool {
        reaction.user_id == self.issuer && self.markers().contains(&reaction.marker.as_str())
    }

    /// Date behind a marker, by position
    pub fn resolve(&self, marker: &str) -> Option<NaiveDate> {
        let index = MARKERS.iter().position(|m| *m == marker)?;
        self.candidates.get(index).copied()
    }

    /// Wait for the first qualifying reaction or the timeout, whichever comes first.
    ///
    /// A reaction stream that ends early still waits out the timeout.
    pub async fn wait<S>(self, reactions: S) -> SelectionOutcome
    where
        S: Stream<Item = ReactionEvent> + Unpin,
    {
        let mut reactions = reactions.fuse();
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => return SelectionOutcome::TimedOut,
                next = reactions.next(), if !reactions.is_done() => match next {
                    Some(reaction) if self.accepts(&reaction) => {
                        return match self.resolve(&reaction.marker) {
                            Some(date) => SelectionOutcome::Resolved(date),
                            None => SelectionOutcome::Invalid,
                        };
                    }
                    Some(reaction) => {
                        debug!(
                            "Ignoring reaction {} from user {}",
                            reaction.marker, reaction.user_id
                        );
                    }
                    None => debug!("Reaction stream closed, waiting for timeout"),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 27).unwrap()
    }

    fn reaction(user_id: u64, marker: &str) -> ReactionEvent {
        ReactionEvent {
            user_id,
            marker: marker.to_string(),
        }
    }

    #[test]
    fn test_candidates_are_five_consecutive_days() {
        let session = SelectionSession::new(today(), 1);
        let candidates = session.candidates();

        assert_eq!(candidates.len(), SELECTION_DAYS);
        assert_eq!(candidates[0], today());
        // Crosses the leap day
        assert_eq!(candidates[2], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(candidates[4], NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(session.markers(), &MARKERS[..]);
    }

    #[test]
    fn test_resolve_by_position() {
        let session = SelectionSession::new(today(), 1);
        assert_eq!(session.resolve(MARKERS[2]), Some(today() + chrono::Duration::days(2)));
        assert_eq!(session.resolve("👍"), None);
    }

    #[test]
    fn test_accepts_only_issuer_and_known_markers() {
        let session = SelectionSession::new(today(), 42);
        assert!(session.accepts(&reaction(42, MARKERS[0])));
        assert!(!session.accepts(&reaction(7, MARKERS[0])));
        assert!(!session.accepts(&reaction(42, "👍")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_skips_unqualified_reactions() {
        let session = SelectionSession::new(today(), 42);
        let reactions = stream::iter(vec![
            reaction(7, MARKERS[1]),
            reaction(42, "👍"),
            reaction(42, MARKERS[3]),
        ])
        .chain(stream::pending());

        let outcome = session.wait(reactions).await;
        assert_eq!(
            outcome,
            SelectionOutcome::Resolved(today() + chrono::Duration::days(3))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let session = SelectionSession::new(today(), 42);
        let start = tokio::time::Instant::now();

        let outcome = session
            .wait(stream::iter(vec![reaction(7, MARKERS[0])]).chain(stream::pending()))
            .await;

        assert_eq!(outcome, SelectionOutcome::TimedOut);
        assert!(start.elapsed() >= SELECTION_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_stream_still_waits_for_timeout() {
        let session = SelectionSession::new(today(), 42).with_timeout(Duration::from_secs(5));
        let start = tokio::time::Instant::now();

        let outcome = session.wait(stream::empty()).await;

        assert_eq!(outcome, SelectionOutcome::TimedOut);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
