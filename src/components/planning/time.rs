use super::models::PlanningEvent;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Closed interval covering one local calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Window from 00:00:00.000 to 23:59:59.999 of `date` in `tz`
    pub fn for_date(date: NaiveDate, tz: Tz) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        let end = start + Duration::days(1) - Duration::milliseconds(1);

        Self {
            start: localize(&start, tz),
            end: localize(&end, tz),
        }
    }

    /// Both ends inclusive
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }

    /// Events starting inside the window, in their original order
    pub fn filter(&self, events: Vec<PlanningEvent>) -> Vec<PlanningEvent> {
        events
            .into_iter()
            .filter(|event| self.contains(&event.start))
            .collect()
    }
}

/// Resolve a wall-clock time in `tz` to an instant.
///
/// A DST fold takes the earlier instant; a DST gap is read as UTC.
pub fn localize(naive: &NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(naive),
    }
}

/// Current local date in `tz`
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// `count` consecutive dates starting at `first`
pub fn consecutive_days(first: NaiveDate, count: usize) -> Vec<NaiveDate> {
    first.iter_days().take(count).collect()
}

/// Date as shown to users (`dd/mm/YYYY`)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Time of day in `tz` as shown to users (`HH:MM`)
pub fn format_time(instant: &DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Paris;

    fn event_at(start: DateTime<Utc>) -> PlanningEvent {
        PlanningEvent {
            title: None,
            start,
            end: start,
            location: None,
            description: None,
        }
    }

    #[test]
    fn test_window_bounds_in_local_time() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let window = DayWindow::for_date(date, Paris);

        // Paris is UTC+1 in January
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 1, 14, 23, 0, 0).unwrap());
        assert_eq!(
            window.end,
            Utc.with_ymd_and_hms(2024, 1, 15, 22, 59, 59).unwrap() + Duration::milliseconds(999)
        );
    }

    #[test]
    fn test_window_is_closed_on_both_ends() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let window = DayWindow::for_date(date, chrono_tz::UTC);

        assert!(window.contains(&window.start));
        assert!(window.contains(&window.end));
        assert!(!window.contains(&(window.start - Duration::milliseconds(1))));
        assert!(!window.contains(&(window.end + Duration::milliseconds(1))));
    }

    #[test]
    fn test_filter_keeps_feed_order() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let window = DayWindow::for_date(date, chrono_tz::UTC);

        let late = event_at(Utc.with_ymd_and_hms(2024, 6, 3, 16, 0, 0).unwrap());
        let other_day = event_at(Utc.with_ymd_and_hms(2024, 6, 4, 0, 0, 0).unwrap());
        let early = event_at(Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap());

        let kept = window.filter(vec![late.clone(), other_day, early.clone()]);
        assert_eq!(kept, vec![late, early]);
    }

    #[test]
    fn test_localize_dst_gap_and_fold() {
        // 02:30 does not exist in Paris on 2024-03-31
        let gap = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(localize(&gap, Paris), Utc.from_utc_datetime(&gap));

        // 02:30 happens twice on 2024-10-27; the first one is UTC+2
        let fold = NaiveDate::from_ymd_opt(2024, 10, 27)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(
            localize(&fold, Paris),
            Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_consecutive_days_and_formatting() {
        let first = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let days = consecutive_days(first, 5);
        assert_eq!(days.len(), 5);
        assert_eq!(format_date(days[0]), "30/12/2024");
        assert_eq!(format_date(days[2]), "01/01/2025");

        let instant = Utc.with_ymd_and_hms(2024, 7, 1, 6, 5, 0).unwrap();
        assert_eq!(format_time(&instant, Paris), "08:05");
    }
}
