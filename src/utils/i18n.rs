use crate::config::DEFAULT_LOCALE;
use tracing::warn;

/// Switch the locale used for bot messages.
///
/// Unknown locales fall back to the default one.
pub fn set_locale(locale: &str) {
    let available = available_locales!();
    if available.iter().any(|l| *l == locale) {
        rust_i18n::set_locale(locale);
    } else {
        warn!(
            "Unknown locale '{}', using '{}' (available: {:?})",
            locale, DEFAULT_LOCALE, available
        );
        rust_i18n::set_locale(DEFAULT_LOCALE);
    }
}

/// The locale currently in use
pub fn current_locale() -> String {
    (*rust_i18n::locale()).to_string()
}
