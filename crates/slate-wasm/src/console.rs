//! Browser console logging via `console_log`.

use log::LevelFilter;

/// Parse a level name; unknown names fall back to `warn`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Warn)
}

/// Install the console logger once. Later calls only change the level.
pub fn init(level: LevelFilter) {
    if let Some(max) = level.to_level() {
        if console_log::init_with_level(max).is_err() {
            log::debug!("console logger already installed");
        }
    }
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("TRACE"), LevelFilter::Trace);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("loud"), LevelFilter::Warn);
    }
}
