#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevel(pub log::LevelFilter);
impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" | "warning" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" | "none" => log::LevelFilter::Off,
            _ => return Err(format!("Invalid log level: {}", s)),
        };
        Ok(LogLevel(level))
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

/// Set up env_logger on stderr. An explicit level wins over RUST_LOG
pub fn setup_global_logger(log_level: Option<LogLevel>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = log_level {
        builder.filter_level(level.into());
    }
    builder.format_timestamp_secs();

    //Tests and repeated calls may already have a logger installed
    if builder.try_init().is_err() {
        log::debug!("Global logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_levels() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel(log::LevelFilter::Warn)));
        assert_eq!("off".parse::<LogLevel>(), Ok(LogLevel(log::LevelFilter::Off)));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
