use std::sync::OnceLock;

use crate::runtime;

///////////////////////////////
/// Global Config Options
pub static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct Config {
    pub error_mode: runtime::ErrorMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            error_mode: runtime::ErrorMode::Skip,
        }
    }
}

impl Config {
    /// Current config. Library callers that never called `init` get the defaults
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::default)
    }

    /// Install the config for this process. Only the first call has an effect
    pub fn init(config: Config) -> &'static Config {
        if CONFIG.set(config).is_err() {
            log::warn!("Config already initialized; keeping the existing one");
        }
        Config::get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_skips_bad_records() {
        assert!(matches!(Config::default().error_mode, runtime::ErrorMode::Skip));
    }
}
