use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "DOALIST_DATA_DIR";
pub const LOG_SPEC_ENV: &str = "DOALIST_LOG";
pub const DEFAULT_DATA_DIR: &str = ".doalist";

/// Process-level settings that live outside the persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    /// Explicit log spec; `None` falls back to `RUST_LOG` and then the built-in default.
    pub log_spec: Option<String>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let data_dir = read(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let log_spec = read(LOG_SPEC_ENV).or_else(|| read("RUST_LOG"));
        Self { data_dir, log_spec }
    }
}
