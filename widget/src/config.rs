//! Host configuration read from the environment at startup.

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use quicknote_core::DEFAULT_API_BASE;

pub const API_BASE_VAR: &str = "QUICKNOTE_API_BASE";
pub const SETTINGS_PATH_VAR: &str = "QUICKNOTE_SETTINGS";
pub const LOG_LEVEL_VAR: &str = "QUICKNOTE_LOG";

const DEFAULT_SETTINGS_PATH: &str = "./quicknote-settings.json";
const DEFAULT_LOG_PATH: &str = "./quicknote.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub api_base: String,
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: LevelFilter,
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            api_base: get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            settings_path: get(SETTINGS_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH)),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            log_level: get(LOG_LEVEL_VAR)
                .and_then(|level| LevelFilter::from_str(level.trim()).ok())
                .unwrap_or(LevelFilter::Info),
        }
    }
}
