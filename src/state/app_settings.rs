use log::LevelFilter;
use match_api::client::DEFAULT_BASE_URL;

pub const API_URL_VAR: &str = "LIVESCORE_API_URL";
pub const LOG_LEVEL_VAR: &str = "LIVESCORE_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub api_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Info,
            api_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(url) = lookup(API_URL_VAR).filter(|u| !u.trim().is_empty()) {
            settings.api_url = url.trim().to_string();
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR).and_then(|l| l.trim().parse::<LevelFilter>().ok()) {
            settings.log_level = level;
        }
        settings
    }
}
