use chrono::Utc;
use cup_api::client::{FootballApi, season_year};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// UEFA Champions League.
pub const DEFAULT_LEAGUE: u32 = 2;
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub league: u32,
    /// Unset means the season running today.
    pub season: Option<u16>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    /// Seconds between snapshot refreshes; 0 disables the refresher.
    pub refresh_secs: u64,
    pub log_level: Option<String>,
    /// Local fixtures document read instead of the network.
    pub fixtures_json: Option<PathBuf>,
    #[serde(skip)]
    pub full_screen: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            league: DEFAULT_LEAGUE,
            season: None,
            api_key: None,
            api_url: None,
            refresh_secs: DEFAULT_REFRESH_SECS,
            log_level: None,
            fixtures_json: None,
            full_screen: false,
        }
    }
}

impl AppSettings {
    /// Config file first, then `CUPTUI_*` environment overrides.
    pub fn load() -> Self {
        let mut settings = config_path()
            .and_then(|path| match std::fs::read_to_string(&path) {
                Ok(raw) => Some((path, raw)),
                Err(_) => None,
            })
            .and_then(|(path, raw)| match serde_json::from_str::<AppSettings>(&raw) {
                Ok(s) => Some(s),
                Err(e) => {
                    eprintln!("ignoring {}: {e}", path.display());
                    None
                }
            })
            .unwrap_or_default();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(league) = var("CUPTUI_LEAGUE").and_then(|v| v.trim().parse().ok()) {
            self.league = league;
        }
        if let Some(season) = var("CUPTUI_SEASON").and_then(|v| v.trim().parse().ok()) {
            self.season = Some(season);
        }
        if let Some(key) = var("CUPTUI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = var("CUPTUI_API_URL") {
            self.api_url = Some(url);
        }
        if let Some(secs) = var("CUPTUI_REFRESH_SECS").and_then(|v| v.trim().parse().ok()) {
            self.refresh_secs = secs;
        }
        if let Some(level) = var("CUPTUI_LOG_LEVEL") {
            self.log_level = Some(level);
        }
        if let Some(path) = var("CUPTUI_FIXTURES_JSON") {
            self.fixtures_json = Some(PathBuf::from(path));
        }
    }

    pub fn season(&self) -> u16 {
        self.season.unwrap_or_else(|| season_year(Utc::now()))
    }

    /// Parsed log level; unknown names fall back to `Error`.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|l| l.trim().parse().ok())
            .unwrap_or(LevelFilter::Error)
    }

    pub fn api(&self) -> FootballApi {
        let mut api = FootballApi::new()
            .with_api_key(self.api_key.clone())
            .with_snapshot_file(self.fixtures_json.clone());
        if let Some(url) = &self.api_url {
            api = api.with_base_url(url.as_str());
        }
        api
    }
}

fn config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("cuptui").join("config.json"))
}
