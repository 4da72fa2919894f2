use crate::apisports::{ApiFixtureEntry, ApiTeam, Envelope, FixturesResponse, RoundsResponse};
use crate::{Fixture, Snapshot, Team};
use chrono::{DateTime, Datelike, Utc};
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const API_SPORTS_V3: &str = "https://v3.football.api-sports.io";
const API_KEY_HEADER: &str = "x-apisports-key";

/// Football fixtures client backed by the API-Sports v3 endpoints.
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    /// Local fixtures document to read instead of the network.
    snapshot_file: Option<PathBuf>,
    timeout: Duration,
}

impl Default for FootballApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("cuptui/0.1 (terminal bracket viewer)")
                .build()
                .unwrap_or_default(),
            base_url: API_SPORTS_V3.to_owned(),
            api_key: None,
            snapshot_file: None,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl FootballApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_snapshot_file(mut self, path: Option<PathBuf>) -> Self {
        self.snapshot_file = path;
        self
    }

    /// Fetch every fixture of one league season plus its round labels.
    ///
    /// A configured snapshot file wins over the network. When the rounds endpoint
    /// returns nothing, labels are derived from the fixtures themselves.
    pub async fn fetch_snapshot(&self, league: u32, season: u16) -> ApiResult<Snapshot> {
        if let Some(path) = &self.snapshot_file {
            return load_snapshot_file(path);
        }

        let rounds_url = format!("{}/fixtures/rounds?league={league}&season={season}", self.base_url);
        let rounds: RoundsResponse = self.get(&rounds_url).await?;
        reject_api_errors(&rounds)?;

        let fixtures_url = format!("{}/fixtures?league={league}&season={season}", self.base_url);
        let fixtures: FixturesResponse = self.get(&fixtures_url).await?;
        reject_api_errors(&fixtures)?;

        Ok(build_snapshot(&fixtures.response, rounds.response))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// Read an API-Sports `/fixtures` document from disk.
pub fn load_snapshot_file(path: &Path) -> ApiResult<Snapshot> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
    parse_fixtures_document(&content)
        .map_err(|e| ApiError::Other(format!("invalid fixtures json at {}: {e}", path.display())))
}

/// Parse a `/fixtures` response body; round labels come from the fixtures.
pub fn parse_fixtures_document(json: &str) -> Result<Snapshot, serde_json::Error> {
    let raw: FixturesResponse = serde_json::from_str(json)?;
    Ok(build_snapshot(&raw.response, Vec::new()))
}

/// Season year API-Sports expects: European seasons start in July, so
/// February 2026 belongs to season 2025.
pub fn season_year(now: DateTime<Utc>) -> u16 {
    let year = if now.month() >= 7 { now.year() } else { now.year() - 1 };
    u16::try_from(year).unwrap_or_default()
}

fn reject_api_errors<T>(envelope: &Envelope<T>) -> ApiResult<()> {
    match envelope.error_message() {
        Some(msg) => Err(ApiError::Other(msg)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Mapping: API-Sports wire types → clean domain types
// ---------------------------------------------------------------------------

fn build_snapshot(entries: &[ApiFixtureEntry], round_labels: Vec<String>) -> Snapshot {
    let fixtures: Vec<Fixture> = entries.iter().filter_map(map_fixture).collect();
    if round_labels.is_empty() {
        Snapshot::from_fixtures(fixtures)
    } else {
        Snapshot { fixtures, round_labels }
    }
}

/// None when either side has no team yet; such a fixture cannot be grouped.
fn map_fixture(entry: &ApiFixtureEntry) -> Option<Fixture> {
    let home = entry.teams.home.as_ref().and_then(map_team)?;
    let away = entry.teams.away.as_ref().and_then(map_team)?;

    let kickoff = entry
        .fixture
        .date
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Some(Fixture {
        id: entry.fixture.id,
        round: entry.league.round.clone().unwrap_or_default(),
        home,
        away,
        home_goals: entry.goals.home,
        away_goals: entry.goals.away,
        kickoff,
    })
}

fn map_team(t: &ApiTeam) -> Option<Team> {
    let id = t.id.filter(|&id| id != 0)?;
    Some(Team {
        id,
        name: t.name.clone().unwrap_or_else(|| format!("Team {id}")),
        logo: t.logo.clone().unwrap_or_default(),
    })
}
