/// API-Sports football v3 raw wire types: serde shapes for deserializing responses.
/// These map to our clean domain types in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Envelope: every endpoint wraps its payload in `response`
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Envelope<T> {
    #[serde(default)]
    pub response: Vec<T>,
    /// Either `[]` or an object of `{ "field": "message" }`.
    #[serde(default)]
    pub errors: serde_json::Value,
    pub results: Option<u32>,
}

impl<T> Envelope<T> {
    /// First error message when the API reports one (bad key, rate limit, ...).
    pub fn error_message(&self) -> Option<String> {
        match &self.errors {
            serde_json::Value::Object(map) => map
                .iter()
                .next()
                .map(|(field, msg)| format!("{field}: {}", msg.as_str().unwrap_or_default())),
            serde_json::Value::Array(items) => items.first().map(|v| v.to_string()),
            _ => None,
        }
    }
}

/// `/fixtures/rounds`: a plain list of round labels.
pub type RoundsResponse = Envelope<String>;

/// `/fixtures`
pub type FixturesResponse = Envelope<ApiFixtureEntry>;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiFixtureEntry {
    pub fixture: ApiFixture,
    #[serde(default)]
    pub league: ApiLeague,
    #[serde(default)]
    pub teams: ApiTeams,
    #[serde(default)]
    pub goals: ApiGoals,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiFixture {
    pub id: u64,
    pub date: Option<String>, // ISO 8601 with offset
    pub status: Option<ApiStatus>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiStatus {
    pub long: Option<String>,
    pub short: Option<String>, // "NS", "1H", "FT", "AET", "PEN", ...
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiLeague {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub season: Option<u16>,
    pub round: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiTeams {
    pub home: Option<ApiTeam>,
    pub away: Option<ApiTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiTeam {
    pub id: Option<u32>, // null for undecided slots
    pub name: Option<String>,
    pub logo: Option<String>,
    pub winner: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiGoals {
    pub home: Option<u32>,
    pub away: Option<u32>,
}
