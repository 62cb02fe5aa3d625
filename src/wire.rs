//! Backend request and response bodies

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Response of `GET /meta/{session}`
#[derive(Debug, Deserialize)]
pub struct MetaResponse {
    #[serde(default)]
    pub title: Option<String>,
}

/// One entry of `GET /memory/{session}`.
///
/// `role` stays a free-form string here; the history loader filters it.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Body of `POST /chat`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
}

/// Response of `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
    /// Shape returned by backends that echo both turns instead of `reply`
    #[serde(default)]
    pub ai_message: Option<EchoedMessage>,
}

#[derive(Debug, Deserialize)]
pub struct EchoedMessage {
    pub content: String,
}

impl ChatResponse {
    pub fn into_reply(self) -> Option<String> {
        self.reply.or_else(|| self.ai_message.map(|m| m.content))
    }
}

/// Entry of `GET /sessions`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Response of `POST /sessions`
#[derive(Debug, Deserialize)]
pub struct CreateSessionResponse {
    pub id: String,
}

/// Accept RFC 3339 timestamps, and offset-less ISO timestamps as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
}
