//! Wire types and request validation
//!
//! JSON bodies use camelCase field names. Validation mirrors what the
//! server enforces so the client can skip requests that would be rejected.

use serde::{Deserialize, Serialize};

use super::error::ApiError;

pub const MAX_DEVICE_ID_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 16;
pub const MAX_SCORE: i64 = 999_999;
/// Runs shorter than this are rejected as scripted
pub const MIN_PLAY_MS: i64 = 1500;
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const MAX_LEADERBOARD_LIMIT: usize = 50;

pub const REGISTER_PATH: &str = "register-identity";
pub const SUBMIT_PATH: &str = "submit-score";
pub const LEADERBOARD_PATH: &str = "get-leaderboard";
pub const RANK_PATH: &str = "get-my-ranks";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub device_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub device_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub device_id: String,
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_ms: Option<i64>,
}

/// One leaderboard entry. `created_at` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub name: String,
    pub score: u32,
    pub created_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub scores: Vec<ScoreRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub has_score: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_players: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_score: Option<u32>,
}

/// Body of a non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// First `max` characters, then trimmed
fn truncate_trim(raw: &str, max: usize) -> String {
    let cut: String = raw.chars().take(max).collect();
    cut.trim().to_string()
}

pub fn validate_device_id(raw: &str) -> Result<String, ApiError> {
    let id = truncate_trim(raw, MAX_DEVICE_ID_LEN);
    if id.is_empty() {
        return Err(ApiError::InvalidDeviceId);
    }
    Ok(id)
}

pub fn validate_name(raw: &str) -> Result<String, ApiError> {
    let name = truncate_trim(raw, MAX_NAME_LEN);
    if name.is_empty() {
        return Err(ApiError::InvalidName);
    }
    Ok(name)
}

pub fn validate_score(score: i64) -> Result<u32, ApiError> {
    if !(0..=MAX_SCORE).contains(&score) {
        return Err(ApiError::InvalidScore);
    }
    u32::try_from(score).map_err(|_| ApiError::InvalidScore)
}

pub fn validate_play_ms(play_ms: Option<i64>) -> Result<(), ApiError> {
    match play_ms {
        Some(ms) if ms < MIN_PLAY_MS => Err(ApiError::ImplausiblePlaytime(ms)),
        _ => Ok(()),
    }
}

/// Requested leaderboard size, defaulted and capped. Zero means "unset".
pub fn clamp_limit(limit: Option<usize>) -> usize {
    match limit {
        None | Some(0) => DEFAULT_LEADERBOARD_LIMIT,
        Some(n) => n.min(MAX_LEADERBOARD_LIMIT),
    }
}

impl RegisterRequest {
    /// Normalized copy, or the first validation failure
    pub fn validated(&self) -> Result<Self, ApiError> {
        Ok(Self {
            device_id: validate_device_id(&self.device_id)?,
            name: validate_name(&self.name)?,
        })
    }
}

impl SubmitScoreRequest {
    /// Normalized device id and score
    pub fn validated(&self) -> Result<(String, u32), ApiError> {
        let device_id = validate_device_id(&self.device_id)?;
        let score = validate_score(self.score)?;
        validate_play_ms(self.play_ms)?;
        Ok((device_id, score))
    }
}
