//! In-process backend
//!
//! Same rules as the hosted functions: profiles are upserted by device id,
//! scores need a registered device and are stored one row per run, and the
//! leaderboard/rank queries order by score then by who got there first.
//! Used by the native demo and by tests.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::error::ApiError;
use super::protocol::{
    LeaderboardResponse, Profile, RankResponse, RegisterRequest, RegisterResponse, ScoreRow,
    SubmitScoreRequest, SubmitScoreResponse, clamp_limit, validate_device_id,
};

#[derive(Debug, Clone)]
struct StoredScore {
    device_id: String,
    row: ScoreRow,
    /// Insertion order, breaks exact timestamp ties
    seq: u64,
}

/// Per-device best, as the rank query sees it
#[derive(Debug, Clone, Copy)]
struct PlayerBest {
    score: u32,
    first_achieved_at: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    /// device id -> display name
    profiles: HashMap<String, String>,
    scores: Vec<StoredScore>,
    next_seq: u64,
}

/// Higher score first, then earlier
fn leaderboard_order(a: &StoredScore, b: &StoredScore) -> Ordering {
    b.row
        .score
        .cmp(&a.row.score)
        .then(a.row.created_at.total_cmp(&b.row.created_at))
        .then(a.seq.cmp(&b.seq))
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or rename a profile
    pub fn register_identity(
        &mut self,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, ApiError> {
        let RegisterRequest { device_id, name } = request.validated()?;
        self.profiles.insert(device_id.clone(), name.clone());
        log::debug!("Profile {device_id} registered as {name}");
        Ok(RegisterResponse {
            ok: true,
            profile: Some(Profile { device_id, name }),
        })
    }

    /// Store one run's score under the device's current name
    pub fn submit_score(
        &mut self,
        request: &SubmitScoreRequest,
        now_ms: f64,
    ) -> Result<SubmitScoreResponse, ApiError> {
        let (device_id, score) = request.validated()?;
        let name = self
            .profiles
            .get(&device_id)
            .cloned()
            .ok_or(ApiError::UnknownDevice)?;

        let row = ScoreRow {
            name,
            score,
            created_at: now_ms,
        };
        self.scores.push(StoredScore {
            device_id,
            row: row.clone(),
            seq: self.next_seq,
        });
        self.next_seq += 1;
        Ok(SubmitScoreResponse {
            ok: true,
            score: Some(row),
        })
    }

    /// Top scores, highest first; ties go to the earlier run
    pub fn leaderboard(&self, limit: Option<usize>) -> LeaderboardResponse {
        let mut sorted: Vec<&StoredScore> = self.scores.iter().collect();
        sorted.sort_by(|a, b| leaderboard_order(a, b));
        LeaderboardResponse {
            scores: sorted
                .into_iter()
                .take(clamp_limit(limit))
                .map(|s| s.row.clone())
                .collect(),
        }
    }

    fn player_bests(&self) -> HashMap<&str, PlayerBest> {
        let mut bests: HashMap<&str, PlayerBest> = HashMap::new();
        for stored in &self.scores {
            let candidate = PlayerBest {
                score: stored.row.score,
                first_achieved_at: stored.row.created_at,
            };
            bests
                .entry(stored.device_id.as_str())
                .and_modify(|best| {
                    let better = candidate.score > best.score
                        || (candidate.score == best.score
                            && candidate.first_achieved_at < best.first_achieved_at);
                    if better {
                        *best = candidate;
                    }
                })
                .or_insert(candidate);
        }
        bests
    }

    /// Where this device's best score stands among all players' bests
    pub fn my_rank(&self, device_id: &str) -> Result<RankResponse, ApiError> {
        let device_id = validate_device_id(device_id)?;
        let bests = self.player_bests();
        let Some(mine) = bests.get(device_id.as_str()).copied() else {
            return Ok(RankResponse::default());
        };

        let ahead = bests
            .iter()
            .filter(|(id, other)| {
                **id != device_id.as_str()
                    && (other.score > mine.score
                        || (other.score == mine.score
                            && other.first_achieved_at < mine.first_achieved_at))
            })
            .count();

        Ok(RankResponse {
            has_score: true,
            rank: Some(ahead as u32 + 1),
            total_players: Some(bests.len() as u32),
            name: self.profiles.get(&device_id).cloned(),
            best_score: Some(mine.score),
        })
    }
}
