//! Persistence client boundary
//!
//! Identity, score submission and leaderboard reads. The simulation never
//! touches any of this; the shell feeds it `RunEnded` events and renders
//! whatever comes back.

pub mod error;
pub mod identity;
pub mod memory;
pub mod outbox;
pub mod protocol;

#[cfg(target_arch = "wasm32")]
pub mod client;

#[cfg(target_arch = "wasm32")]
pub use client::{ApiClient, ClientConfig};
pub use error::ApiError;
pub use identity::Identity;
pub use memory::MemoryBackend;
pub use outbox::{Outbox, ScoreSubmission};
pub use protocol::{
    LeaderboardResponse, Profile, RankResponse, RegisterRequest, RegisterResponse, ScoreRow,
    SubmitScoreRequest, SubmitScoreResponse,
};
