//! Pending score submissions
//!
//! Each finished run is captured by value when its `RunEnded` event is
//! drained, so a submission still in flight can't be affected by the next
//! run.

use std::collections::VecDeque;

use super::error::ApiError;
use super::protocol::{SubmitScoreRequest, validate_play_ms, validate_score};
use crate::sim::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub run_id: u32,
    pub score: u32,
    pub play_ms: u64,
}

impl ScoreSubmission {
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::RunEnded {
                run_id,
                score,
                play_ms,
                ..
            } => Some(Self {
                run_id,
                score,
                play_ms,
            }),
            _ => None,
        }
    }

    pub fn to_request(&self, device_id: &str) -> SubmitScoreRequest {
        SubmitScoreRequest {
            device_id: device_id.to_string(),
            score: i64::from(self.score),
            play_ms: Some(i64::try_from(self.play_ms).unwrap_or(i64::MAX)),
        }
    }

    /// Run the server's checks locally
    pub fn precheck(&self) -> Result<(), ApiError> {
        let request = self.to_request("-");
        validate_score(request.score)?;
        validate_play_ms(request.play_ms)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Outbox {
    queue: VecDeque<ScoreSubmission>,
    last_run_id: Option<u32>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every finished run found in `events`. A run is only ever
    /// queued once. Returns how many were added.
    pub fn collect(&mut self, events: &[GameEvent]) -> usize {
        let mut added = 0;
        for submission in events.iter().filter_map(ScoreSubmission::from_event) {
            if self.last_run_id.is_some_and(|last| submission.run_id <= last) {
                log::warn!("Run {} already queued, skipping", submission.run_id);
                continue;
            }
            self.last_run_id = Some(submission.run_id);
            self.queue.push_back(submission);
            added += 1;
        }
        added
    }

    pub fn pop(&mut self) -> Option<ScoreSubmission> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
