//! Observable pipeline state, published over a watch channel so
//! callers can poll or subscribe across the full stage sequence.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Where the pipeline currently is in its stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    GeneratingQueries,
    Fetching,
    Validating,
    Scoring,
    Prioritizing,
    Matching,
    Complete,
    Error,
}

impl PipelineStage {
    /// Coarse progress percentage at the start of each stage.
    #[must_use]
    pub fn progress(self) -> u8 {
        match self {
            PipelineStage::Idle => 0,
            PipelineStage::GeneratingQueries => 5,
            PipelineStage::Fetching => 15,
            PipelineStage::Validating => 60,
            PipelineStage::Scoring => 70,
            PipelineStage::Prioritizing => 85,
            PipelineStage::Matching => 92,
            PipelineStage::Complete | PipelineStage::Error => 100,
        }
    }
}

/// Snapshot a caller sees when observing a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub stage: PipelineStage,
    pub progress: u8,
    pub status_message: String,
    pub sources_used: Vec<String>,
    pub error: Option<String>,
}

impl PipelineState {
    fn idle() -> Self {
        PipelineState {
            stage: PipelineStage::Idle,
            progress: 0,
            status_message: "idle".to_string(),
            sources_used: Vec::new(),
            error: None,
        }
    }
}

/// Publishes state transitions; a new run simply overwrites whatever
/// the previous run left behind.
pub(crate) struct StatePublisher {
    tx: watch::Sender<PipelineState>,
}

impl StatePublisher {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(PipelineState::idle());
        StatePublisher { tx }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.tx.subscribe()
    }

    pub(crate) fn enter(&self, stage: PipelineStage, status_message: impl Into<String>) {
        let message = status_message.into();
        tracing::info!(?stage, %message, "pipeline stage");
        self.tx.send_modify(|state| {
            state.stage = stage;
            state.progress = stage.progress();
            state.status_message = message;
            state.error = None;
        });
    }

    pub(crate) fn set_sources(&self, sources_used: Vec<String>) {
        self.tx.send_modify(|state| state.sources_used = sources_used);
    }

    pub(crate) fn complete(&self, status_message: impl Into<String>) {
        self.enter(PipelineStage::Complete, status_message);
    }

    pub(crate) fn fail(&self, error: impl Into<String>) {
        let error = error.into();
        tracing::error!(%error, "pipeline failed");
        self.tx.send_modify(|state| {
            state.stage = PipelineStage::Error;
            state.progress = PipelineStage::Error.progress();
            state.status_message = error.clone();
            state.error = Some(error.clone());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_transitions_are_observable() {
        let publisher = StatePublisher::new();
        let rx = publisher.subscribe();
        assert_eq!(rx.borrow().stage, PipelineStage::Idle);

        publisher.enter(PipelineStage::Fetching, "fetching from 8 sources");
        assert_eq!(rx.borrow().stage, PipelineStage::Fetching);
        assert_eq!(rx.borrow().progress, 15);
    }

    #[test]
    fn failure_carries_the_message() {
        let publisher = StatePublisher::new();
        let rx = publisher.subscribe();
        publisher.fail("No trends fetched from any source");
        let state = rx.borrow();
        assert_eq!(state.stage, PipelineStage::Error);
        assert_eq!(
            state.error.as_deref(),
            Some("No trends fetched from any source")
        );
    }

    #[test]
    fn sources_survive_stage_transitions() {
        let publisher = StatePublisher::new();
        let rx = publisher.subscribe();
        publisher.set_sources(vec!["news".to_string()]);
        publisher.enter(PipelineStage::Scoring, "scoring");
        assert_eq!(rx.borrow().sources_used, ["news"]);
    }

    #[test]
    fn progress_is_monotonic_across_the_sequence() {
        let sequence = [
            PipelineStage::Idle,
            PipelineStage::GeneratingQueries,
            PipelineStage::Fetching,
            PipelineStage::Validating,
            PipelineStage::Scoring,
            PipelineStage::Prioritizing,
            PipelineStage::Matching,
            PipelineStage::Complete,
        ];
        for pair in sequence.windows(2) {
            assert!(pair[0].progress() < pair[1].progress());
        }
    }
}
