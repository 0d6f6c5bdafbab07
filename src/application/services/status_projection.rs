//! Read-side helpers mapping a job's (status, stage) pair to the labels
//! shown in the queue list. Purely derived; the engine guarantees status
//! and stage are always published together, so these never see torn state.

use crate::domain::{JobStatus, Stage};

pub fn stage_title(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::NotStarted => None,
        Stage::Structuring => Some("Transcription & Structuring"),
        Stage::Enriching => Some("Deep Dive & Enrichment"),
        Stage::Synthesizing => Some("Visual Synthesis"),
    }
}

pub fn status_label(status: JobStatus, stage: Stage) -> String {
    match status {
        JobStatus::Pending => "Waiting in queue".to_string(),
        JobStatus::Processing => match stage_title(stage) {
            Some(title) => format!("Stage {}/3: {}", stage.as_u8(), title),
            None => "Starting".to_string(),
        },
        JobStatus::Completed => "Completed".to_string(),
        JobStatus::Failed => "Failed".to_string(),
    }
}

/// Whether a countdown badge should render next to the queue.
pub fn shows_cooldown(running: bool, cooldown_remaining: u32) -> bool {
    running && cooldown_remaining > 0
}
