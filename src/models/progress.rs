use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::database::Document;
use crate::error::ApiError;
use crate::types::Collection;

/// One user's progress through one tutorial
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tutorial_id: Uuid,
    pub completed_steps: Vec<usize>,
    pub is_completed: bool,
    pub last_updated: DateTime<Utc>,
}

impl Document for TutorialProgress {
    const COLLECTION: Collection = Collection::TutorialProgress;
    const LABEL: &'static str = "Progress";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl TutorialProgress {
    /// Stable id for the (user, tutorial) pair, so a pair has at most one record
    pub fn key(user_id: Uuid, tutorial_id: Uuid) -> Uuid {
        Uuid::new_v5(&tutorial_id, user_id.as_bytes())
    }

    pub fn empty(user_id: Uuid, tutorial_id: Uuid) -> Self {
        Self {
            id: Self::key(user_id, tutorial_id),
            user_id,
            tutorial_id,
            completed_steps: Vec::new(),
            is_completed: false,
            last_updated: Utc::now(),
        }
    }

    /// Replace the completed set. Indexes must address existing steps;
    /// duplicates collapse and the stored list is sorted.
    pub fn record(&mut self, steps: &[usize], step_count: usize) -> Result<(), ApiError> {
        if let Some(bad) = steps.iter().find(|&&i| i >= step_count) {
            return Err(ApiError::bad_request(format!(
                "Step {} does not exist; tutorial has {} steps",
                bad, step_count
            )));
        }

        let unique: BTreeSet<usize> = steps.iter().copied().collect();
        self.is_completed = step_count > 0 && unique.len() == step_count;
        self.completed_steps = unique.into_iter().collect();
        self.last_updated = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub completed_steps: Option<Vec<usize>>,
}
