use crate::utils::REDEMPTION_TASK_ID;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImpactTransaction {
    pub id: String,
    pub user_id: String,
    /// Originating task, or `"redemption"` for spends.
    pub task_id: String,
    /// Originating project, or the reward type for spends.
    pub project_id: String,
    pub points: i64,
    pub timestamp: i64,
    pub hash: String,
    pub verified: bool,
}

impl ImpactTransaction {
    pub fn is_redemption(&self) -> bool {
        self.task_id == REDEMPTION_TASK_ID
    }

    pub fn is_earning(&self) -> bool {
        self.points > 0 && !self.is_redemption()
    }
}
