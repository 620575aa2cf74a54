use crate::blockchain::ImpactLedger;
use crate::error::LedgerError;
use crate::utils::clamp_points;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub user_id: String,
    pub impact_points: i64,
    pub completed_tasks: usize,
    pub pending_rewards: usize,
    pub redeemed_points: i64,
}

impl WalletSummary {
    pub fn for_user(ledger: &ImpactLedger, user_id: &str) -> Result<Self, LedgerError> {
        let transactions = ledger.get_user_transactions(user_id)?;
        let mut summary = WalletSummary {
            user_id: user_id.to_string(),
            ..WalletSummary::default()
        };
        let mut impact_points = 0i128;
        let mut redeemed_points = 0i128;

        for tx in &transactions {
            if !tx.verified {
                summary.pending_rewards += 1;
                continue;
            }
            impact_points += i128::from(tx.points);
            if tx.is_earning() {
                summary.completed_tasks += 1;
            } else if tx.is_redemption() {
                redeemed_points -= i128::from(tx.points);
            }
        }
        summary.impact_points = clamp_points(impact_points);
        summary.redeemed_points = clamp_points(redeemed_points);
        Ok(summary)
    }
}
