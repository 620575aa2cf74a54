use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Donation,
    Certification,
    Cash,
}

impl RewardType {
    pub const ALL: [RewardType; 3] = [
        RewardType::Donation,
        RewardType::Certification,
        RewardType::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::Donation => "donation",
            RewardType::Certification => "certification",
            RewardType::Cash => "cash",
        }
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RewardType::ALL
            .into_iter()
            .find(|reward| reward.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LedgerError::InvalidArgument(format!("unknown reward type '{}'", s)))
    }
}

/// Outcome of a redemption attempt. An unsuccessful outcome leaves the
/// ledger untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

impl Redemption {
    pub const INSUFFICIENT_POINTS: &'static str = "Insufficient impact points";

    pub fn insufficient() -> Self {
        Self {
            success: false,
            message: Self::INSUFFICIENT_POINTS.to_string(),
            transaction_hash: None,
        }
    }

    pub fn redeemed(points: u64, reward_type: RewardType, transaction_hash: String) -> Self {
        Self {
            success: true,
            message: format!("Successfully redeemed {} points for {}", points, reward_type),
            transaction_hash: Some(transaction_hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reward_types() {
        assert_eq!("donation".parse::<RewardType>().unwrap(), RewardType::Donation);
        assert_eq!(" Cash ".parse::<RewardType>().unwrap(), RewardType::Cash);
        assert!(matches!(
            "voucher".parse::<RewardType>(),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn failed_redemption_omits_hash() {
        let json = serde_json::to_value(Redemption::insufficient()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Insufficient impact points");
        assert!(json.get("transactionHash").is_none());
    }

    #[test]
    fn successful_redemption_message() {
        let r = Redemption::redeemed(150, RewardType::Certification, "0xabc".to_string());
        assert_eq!(r.message, "Successfully redeemed 150 points for certification");
        assert_eq!(r.transaction_hash.as_deref(), Some("0xabc"));
    }
}
