//! NexImpact simulated impact ledger.
//!
//! An in-memory, append-only record of impact points earned by users for
//! completed tasks and spent on rewards, with simulated confirmation and a
//! cosmetic network connection. Nothing is persisted or sent over the wire.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod network;
pub mod transaction;
pub mod utils;
pub mod wallet;

pub use blockchain::ImpactLedger;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use marketplace::{Redemption, RewardType};
pub use network::{connect_to_blockchain, Connection, Network};
pub use transaction::ImpactTransaction;
pub use wallet::WalletSummary;
