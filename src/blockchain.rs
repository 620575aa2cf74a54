use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::marketplace::{Redemption, RewardType};
use crate::transaction::ImpactTransaction;
use crate::utils::{
    clamp_points, generate_hash, generate_transaction_id, now_millis, REDEMPTION_TASK_ID,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

const MAX_ALLOCATION_ATTEMPTS: usize = 32;

#[derive(Default)]
struct LedgerState {
    transactions: Vec<ImpactTransaction>,
    id_index: HashMap<String, usize>,
    hash_index: HashMap<String, usize>,
    last_timestamp: i64,
}

impl LedgerState {
    fn next_timestamp(&mut self) -> i64 {
        let now = now_millis().max(self.last_timestamp);
        self.last_timestamp = now;
        now
    }

    // A crowded millisecond falls back to appending the ledger position.
    fn allocate_id(&mut self, prefix: &str) -> (String, i64) {
        let timestamp = self.next_timestamp();
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let id = generate_transaction_id(prefix, timestamp);
            if !self.id_index.contains_key(&id) {
                return (id, timestamp);
            }
            debug!(%id, "transaction id already taken, retrying");
        }
        let id = format!(
            "{}-{}",
            generate_transaction_id(prefix, timestamp),
            self.transactions.len()
        );
        (id, timestamp)
    }

    fn allocate_hash(&self) -> Result<String, LedgerError> {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let hash = generate_hash();
            if !self.hash_index.contains_key(&hash) {
                return Ok(hash);
            }
            warn!(%hash, "transaction hash collision, retrying");
        }
        Err(LedgerError::HashCollision)
    }

    fn append(
        &mut self,
        config: &LedgerConfig,
        user_id: &str,
        task_id: &str,
        project_id: &str,
        points: i64,
    ) -> Result<ImpactTransaction, LedgerError> {
        let (id, timestamp) = self.allocate_id(&config.id_prefix);
        let hash = self.allocate_hash()?;
        let transaction = ImpactTransaction {
            id,
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
            project_id: project_id.to_string(),
            points,
            timestamp,
            hash,
            verified: config.verified_on_record,
        };

        let index = self.transactions.len();
        self.id_index.insert(transaction.id.clone(), index);
        self.hash_index.insert(transaction.hash.clone(), index);
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn confirm(&mut self, id: &str) -> bool {
        let Some(&index) = self.id_index.get(id) else {
            return false;
        };
        match self.transactions.get_mut(index) {
            Some(transaction) => {
                if !transaction.verified {
                    transaction.verified = true;
                    debug!(id, "transaction confirmed");
                }
                true
            }
            None => false,
        }
    }

    fn user_transactions<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Iterator<Item = &'a ImpactTransaction> + 'a {
        self.transactions
            .iter()
            .filter(move |tx| tx.user_id == user_id)
    }

    fn balance(&self, user_id: &str) -> i64 {
        clamp_points(
            self.user_transactions(user_id)
                .filter(|tx| tx.verified)
                .map(|tx| i128::from(tx.points))
                .sum(),
        )
    }

    // Pending debits count against the balance so they cannot be spent twice.
    fn spendable(&self, user_id: &str) -> i64 {
        clamp_points(
            self.user_transactions(user_id)
                .filter(|tx| tx.verified || tx.points < 0)
                .map(|tx| i128::from(tx.points))
                .sum(),
        )
    }

    fn by_hash(&self, hash: &str) -> Option<&ImpactTransaction> {
        self.hash_index
            .get(hash)
            .and_then(|&index| self.transactions.get(index))
    }
}

type Confirmations = Arc<Mutex<HashMap<String, AbortHandle>>>;

/// Append-only, in-memory record of impact points. Confirmation tasks run on
/// the ambient tokio runtime and are aborted on [`ImpactLedger::shutdown`] or drop.
pub struct ImpactLedger {
    config: LedgerConfig,
    state: Arc<RwLock<LedgerState>>,
    confirmations: Confirmations,
}

impl ImpactLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(LedgerState::default())),
            confirmations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.state.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.state.write().map_err(|_| LedgerError::LockPoisoned)
    }

    /// Returns as soon as the transaction is appended; the confirmation flip
    /// happens later. No balance check: guarded spending goes through
    /// [`ImpactLedger::redeem_points`].
    pub fn record_impact(
        &self,
        user_id: &str,
        task_id: &str,
        project_id: &str,
        points: i64,
    ) -> Result<ImpactTransaction, LedgerError> {
        require_identifier("user_id", user_id)?;
        require_identifier("task_id", task_id)?;
        require_identifier("project_id", project_id)?;

        let transaction = {
            let mut state = self.write()?;
            state.append(&self.config, user_id, task_id, project_id, points)?
        };
        info!(
            id = %transaction.id,
            user = user_id,
            task = task_id,
            points,
            "impact recorded"
        );

        self.schedule_confirmation(&transaction.id);
        Ok(transaction)
    }

    pub fn get_user_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<ImpactTransaction>, LedgerError> {
        let state = self.read()?;
        Ok(state.user_transactions(user_id).cloned().collect())
    }

    pub fn get_user_impact_points(&self, user_id: &str) -> Result<i64, LedgerError> {
        Ok(self.read()?.balance(user_id))
    }

    /// Balance check and debit happen under one write lock. An insufficient
    /// balance is an unsuccessful [`Redemption`], not an error.
    pub fn redeem_points(
        &self,
        user_id: &str,
        points: u64,
        reward_type: RewardType,
    ) -> Result<Redemption, LedgerError> {
        require_identifier("user_id", user_id)?;
        if points == 0 {
            return Err(LedgerError::InvalidArgument(
                "redeemed points must be positive".to_string(),
            ));
        }
        let debit = i64::try_from(points).map_err(|_| {
            LedgerError::InvalidArgument(format!("cannot redeem {} points", points))
        })?;

        let transaction = {
            let mut state = self.write()?;
            let available = state.spendable(user_id);
            if debit > available {
                warn!(
                    user = user_id,
                    requested = points,
                    available,
                    "redemption rejected"
                );
                return Ok(Redemption::insufficient());
            }
            state.append(
                &self.config,
                user_id,
                REDEMPTION_TASK_ID,
                reward_type.as_str(),
                -debit,
            )?
        };
        info!(
            user = user_id,
            points,
            reward = %reward_type,
            hash = %transaction.hash,
            "points redeemed"
        );

        self.schedule_confirmation(&transaction.id);
        Ok(Redemption::redeemed(points, reward_type, transaction.hash))
    }

    pub fn verify_transaction(&self, transaction_hash: &str) -> Result<bool, LedgerError> {
        Ok(self
            .read()?
            .by_hash(transaction_hash)
            .is_some_and(|tx| tx.verified))
    }

    pub fn find_by_hash(
        &self,
        transaction_hash: &str,
    ) -> Result<Option<ImpactTransaction>, LedgerError> {
        Ok(self.read()?.by_hash(transaction_hash).cloned())
    }

    pub fn confirm_transaction(&self, id: &str) -> Result<bool, LedgerError> {
        Ok(self.write()?.confirm(id))
    }

    pub fn transactions(&self) -> Result<Vec<ImpactTransaction>, LedgerError> {
        Ok(self.read()?.transactions.clone())
    }

    pub fn len(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.transactions.len())
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.read()?.transactions.is_empty())
    }

    pub fn pending_confirmations(&self) -> usize {
        let mut pending = self
            .confirmations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        prune_finished(&mut pending);
        pending.len()
    }

    pub fn shutdown(&self) -> usize {
        let mut pending = self
            .confirmations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let cancelled = pending.len();
        for (_, task) in pending.drain() {
            task.abort();
        }
        if cancelled > 0 {
            info!(cancelled, "pending confirmations cancelled");
        }
        cancelled
    }

    fn schedule_confirmation(&self, id: &str) {
        let Ok(runtime) = Handle::try_current() else {
            debug!(id, "no async runtime, confirmation left to confirm_transaction");
            return;
        };

        let mut pending = match self.confirmations.lock() {
            Ok(pending) => pending,
            Err(_) => {
                warn!(id, "confirmation registry poisoned, not scheduling");
                return;
            }
        };

        let delay = self.config.confirmation_delay();
        let state = Arc::clone(&self.state);
        let confirmations = Arc::clone(&self.confirmations);
        let tx_id = id.to_string();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            match state.write() {
                Ok(mut state) => {
                    state.confirm(&tx_id);
                }
                Err(_) => warn!(id = %tx_id, "ledger lock poisoned, confirmation dropped"),
            }
            if let Ok(mut pending) = confirmations.lock() {
                pending.remove(&tx_id);
            }
        });
        prune_finished(&mut pending);
        pending.insert(id.to_string(), task.abort_handle());
        debug!(id, delay_ms = self.config.confirmation_delay_ms, "confirmation scheduled");
    }
}

impl Default for ImpactLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Drop for ImpactLedger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// Tasks whose runtime went away never remove their own entry.
fn prune_finished(pending: &mut HashMap<String, AbortHandle>) {
    pending.retain(|_, task| !task.is_finished());
}

fn require_identifier(field: &str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}
