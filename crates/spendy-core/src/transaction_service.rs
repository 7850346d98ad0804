use std::{thread, time::Duration};

use spendy_domain::{NewTransaction, Transaction, TransactionDraft};
use tracing::{debug, info, warn};

use crate::{session::Session, storage::TransactionStore, CoreError};

/// How often and how patiently to retry a fetch while the store builds its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// Ingestion boundary between raw form input and the store.
pub struct TransactionService;

impl TransactionService {
    /// Coerces and validates a draft. Amounts are converted to cents here, never later.
    pub fn prepare(draft: &TransactionDraft) -> Result<NewTransaction, CoreError> {
        draft.parse().map_err(|err| {
            debug!(error = %err, "rejected transaction draft");
            CoreError::Validation(err)
        })
    }

    /// Validates a draft and appends it to the signed-in user's transactions.
    pub fn add(
        store: &dyn TransactionStore,
        session: &Session,
        draft: &TransactionDraft,
    ) -> Result<Transaction, CoreError> {
        let fields = Self::prepare(draft)?;
        Self::create(store, session, fields)
    }

    pub fn create(
        store: &dyn TransactionStore,
        session: &Session,
        fields: NewTransaction,
    ) -> Result<Transaction, CoreError> {
        let txn = store.create_transaction(session.owner(), fields)?;
        info!(
            user = %session.owner(),
            id = %txn.id,
            kind = txn.kind.as_str(),
            amount = %txn.amount,
            "transaction recorded"
        );
        Ok(txn)
    }

    /// Fetches the session owner's transactions, newest first.
    ///
    /// A store still building its index is retried after `retry.delay`; any other
    /// failure, or running out of attempts, is returned to the caller.
    pub fn load(
        store: &dyn TransactionStore,
        session: &Session,
        retry: RetryPolicy,
    ) -> Result<Vec<Transaction>, CoreError> {
        let mut attempt = 1;
        loop {
            match store.fetch_transactions(session.owner()) {
                Ok(transactions) => {
                    info!(
                        user = %session.owner(),
                        count = transactions.len(),
                        attempt,
                        "transactions loaded"
                    );
                    return Ok(transactions);
                }
                Err(err) if err.is_retryable() && attempt < retry.attempts => {
                    warn!(
                        user = %session.owner(),
                        attempt,
                        error = %err,
                        "store not ready, retrying"
                    );
                    thread::sleep(retry.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
