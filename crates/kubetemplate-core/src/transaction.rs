//! Transactional launch: create every resource in order, and on the first
//! failure delete everything this run already created.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{Error, Launch};

/// Order in which committed launchers are compensated on rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
pub enum RollbackOrder {
    /// Delete in the order the resources were created.
    #[default]
    #[display("creation")]
    CreationOrder,
    /// Delete newest first.
    #[display("reverse")]
    ReverseCreationOrder,
}

/// Lifecycle of a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RunState {
    #[display("not started")]
    NotStarted,
    #[display("launching")]
    Launching,
    #[display("committed")]
    Committed,
    #[display("rolled back")]
    RolledBack,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Committed | RunState::RolledBack)
    }
}

/// Ordered record of launchers whose create succeeded. Each entry's
/// compensation is its delete.
#[derive(Debug)]
pub struct TransactionLog<L> {
    committed: Vec<L>,
}

impl<L> Default for TransactionLog<L> {
    fn default() -> Self {
        Self {
            committed: Vec::new(),
        }
    }
}

impl<L: Launch> TransactionLog<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, launcher: L) {
        self.committed.push(launcher);
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn committed(&self) -> &[L] {
        &self.committed
    }

    /// Delete every committed launcher in the given order, draining the log.
    ///
    /// Every delete is attempted even when an earlier one fails; the failures
    /// are returned in the order they happened.
    pub async fn compensate(&mut self, order: RollbackOrder) -> Vec<Error> {
        let mut committed = std::mem::take(&mut self.committed);
        if order == RollbackOrder::ReverseCreationOrder {
            committed.reverse();
        }

        let mut failures = Vec::new();
        for mut launcher in committed {
            if let Err(e) = launcher.delete().await {
                warn!(
                    object = %launcher.display_name(),
                    error = %e.report(),
                    "compensating delete failed"
                );
                failures.push(e);
            }
        }
        failures
    }
}

/// Failure of a transaction.
///
/// `error` is always the failure that stopped the run. Errors from the
/// compensating deletes that followed are kept in `rollback_errors`.
#[derive(Debug)]
pub struct ApplyFailure {
    pub error: Error,
    pub rollback_errors: Vec<Error>,
}

impl std::fmt::Display for ApplyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)?;
        if !self.rollback_errors.is_empty() {
            write!(
                f,
                " ({} compensating delete(s) also failed)",
                self.rollback_errors.len()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ApplyFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl From<Error> for ApplyFailure {
    fn from(error: Error) -> Self {
        Self {
            error,
            rollback_errors: Vec::new(),
        }
    }
}

/// A one-shot create-with-rollback run over an ordered launcher sequence.
pub struct Transaction<L> {
    pending: Vec<L>,
    log: TransactionLog<L>,
    order: RollbackOrder,
    state: RunState,
}

impl<L: Launch> Transaction<L> {
    pub fn new(launchers: Vec<L>) -> Self {
        Self {
            pending: launchers,
            log: TransactionLog::new(),
            order: RollbackOrder::default(),
            state: RunState::NotStarted,
        }
    }

    pub fn with_rollback_order(mut self, order: RollbackOrder) -> Self {
        self.order = order;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn rollback_order(&self) -> RollbackOrder {
        self.order
    }

    /// Launchers whose create succeeded and that have not been rolled back.
    pub fn launched(&self) -> &[L] {
        self.log.committed()
    }

    /// Create every launcher in order.
    ///
    /// On the first create failure no further creates are attempted, every
    /// launcher created so far is deleted, and the create failure is returned.
    pub async fn apply(&mut self) -> Result<(), ApplyFailure> {
        if self.state != RunState::NotStarted {
            return Err(Error::AlreadyApplied(self.state).into());
        }
        self.state = RunState::Launching;

        let pending = std::mem::take(&mut self.pending);
        info!(count = pending.len(), "launching resources");

        for mut launcher in pending {
            match launcher.create().await {
                Ok(()) => self.log.record(launcher),
                Err(e) => {
                    error!(
                        object = %launcher.display_name(),
                        error = %e,
                        rollback = self.log.len(),
                        "create failed, rolling back"
                    );
                    let rollback_errors = self.log.compensate(self.order).await;
                    self.state = RunState::RolledBack;
                    return Err(ApplyFailure {
                        error: e,
                        rollback_errors,
                    });
                }
            }
        }

        self.state = RunState::Committed;
        info!(count = self.log.len(), "all resources created");
        Ok(())
    }
}
