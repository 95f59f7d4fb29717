//! One-shot initialization.
//!
//! The page framework renders asynchronously, so every initializer may be
//! attempted several times (on each lifecycle signal and again after a
//! settle delay). An [`InitGate`] turns those attempts into at-most-once
//! effective initialization: attempts before the required elements exist
//! report `NotReady`, the first successful one marks the gate, and every
//! later attempt is a no-op.

use crate::error::InvitationError;

/// Page lifecycle signals that trigger initialization attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// `DOMContentLoaded`
    ContentParsed,
    /// `window.load`
    FullyLoaded,
    /// The data document was fetched (or failed to fetch).
    DataSettled,
}

/// How the wait for the data document ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSettle {
    Fetched,
    FetchFailed,
    /// The document took longer than `data_wait_ms`; components start on
    /// default settings and bindings still apply if it arrives later.
    TimedOut,
}

/// Components wait for the data document, but not forever.
#[derive(Debug, Default)]
pub struct DataWait {
    settled: Option<DataSettle>,
}

impl DataWait {
    pub fn is_settled(&self) -> bool {
        self.settled.is_some()
    }

    pub fn settled_by(&self) -> Option<DataSettle> {
        self.settled
    }

    /// Record how the wait ended. True only for the first call, which is the
    /// one that should fire [`Lifecycle::DataSettled`].
    pub fn settle(&mut self, how: DataSettle) -> bool {
        if let Some(first) = self.settled {
            log::debug!("Wedding data already settled ({first:?}); ignoring {how:?}");
            return false;
        }
        self.settled = Some(how);
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized,
    AlreadyInitialized,
    NotReady(InvitationError),
}

#[derive(Debug)]
pub struct InitGate {
    name: &'static str,
    done: bool,
}

impl InitGate {
    pub fn new(name: &'static str) -> Self {
        Self { name, done: false }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Run `init` unless a previous attempt already succeeded.
    ///
    /// `init` must check its prerequisites before touching anything, so a
    /// failed attempt leaves nothing behind.
    pub fn attempt(&mut self, init: impl FnOnce() -> Result<(), InvitationError>) -> InitOutcome {
        if self.done {
            log::debug!("{} already initialized, skipping", self.name);
            return InitOutcome::AlreadyInitialized;
        }
        match init() {
            Ok(()) => {
                self.done = true;
                log::info!("{} initialized", self.name);
                InitOutcome::Initialized
            }
            Err(error) => {
                log::debug!("{} not ready: {error}", self.name);
                InitOutcome::NotReady(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_runs_until_first_success_then_never_again() {
        let mut gate = InitGate::new("carousel");
        let mut runs = 0;

        let outcome = gate.attempt(|| {
            runs += 1;
            Err(InvitationError::element_not_found(".photo-gallery-wrapper"))
        });
        assert!(matches!(outcome, InitOutcome::NotReady(_)));
        assert!(!gate.is_done());

        assert_eq!(
            gate.attempt(|| {
                runs += 1;
                Ok(())
            }),
            InitOutcome::Initialized
        );
        assert_eq!(
            gate.attempt(|| {
                runs += 1;
                Ok(())
            }),
            InitOutcome::AlreadyInitialized
        );
        assert_eq!(runs, 2);
    }

    #[test]
    fn data_wait_settles_once_whichever_comes_first() {
        let mut wait = DataWait::default();
        assert!(!wait.is_settled());

        assert!(wait.settle(DataSettle::TimedOut));
        assert!(wait.is_settled());
        assert!(!wait.settle(DataSettle::Fetched));
        assert_eq!(wait.settled_by(), Some(DataSettle::TimedOut));
    }
}
