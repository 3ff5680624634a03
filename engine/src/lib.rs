//! Election engine — coordinators over the local store and the ledger.
//!
//! The ledger holds the authoritative tally; the local store holds registry
//! metadata, election descriptions, commit/reveal receipts, and cached
//! results. The coordinators in this crate keep the two consistent across
//! multi-step operations that can partially fail:
//!
//! - [`ElectionCoordinator`] — creation (local-first, ledger second),
//!   explicit deployment retry, ledger-first cancellation, enriched reads,
//!   analytics
//! - [`VoteTracker`] — commit/reveal receipt bookkeeping and ledger-backed
//!   verification
//! - [`ResultsSync`] — pulls final tallies into the cached snapshot
//! - [`EligibilityGate`] — combined local + ledger eligibility
//! - [`VoterRegistrar`] — registration with a best-effort ledger half,
//!   deactivation/reactivation through the [`ChainReconciler`]
//!
//! There is no background loop: every synchronization step is explicitly
//! triggered by a caller.

pub mod config;
pub mod election;
pub mod eligibility;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod registrar;
pub mod results;
pub mod votes;

pub use config::EngineConfig;
pub use election::{
    CreationOutcome, ElectionAnalytics, ElectionCoordinator, ElectionResults, ElectionView,
    NewCandidate, NewElection,
};
pub use eligibility::{EligibilityGate, EligibilityReport, EligibilityVerdict};
pub use error::EngineError;
pub use logging::init_tracing;
pub use reconcile::{
    ChainReconciler, ReconcileOp, ReconcileReport, ReconcileTask, ReconcilerConfig,
};
pub use registrar::{NewVoter, RegistrationOutcome, VoterRegistrar, VoterStats, VoterView};
pub use results::{ResultsSync, SyncReport};
pub use votes::{ReceiptVerification, VoteTracker};
