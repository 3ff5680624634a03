//! Abstract storage traits for the evote engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The coordinators depend only on the traits, so the backing store
//! is an external collaborator that can be swapped without touching the
//! engine's logic.
//!
//! Invariants enforced at this layer:
//! - voter wallet addresses and identity hashes are each globally unique;
//! - at most one vote receipt exists per `(election, voter)` pair;
//! - an election and its candidates are created as one atomic write;
//! - cached results are replaced wholesale, never partially.

pub mod election;
pub mod error;
pub mod receipt;
pub mod result;
pub mod voter;

pub use election::{CandidateRecord, ElectionRecord, ElectionStore};
pub use error::StoreError;
pub use receipt::{ReceiptRecord, ReceiptStore};
pub use result::{ResultRecord, ResultStore};
pub use voter::{VoterRecord, VoterStore};
