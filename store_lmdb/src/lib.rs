//! LMDB storage backend for the evote engine.
//!
//! Implements all storage traits from `evote-store` using the `heed` LMDB
//! bindings. Each entity maps to one LMDB database within a single
//! environment, with secondary-index databases for the lookups the engine
//! needs (identity hash → wallet, ballot address → election, voter →
//! receipts). Multi-key writes share one write transaction so they commit or
//! abort as a unit.

pub mod election;
pub mod environment;
pub mod error;
pub mod receipt;
pub mod result;
pub mod voter;

pub use environment::LmdbStore;
pub use error::LmdbError;
