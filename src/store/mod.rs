//! Record store subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     db.json
//!     → persist.rs (read + parse, fall back to empty snapshot)
//!     → database.rs (Store owns the snapshot behind a mutex)
//!
//! Mutation (insert / update / complete / delete):
//!     lock snapshot
//!     → apply change in memory
//!     → persist.rs (serialize full snapshot, temp file + rename)
//!     → unlock, return Result to caller
//! ```
//!
//! # Design Decisions
//! - One writer at a time: the persist happens while the lock is held,
//!   so the file always reflects the last completed mutation
//! - Whole-snapshot overwrite, no incremental log (low-volume workload)
//! - Construction awaits the initial load; there is no pre-load window
//! - Records are typed per collection through the `Record` trait

pub mod clock;
pub mod database;
pub mod error;
pub mod persist;
pub mod record;

pub use clock::{Clock, SystemClock};
pub use database::{Snapshot, Store};
pub use error::{StoreError, StoreResult};
pub use record::{Record, SearchCriteria};
