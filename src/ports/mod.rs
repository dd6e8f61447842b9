//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the migration pipeline and
//! an external system (filesystem, time, the work-order API).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod work_orders;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use work_orders::{SubmitFuture, WorkOrderApi};
