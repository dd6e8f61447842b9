//! Live adapters for real external interactions.

pub mod clock;
pub mod filesystem;
pub mod work_orders;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use work_orders::LiveWorkOrderApi;
