/// Seek-candidate classification and debounce
pub mod classifier;
/// Cross-player sync state machine
pub mod coordinator;

pub use classifier::*;
pub use coordinator::*;
