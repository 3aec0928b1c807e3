/// Player adapter owning one widget instance
pub mod adapter;
/// Embedded widget boundary traits
pub mod backend;
/// Player adapter error types
pub mod error;
/// Live player handle and command surface
pub mod handle;
/// Process-wide widget script load lifecycle
pub mod script;
/// Deterministic simulated widget backend
pub mod sim;
/// Player state, command and event types
pub mod types;

pub use adapter::*;
pub use backend::*;
pub use error::*;
pub use handle::*;
pub use script::*;
pub use types::*;
