/// URL input form for the collection step
pub mod input;
/// Navigation handoff between input and viewing steps
pub mod route;
/// Session view composing players under one coordinator
pub mod view;

pub use input::*;
pub use route::*;
pub use view::*;
