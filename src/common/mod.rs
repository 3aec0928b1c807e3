/// Reactive property primitive shared by services.
pub mod property;

pub use property::Property;
