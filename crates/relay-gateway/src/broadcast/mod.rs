//! Broadcast fan-out
//!
//! Relays frames from one connection to all others in the registry.

mod hub;

pub use hub::Hub;
