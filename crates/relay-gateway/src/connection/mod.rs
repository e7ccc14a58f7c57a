//! Connection management
//!
//! Connection handles, the live-connection registry, and the frame type
//! carried on each connection's outbound queue.

mod connection;
mod frame;
mod registry;

pub use connection::{Connection, ConnectionState};
pub use frame::Frame;
pub use registry::Registry;
