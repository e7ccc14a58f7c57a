//! # relay-gateway
//!
//! Real-time WebSocket message relay. Every frame a client sends is fanned
//! out verbatim to all other connected clients; payloads are opaque to the
//! relay.

pub mod broadcast;
pub mod connection;
pub mod server;
