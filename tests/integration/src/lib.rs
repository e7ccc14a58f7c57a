//! Integration test support for the relay server

pub mod helpers;

pub use helpers::{RelayClient, TestServer};
