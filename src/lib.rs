//! Client-side conversation synchronization
//!
//! Keeps a local transcript consistent with a chat backend across session
//! switches, history refreshes, and sends whose replies arrive out of order.

pub mod config;
pub mod console;
pub mod loaders;
pub mod runtime;
pub mod session;
pub mod sessions;
pub mod sync;
pub mod transport;
pub mod wire;
