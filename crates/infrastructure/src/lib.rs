//! Ferrous Stub Infrastructure Layer
//!
//! Wire codec, UDP transports and the resolver engine.

pub mod dns;
