#![allow(dead_code)]

pub mod mock_server;
pub mod packets;
pub mod scripted_transport;

pub use mock_server::MockDnsServer;
pub use scripted_transport::{ScriptedTransport, SequenceIds};
