pub mod resolver;
pub mod transport;
pub mod wire;

pub use resolver::{resolve, RandomIds, StubResolver, TransactionIdSource};
pub use transport::{Datagram, DnsTransport, Exchange, UdpMultiplexer, UdpTransport};
pub use wire::{MessageBuilder, ResponseParser};
