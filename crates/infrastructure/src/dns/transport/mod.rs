pub mod udp;
pub mod udp_mux;

use async_trait::async_trait;
use ferrous_stub_domain::DomainError;
use std::net::SocketAddr;

pub use udp::UdpTransport;
pub use udp_mux::UdpMultiplexer;

/// Largest standard (non-EDNS) UDP response, RFC 1035 §4.2.1.
pub const MAX_UDP_RESPONSE_SIZE: usize = 512;

/// One datagram received while a query is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub bytes: Vec<u8>,

    pub source: SocketAddr,
}

/// Opens per-query exchanges. The resolver engine asks for one exchange per
/// `resolve` call and drops it when the query finishes.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Fails with `DomainError::TransactionIdInUse` when the transport
    /// multiplexes by id and `transaction_id` is already outstanding.
    async fn open(&self, transaction_id: u16) -> Result<Box<dyn Exchange>, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

/// Send and receive path for a single outstanding query.
#[async_trait]
pub trait Exchange: Send {
    async fn send(&mut self, server: SocketAddr, message: &[u8]) -> Result<(), DomainError>;

    /// Waits for the next datagram addressed to this query. Never times out
    /// on its own; the caller bounds it with a deadline.
    async fn recv(&mut self) -> Result<Datagram, DomainError>;
}
