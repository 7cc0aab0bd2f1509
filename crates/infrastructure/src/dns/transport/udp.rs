//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Every query gets its own socket bound to an ephemeral port, so nothing
//! is shared between concurrent `resolve` calls. Retries to the same server
//! reuse the socket, which lets a late reply to an earlier attempt still
//! complete the query.

use super::{Datagram, DnsTransport, Exchange, MAX_UDP_RESPONSE_SIZE};
use async_trait::async_trait;
use ferrous_stub_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

/// DNS over UDP transport
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn open(&self, _transaction_id: u16) -> Result<Box<dyn Exchange>, DomainError> {
        Ok(Box::new(UdpExchange { socket: None }))
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

struct UdpExchange {
    socket: Option<UdpSocket>,
}

impl UdpExchange {
    /// Returns a socket of the right address family for `server`, binding a
    /// new one when the family changes between servers.
    async fn socket_for(&mut self, server: SocketAddr) -> Result<&UdpSocket, DomainError> {
        let reusable = match &self.socket {
            Some(socket) => socket
                .local_addr()
                .map(|local| local.is_ipv4() == server.is_ipv4())
                .unwrap_or(false),
            None => false,
        };

        if !reusable {
            // Bind to ephemeral port (0 = OS assigns)
            let bind_addr: SocketAddr = if server.is_ipv4() {
                (Ipv4Addr::UNSPECIFIED, 0).into()
            } else {
                (Ipv6Addr::UNSPECIFIED, 0).into()
            };
            let socket = UdpSocket::bind(bind_addr)
                .await
                .map_err(|e| DomainError::Io(format!("Failed to bind UDP socket: {}", e)))?;
            self.socket = Some(socket);
        }

        self.socket
            .as_ref()
            .ok_or_else(|| DomainError::Io("UDP socket not bound".to_string()))
    }
}

#[async_trait]
impl Exchange for UdpExchange {
    async fn send(&mut self, server: SocketAddr, message: &[u8]) -> Result<(), DomainError> {
        let socket = self.socket_for(server).await?;
        let bytes_sent = socket.send_to(message, server).await.map_err(|e| {
            DomainError::Io(format!("Failed to send UDP query to {}: {}", server, e))
        })?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");
        Ok(())
    }

    async fn recv(&mut self) -> Result<Datagram, DomainError> {
        let socket = match &self.socket {
            Some(socket) => socket,
            None => std::future::pending().await,
        };

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (bytes_received, source) = socket
            .recv_from(&mut recv_buf)
            .await
            .map_err(|e| DomainError::Io(format!("Failed to receive UDP response: {}", e)))?;
        recv_buf.truncate(bytes_received);

        debug!(source = %source, bytes_received = bytes_received, "UDP datagram received");

        Ok(Datagram {
            bytes: recv_buf,
            source,
        })
    }
}
