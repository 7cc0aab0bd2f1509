//! Shared-socket UDP transport.
//!
//! One socket serves any number of concurrent queries. A single reader task
//! owns the receive path and routes each datagram to the query waiting on
//! its transaction id; datagrams for ids nobody is waiting on are dropped.

use super::{Datagram, DnsTransport, Exchange, MAX_UDP_RESPONSE_SIZE};
use crate::dns::wire::peek_id;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ferrous_stub_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

// Replies buffered per waiting query before extras are dropped.
const PER_QUERY_BACKLOG: usize = 8;

const MIN_RECV_BACKOFF: Duration = Duration::from_millis(10);
const MAX_RECV_BACKOFF: Duration = Duration::from_secs(1);

type PendingMap = DashMap<u16, mpsc::Sender<Datagram>>;

pub struct UdpMultiplexer {
    socket: Arc<UdpSocket>,
    pending: Arc<PendingMap>,
    reader: JoinHandle<()>,
}

impl UdpMultiplexer {
    /// Binds the shared socket and starts the reader task.
    pub async fn bind(local: SocketAddr) -> Result<Self, DomainError> {
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| DomainError::Io(format!("Failed to bind UDP socket: {}", e)))?;
        let socket = Arc::new(socket);
        let pending: Arc<PendingMap> = Arc::new(DashMap::new());

        let reader = tokio::spawn(read_loop(Arc::clone(&socket), Arc::clone(&pending)));

        info!(local = ?socket.local_addr().ok(), "UDP multiplexer started");

        Ok(Self {
            socket,
            pending,
            reader,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        self.socket
            .local_addr()
            .map_err(|e| DomainError::Io(e.to_string()))
    }

    /// Number of queries currently waiting for a reply.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for UdpMultiplexer {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(socket: Arc<UdpSocket>, pending: Arc<PendingMap>) {
    let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    let mut backoff = RecvBackoff::default();
    loop {
        let (len, source) = match socket.recv_from(&mut buf).await {
            Ok(received) => {
                backoff.reset();
                received
            }
            Err(e) => {
                match backoff.on_error(&e) {
                    Some(delay) => {
                        warn!(error = %e, delay = ?delay, "UDP multiplexer receive failed");
                        tokio::time::sleep(delay).await;
                    }
                    None => debug!(error = %e, "UDP multiplexer receive reset"),
                }
                continue;
            }
        };

        let Some(id) = peek_id(&buf[..len]) else {
            trace!(source = %source, len, "Dropping runt datagram");
            continue;
        };

        let sender = pending.get(&id).map(|entry| entry.value().clone());
        match sender {
            Some(tx) => {
                let datagram = Datagram {
                    bytes: buf[..len].to_vec(),
                    source,
                };
                if tx.try_send(datagram).is_err() {
                    debug!(id, source = %source, "Waiting query backlog full, dropping datagram");
                }
            }
            None => {
                trace!(id, source = %source, "No query waiting on id, dropping datagram");
            }
        }
    }
}

/// Delay before the reader retries a failing socket.
///
/// `ConnectionReset` is the ICMP port-unreachable echo of an earlier send on
/// some platforms and is retried at once. Other errors back off, doubling up
/// to `MAX_RECV_BACKOFF` until a receive succeeds again.
#[derive(Debug, Default)]
struct RecvBackoff {
    current: Option<Duration>,
}

impl RecvBackoff {
    fn on_error(&mut self, error: &io::Error) -> Option<Duration> {
        if error.kind() == io::ErrorKind::ConnectionReset {
            return None;
        }
        let delay = match self.current {
            Some(previous) => (previous * 2).min(MAX_RECV_BACKOFF),
            None => MIN_RECV_BACKOFF,
        };
        self.current = Some(delay);
        Some(delay)
    }

    fn reset(&mut self) {
        self.current = None;
    }
}

#[async_trait]
impl DnsTransport for UdpMultiplexer {
    async fn open(&self, transaction_id: u16) -> Result<Box<dyn Exchange>, DomainError> {
        let rx = match self.pending.entry(transaction_id) {
            Entry::Occupied(_) => return Err(DomainError::TransactionIdInUse(transaction_id)),
            Entry::Vacant(slot) => {
                let (tx, rx) = mpsc::channel(PER_QUERY_BACKLOG);
                slot.insert(tx);
                rx
            }
        };

        Ok(Box::new(MuxExchange {
            id: transaction_id,
            socket: Arc::clone(&self.socket),
            pending: Arc::clone(&self.pending),
            rx,
        }))
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

/// Registration for one transaction id; unregisters itself when dropped.
struct MuxExchange {
    id: u16,
    socket: Arc<UdpSocket>,
    pending: Arc<PendingMap>,
    rx: mpsc::Receiver<Datagram>,
}

#[async_trait]
impl Exchange for MuxExchange {
    async fn send(&mut self, server: SocketAddr, message: &[u8]) -> Result<(), DomainError> {
        self.socket.send_to(message, server).await.map_err(|e| {
            DomainError::Io(format!("Failed to send UDP query to {}: {}", server, e))
        })?;
        debug!(id = self.id, server = %server, "Multiplexed UDP query sent");
        Ok(())
    }

    async fn recv(&mut self) -> Result<Datagram, DomainError> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| DomainError::Io("UDP multiplexer reader stopped".to_string()))
    }
}

impl Drop for MuxExchange {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}
