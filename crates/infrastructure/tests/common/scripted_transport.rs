use async_trait::async_trait;
use ferrous_stub_domain::DomainError;
use ferrous_stub_infrastructure::dns::resolver::TransactionIdSource;
use ferrous_stub_infrastructure::dns::transport::{Datagram, DnsTransport, Exchange};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Produces the datagrams a server sends back for one received query.
pub type Responder = Box<dyn Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync>;

/// In-memory transport. Each server is scripted with a responder; servers
/// without one never answer.
pub struct ScriptedTransport {
    responders: Arc<HashMap<SocketAddr, Responder>>,
    sent: Arc<Mutex<Vec<(SocketAddr, Vec<u8>)>>>,
}

impl ScriptedTransport {
    pub fn builder() -> ScriptedTransportBuilder {
        ScriptedTransportBuilder {
            responders: HashMap::new(),
        }
    }

    pub fn silent() -> Arc<Self> {
        Self::builder().build()
    }

    /// Every query sent so far, in order.
    pub fn sent(&self) -> Vec<(SocketAddr, Vec<u8>)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sends_to(&self, server: SocketAddr) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == server)
            .count()
    }
}

pub struct ScriptedTransportBuilder {
    responders: HashMap<SocketAddr, Responder>,
}

impl ScriptedTransportBuilder {
    pub fn respond<F>(mut self, server: SocketAddr, responder: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        self.responders.insert(server, Box::new(responder));
        self
    }

    pub fn build(self) -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport {
            responders: Arc::new(self.responders),
            sent: Arc::new(Mutex::new(Vec::new())),
        })
    }
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn open(&self, _transaction_id: u16) -> Result<Box<dyn Exchange>, DomainError> {
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Box::new(ScriptedExchange {
            responders: Arc::clone(&self.responders),
            sent: Arc::clone(&self.sent),
            tx,
            rx,
        }))
    }

    fn protocol_name(&self) -> &'static str {
        "scripted"
    }
}

struct ScriptedExchange {
    responders: Arc<HashMap<SocketAddr, Responder>>,
    sent: Arc<Mutex<Vec<(SocketAddr, Vec<u8>)>>>,
    tx: mpsc::UnboundedSender<Datagram>,
    rx: mpsc::UnboundedReceiver<Datagram>,
}

#[async_trait]
impl Exchange for ScriptedExchange {
    async fn send(&mut self, server: SocketAddr, message: &[u8]) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push((server, message.to_vec()));
        if let Some(responder) = self.responders.get(&server) {
            for bytes in responder(message) {
                let _ = self.tx.send(Datagram {
                    bytes,
                    source: server,
                });
            }
        }
        Ok(())
    }

    async fn recv(&mut self) -> Result<Datagram, DomainError> {
        match self.rx.recv().await {
            Some(datagram) => Ok(datagram),
            None => std::future::pending().await,
        }
    }
}

/// Hands out a fixed sequence of ids, then repeats the last one.
pub struct SequenceIds {
    ids: Mutex<VecDeque<u16>>,
    last: Mutex<u16>,
}

impl SequenceIds {
    pub fn new(ids: &[u16]) -> Arc<Self> {
        Arc::new(Self {
            ids: Mutex::new(ids.iter().copied().collect()),
            last: Mutex::new(ids.last().copied().unwrap_or(0)),
        })
    }
}

impl TransactionIdSource for SequenceIds {
    fn next_id(&self) -> u16 {
        self.ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(*self.last.lock().unwrap())
    }
}
