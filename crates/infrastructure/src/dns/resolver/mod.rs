pub mod context;
pub mod engine;
pub mod id;
pub mod validation;

pub use context::{QueryContext, QueryState};
pub use engine::StubResolver;
pub use id::{RandomIds, TransactionIdSource};
pub use validation::{check_reply, ReplyCheck};

use crate::dns::transport::UdpTransport;
use ferrous_stub_domain::{DomainError, Message, RecordType};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// One-shot resolution over a fresh UDP socket with random transaction ids.
pub async fn resolve(
    hostname: &str,
    record_type: RecordType,
    servers: &[SocketAddr],
    timeout: Duration,
    max_retries: u32,
) -> Result<Message, DomainError> {
    StubResolver::with_servers(
        servers.to_vec(),
        timeout,
        max_retries,
        Arc::new(UdpTransport::new()),
    )
    .resolve(hostname, record_type)
    .await
}
