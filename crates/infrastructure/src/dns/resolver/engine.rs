use super::context::QueryContext;
use super::id::{RandomIds, TransactionIdSource};
use super::validation::{check_reply, ReplyCheck};
use crate::dns::transport::{DnsTransport, Exchange};
use crate::dns::wire::MessageBuilder;
use ferrous_stub_domain::{
    DomainError, DomainName, Message, Question, RecordType, ResolutionReason, ResolverConfig,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, instrument, warn};

// Fresh ids tried when a multiplexing transport reports a collision.
const MAX_ID_DRAWS: usize = 16;

/// Outcome of one wait for a reply from one server.
enum Wait {
    Reply(Message),
    Deadline,
    Malformed(DomainError),
    Io(DomainError),
}

/// Outcome of querying one server until it answers or the retries run out.
enum ServerOutcome {
    Answered(Message),
    Exhausted,
    Malformed(DomainError),
}

/// Stub resolver: sends one question to an ordered list of servers, retrying
/// on timeout while the shared retry budget lasts and failing over to the next.
pub struct StubResolver {
    servers: Vec<SocketAddr>,
    timeout: Duration,
    max_retries: u32,
    recursion_desired: bool,
    transport: Arc<dyn DnsTransport>,
    ids: Arc<dyn TransactionIdSource>,
}

impl StubResolver {
    pub fn new(
        config: &ResolverConfig,
        transport: Arc<dyn DnsTransport>,
    ) -> Result<Self, DomainError> {
        let servers = config.server_addrs()?;
        Ok(
            Self::with_servers(servers, config.timeout(), config.max_retries, transport)
                .with_recursion_desired(config.recursion_desired),
        )
    }

    pub fn with_servers(
        servers: Vec<SocketAddr>,
        timeout: Duration,
        max_retries: u32,
        transport: Arc<dyn DnsTransport>,
    ) -> Self {
        Self {
            servers,
            timeout,
            max_retries,
            recursion_desired: true,
            transport,
            ids: Arc::new(RandomIds::new()),
        }
    }

    /// Replace the random id generator, e.g. with a seeded one in tests.
    pub fn with_id_source(mut self, ids: Arc<dyn TransactionIdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_recursion_desired(mut self, recursion_desired: bool) -> Self {
        self.recursion_desired = recursion_desired;
        self
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Resolve `hostname` for `record_type`.
    ///
    /// Every server gets one send. A timed-out send is repeated to the same
    /// server while any of the `max_retries` resends, shared by the whole
    /// server list, remain. Each wait is bounded by the configured timeout.
    /// A reply with a nonzero response code is still a successful result.
    /// When every server is exhausted the error carries the last server's
    /// failure reason.
    #[instrument(skip(self), fields(transport = self.transport.protocol_name()))]
    pub async fn resolve(
        &self,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<Message, DomainError> {
        let name: DomainName = hostname.parse()?;
        if self.servers.is_empty() {
            return Err(DomainError::resolution(ResolutionReason::NoServers));
        }

        let (id, mut exchange) = self.open_exchange().await?;
        let mut ctx = QueryContext::new(id, Question::new(name, record_type), self.max_retries);
        let query = MessageBuilder::build(id, &ctx.question, self.recursion_desired);

        let mut last_failure = ResolutionReason::Timeout;
        for (position, &server) in self.servers.iter().enumerate() {
            match self
                .query_server(&mut ctx, exchange.as_mut(), server, &query)
                .await
            {
                ServerOutcome::Answered(message) => {
                    ctx.succeed();
                    debug!(
                        id,
                        server = %server,
                        position,
                        attempts = ctx.attempts(),
                        discarded = ctx.discarded(),
                        rcode = %message.response_code(),
                        answers = message.answers.len(),
                        "Query answered"
                    );
                    return Ok(message);
                }
                ServerOutcome::Exhausted => {
                    last_failure = ResolutionReason::Timeout;
                    warn!(id, server = %server, position, "Server did not answer, failing over");
                }
                ServerOutcome::Malformed(e) => {
                    last_failure = ResolutionReason::MalformedResponse;
                    warn!(
                        id,
                        server = %server,
                        position,
                        error = %e,
                        "Malformed reply, failing over"
                    );
                }
            }
        }

        ctx.fail();
        warn!(
            id,
            state = %ctx.state(),
            attempts = ctx.attempts(),
            reason = %last_failure,
            "Resolution failed on all servers"
        );
        Err(DomainError::resolution(last_failure))
    }

    async fn open_exchange(&self) -> Result<(u16, Box<dyn Exchange>), DomainError> {
        let mut draws = 1;
        loop {
            let id = self.ids.next_id();
            match self.transport.open(id).await {
                Ok(exchange) => return Ok((id, exchange)),
                Err(DomainError::TransactionIdInUse(_)) if draws < MAX_ID_DRAWS => {
                    debug!(id, "Transaction id already outstanding, drawing another");
                    draws += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn query_server(
        &self,
        ctx: &mut QueryContext,
        exchange: &mut dyn Exchange,
        server: SocketAddr,
        query: &[u8],
    ) -> ServerOutcome {
        loop {
            ctx.record_send(server);
            if let Err(e) = exchange.send(server, query).await {
                warn!(id = ctx.id, server = %server, error = %e, "Send failed");
                return ServerOutcome::Exhausted;
            }

            match self.await_reply(ctx, exchange, server).await {
                Wait::Reply(message) => return ServerOutcome::Answered(message),
                Wait::Malformed(e) => return ServerOutcome::Malformed(e),
                Wait::Io(e) => {
                    warn!(id = ctx.id, server = %server, error = %e, "Receive failed");
                    return ServerOutcome::Exhausted;
                }
                Wait::Deadline => {
                    ctx.record_timeout();
                    debug!(
                        id = ctx.id,
                        server = %server,
                        attempt = ctx.attempts_on_server(),
                        retries_left = ctx.retries_left(),
                        timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                        "Query timed out"
                    );
                    if !ctx.take_retry() {
                        return ServerOutcome::Exhausted;
                    }
                }
            }
        }
    }

    /// Waits until `timeout` for a reply that matches the outstanding query.
    /// Non-matching datagrams are dropped without extending the deadline. A
    /// timeout too large to form a deadline waits without one.
    async fn await_reply(
        &self,
        ctx: &mut QueryContext,
        exchange: &mut dyn Exchange,
        server: SocketAddr,
    ) -> Wait {
        let deadline = Instant::now().checked_add(self.timeout);
        loop {
            let received = match deadline {
                Some(deadline) => match timeout_at(deadline, exchange.recv()).await {
                    Ok(received) => received,
                    Err(_) => return Wait::Deadline,
                },
                None => exchange.recv().await,
            };
            let datagram = match received {
                Ok(datagram) => datagram,
                Err(e) => return Wait::Io(e),
            };

            match check_reply(ctx, server, &datagram) {
                ReplyCheck::Accept(message) => return Wait::Reply(message),
                ReplyCheck::Malformed(e) => return Wait::Malformed(e),
                ReplyCheck::Discard(reason) => {
                    ctx.record_discard();
                    debug!(
                        id = ctx.id,
                        source = %datagram.source,
                        reason,
                        "Discarding reply"
                    );
                }
            }
        }
    }
}
