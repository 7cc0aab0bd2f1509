use ferrous_stub_domain::Question;
use std::fmt;
use std::net::SocketAddr;

/// Lifecycle of one query: `Idle → Sent → (Succeeded | TimedOut → Sent | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Sent,
    TimedOut,
    Succeeded,
    Failed,
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryState::Idle => "idle",
            QueryState::Sent => "sent",
            QueryState::TimedOut => "timed-out",
            QueryState::Succeeded => "succeeded",
            QueryState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// State owned by the engine for a single in-flight query.
#[derive(Debug)]
pub struct QueryContext {
    pub id: u16,
    pub question: Question,
    state: QueryState,
    server: Option<SocketAddr>,
    attempts: u32,
    attempts_on_server: u32,
    retries_left: u32,
    discarded: u32,
}

impl QueryContext {
    /// `max_retries` is the resend budget shared by every server in the list.
    pub fn new(id: u16, question: Question, max_retries: u32) -> Self {
        Self {
            id,
            question,
            state: QueryState::Idle,
            server: None,
            attempts: 0,
            attempts_on_server: 0,
            retries_left: max_retries,
            discarded: 0,
        }
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn server(&self) -> Option<SocketAddr> {
        self.server
    }

    /// Total sends across all servers.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn attempts_on_server(&self) -> u32 {
        self.attempts_on_server
    }

    pub fn retries_left(&self) -> u32 {
        self.retries_left
    }

    /// Spends one resend from the shared budget; false once it is used up.
    pub fn take_retry(&mut self) -> bool {
        match self.retries_left.checked_sub(1) {
            Some(left) => {
                self.retries_left = left;
                true
            }
            None => false,
        }
    }

    /// Replies thrown away as stale, spoofed or unrelated.
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    pub fn record_send(&mut self, server: SocketAddr) {
        if self.server != Some(server) {
            self.server = Some(server);
            self.attempts_on_server = 0;
        }
        self.attempts += 1;
        self.attempts_on_server += 1;
        self.state = QueryState::Sent;
    }

    pub fn record_discard(&mut self) {
        self.discarded += 1;
    }

    pub fn record_timeout(&mut self) {
        self.state = QueryState::TimedOut;
    }

    pub fn succeed(&mut self) {
        self.state = QueryState::Succeeded;
    }

    pub fn fail(&mut self) {
        self.state = QueryState::Failed;
    }
}
