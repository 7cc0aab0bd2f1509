use super::context::QueryContext;
use crate::dns::transport::Datagram;
use crate::dns::wire::{peek_id, ResponseParser};
use ferrous_stub_domain::{DomainError, Message};
use std::net::SocketAddr;

/// What to do with a datagram received while a query is outstanding.
#[derive(Debug)]
pub enum ReplyCheck {
    /// The reply answers the outstanding query.
    Accept(Message),

    /// Not ours (wrong source, id or question); keep waiting.
    Discard(&'static str),

    /// Carries our id from the queried server but does not decode.
    Malformed(DomainError),
}

/// Matches `datagram` against the outstanding query.
///
/// Source and transaction id are checked before decoding so that unrelated
/// traffic can never turn into a `Malformed` verdict.
pub fn check_reply(ctx: &QueryContext, server: SocketAddr, datagram: &Datagram) -> ReplyCheck {
    if datagram.source != server {
        return ReplyCheck::Discard("unexpected source");
    }

    match peek_id(&datagram.bytes) {
        Some(id) if id == ctx.id => {}
        _ => return ReplyCheck::Discard("transaction id mismatch"),
    }

    let message = match ResponseParser::parse(&datagram.bytes) {
        Ok(message) => message,
        Err(e) => return ReplyCheck::Malformed(e),
    };

    if !message.header.flags.response {
        return ReplyCheck::Discard("QR bit not set");
    }

    match message.questions.as_slice() {
        [echoed] if echoed.matches(&ctx.question) => ReplyCheck::Accept(message),
        _ => ReplyCheck::Discard("question not echoed"),
    }
}
