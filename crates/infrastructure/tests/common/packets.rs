//! Canned server replies built from the query they answer.

use std::net::Ipv4Addr;

/// Pointer to the question name, which always starts right after the header.
pub const QNAME_POINTER: [u8; 2] = [0xC0, 0x0C];

fn reply_header(query: &[u8], flags: u16, ancount: u16) -> Vec<u8> {
    let mut reply = Vec::with_capacity(512);
    reply.extend_from_slice(&query[0..2]);
    reply.extend_from_slice(&flags.to_be_bytes());
    reply.extend_from_slice(&[0x00, 0x01]);
    reply.extend_from_slice(&ancount.to_be_bytes());
    reply.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    reply.extend_from_slice(&query[12..]);
    reply
}

fn push_record(reply: &mut Vec<u8>, rtype: u16, ttl: u32, rdata: &[u8]) {
    reply.extend_from_slice(&QNAME_POINTER);
    reply.extend_from_slice(&rtype.to_be_bytes());
    reply.extend_from_slice(&[0x00, 0x01]);
    reply.extend_from_slice(&ttl.to_be_bytes());
    reply.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    reply.extend_from_slice(rdata);
}

/// Answers the query with one A record per address.
pub fn a_reply(query: &[u8], addrs: &[Ipv4Addr]) -> Vec<u8> {
    let mut reply = reply_header(query, 0x8180, addrs.len() as u16);
    for addr in addrs {
        push_record(&mut reply, 1, 3600, &addr.octets());
    }
    reply
}

/// Empty answer section with the given response code.
pub fn rcode_reply(query: &[u8], rcode: u8) -> Vec<u8> {
    reply_header(query, 0x8180 | u16::from(rcode & 0x0F), 0)
}

/// MX answers whose exchanges are `label` under the queried name, written
/// as `label` followed by a pointer back to the question name.
pub fn mx_reply(query: &[u8], exchanges: &[(u16, &str)]) -> Vec<u8> {
    let mut reply = reply_header(query, 0x8180, exchanges.len() as u16);
    for (preference, label) in exchanges {
        let mut rdata = preference.to_be_bytes().to_vec();
        rdata.push(label.len() as u8);
        rdata.extend_from_slice(label.as_bytes());
        rdata.extend_from_slice(&QNAME_POINTER);
        push_record(&mut reply, 15, 300, &rdata);
    }
    reply
}

/// Same bytes with a different transaction id.
pub fn with_id(mut message: Vec<u8>, id: u16) -> Vec<u8> {
    message[0..2].copy_from_slice(&id.to_be_bytes());
    message
}

pub fn query_id(query: &[u8]) -> u16 {
    u16::from_be_bytes([query[0], query[1]])
}

/// Header only, claiming one question that is not there.
pub fn truncated_reply(query: &[u8]) -> Vec<u8> {
    let mut reply = query[0..2].to_vec();
    reply.extend_from_slice(&[0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
    reply
}
