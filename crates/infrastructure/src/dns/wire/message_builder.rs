//! DNS Message Builder
//!
//! Constructs single-question query messages in wire format.

use super::header::write_header;
use super::label::encode_name;
use ferrous_stub_domain::{
    DomainError, DomainName, Header, HeaderFlags, Question, RecordType, HEADER_LEN,
};

/// Initial buffer size for an outgoing query; enough for any ordinary
/// hostname plus header and question trailer.
pub const QUERY_BUFFER_SIZE: usize = 256;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a standard query for `hostname`.
    ///
    /// The header carries `id`, opcode QUERY, RD set and QDCOUNT=1; the
    /// question uses class IN. Output depends only on the arguments, so the
    /// caller is responsible for picking an unpredictable `id`.
    pub fn build_query(
        id: u16,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<Vec<u8>, DomainError> {
        let name: DomainName = hostname.parse()?;
        Ok(Self::build(id, &Question::new(name, record_type), true))
    }

    /// Build a query for an already validated question.
    pub fn build(id: u16, question: &Question, recursion_desired: bool) -> Vec<u8> {
        let header = Header {
            id,
            flags: HeaderFlags::query(recursion_desired),
            qdcount: 1,
            ..Header::default()
        };

        let needed = HEADER_LEN + question.name.encoded_len() + 4;
        let mut buf = Vec::with_capacity(needed.max(QUERY_BUFFER_SIZE));
        write_header(&header, &mut buf);
        encode_name(&question.name, &mut buf);
        buf.extend_from_slice(&question.record_type.to_u16().to_be_bytes());
        buf.extend_from_slice(&question.class.to_u16().to_be_bytes());
        buf
    }
}
