use super::header::read_header;
use super::label::decode_name;
use super::reader::WireReader;
use ferrous_stub_domain::{
    DomainError, DomainName, Message, Question, RData, RecordClass, RecordType, ResourceRecord,
    HEADER_LEN,
};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;

// Caps preallocation; counts come straight off the wire.
const MAX_PREALLOCATED_RECORDS: usize = 32;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes a complete message: header, exactly QDCOUNT questions, then
    /// ANCOUNT + NSCOUNT + ARCOUNT resource records.
    ///
    /// Either the whole message decodes or a `MalformedMessage` error is
    /// returned; nothing partial escapes. Bytes after the last declared
    /// record are ignored.
    pub fn parse(response_bytes: &[u8]) -> Result<Message, DomainError> {
        if response_bytes.len() < HEADER_LEN {
            return Err(DomainError::MalformedMessage(format!(
                "message is {} bytes, header alone needs {}",
                response_bytes.len(),
                HEADER_LEN
            )));
        }

        let mut reader = WireReader::new(response_bytes);
        let header = read_header(&mut reader)?;

        let mut questions = Vec::with_capacity(capacity_for(header.qdcount));
        for _ in 0..header.qdcount {
            questions.push(read_question(&mut reader)?);
        }

        let answers = read_records(&mut reader, header.ancount)?;
        let authorities = read_records(&mut reader, header.nscount)?;
        let additionals = read_records(&mut reader, header.arcount)?;

        debug!(
            id = header.id,
            rcode = %header.flags.response_code,
            truncated = header.flags.truncated,
            answers = answers.len(),
            authority = authorities.len(),
            additional = additionals.len(),
            "DNS response parsed"
        );

        Ok(Message {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

fn capacity_for(count: u16) -> usize {
    usize::from(count).min(MAX_PREALLOCATED_RECORDS)
}

fn read_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
    let name = reader.read_name()?;
    let record_type = RecordType::from_u16(reader.read_u16()?);
    let class = RecordClass::from_u16(reader.read_u16()?);
    Ok(Question {
        name,
        record_type,
        class,
    })
}

fn read_records(
    reader: &mut WireReader<'_>,
    count: u16,
) -> Result<Vec<ResourceRecord>, DomainError> {
    let mut records = Vec::with_capacity(capacity_for(count));
    for _ in 0..count {
        records.push(read_record(reader)?);
    }
    Ok(records)
}

fn read_record(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
    let name = reader.read_name()?;
    let record_type = RecordType::from_u16(reader.read_u16()?);
    let class = RecordClass::from_u16(reader.read_u16()?);
    let ttl = reader.read_u32()?;
    let rdlength = usize::from(reader.read_u16()?);

    let rdata_start = reader.position();
    let rdata = reader.read_bytes(rdlength)?;
    let data = read_rdata(reader.message(), record_type, rdata_start, rdata)?;

    Ok(ResourceRecord {
        name,
        record_type,
        class,
        ttl,
        data,
    })
}

/// Interprets RDATA. `start` is the RDATA offset in `message`, which name
/// decoding needs so compression pointers resolve against the whole buffer.
fn read_rdata(
    message: &[u8],
    record_type: RecordType,
    start: usize,
    rdata: &[u8],
) -> Result<RData, DomainError> {
    match record_type {
        RecordType::A => {
            let octets: [u8; 4] = rdata.try_into().map_err(|_| {
                DomainError::MalformedMessage(format!(
                    "A record RDLENGTH is {}, expected 4",
                    rdata.len()
                ))
            })?;
            Ok(RData::A(Ipv4Addr::from(octets)))
        }
        RecordType::AAAA => {
            let octets: [u8; 16] = rdata.try_into().map_err(|_| {
                DomainError::MalformedMessage(format!(
                    "AAAA record RDLENGTH is {}, expected 16",
                    rdata.len()
                ))
            })?;
            Ok(RData::AAAA(Ipv6Addr::from(octets)))
        }
        RecordType::MX => {
            if rdata.len() < 3 {
                return Err(DomainError::MalformedMessage(format!(
                    "MX record RDLENGTH is {}, too short",
                    rdata.len()
                )));
            }
            let preference = u16::from_be_bytes([rdata[0], rdata[1]]);
            let exchange = read_rdata_name(message, start + 2, start + rdata.len())?;
            Ok(RData::MX {
                preference,
                exchange,
            })
        }
        t if t.has_name_rdata() => Ok(RData::Name(read_rdata_name(
            message,
            start,
            start + rdata.len(),
        )?)),
        _ => Ok(RData::Opaque(rdata.into())),
    }
}

/// A name inside RDATA must end exactly at the RDATA boundary.
fn read_rdata_name(message: &[u8], start: usize, end: usize) -> Result<DomainName, DomainError> {
    let (name, next) = decode_name(&message[..end], start)?;
    if next != end {
        return Err(DomainError::MalformedMessage(format!(
            "name in RDATA at offset {} ends at {}, RDLENGTH ends at {}",
            start, next, end
        )));
    }
    Ok(name)
}
