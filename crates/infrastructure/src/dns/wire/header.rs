use super::reader::WireReader;
use ferrous_stub_domain::{DomainError, Header, HeaderFlags};

pub fn write_header(header: &Header, out: &mut Vec<u8>) {
    out.extend_from_slice(&header.id.to_be_bytes());
    out.extend_from_slice(&header.flags.to_u16().to_be_bytes());
    out.extend_from_slice(&header.qdcount.to_be_bytes());
    out.extend_from_slice(&header.ancount.to_be_bytes());
    out.extend_from_slice(&header.nscount.to_be_bytes());
    out.extend_from_slice(&header.arcount.to_be_bytes());
}

pub fn read_header(reader: &mut WireReader<'_>) -> Result<Header, DomainError> {
    Ok(Header {
        id: reader.read_u16()?,
        flags: HeaderFlags::from_u16(reader.read_u16()?),
        qdcount: reader.read_u16()?,
        ancount: reader.read_u16()?,
        nscount: reader.read_u16()?,
        arcount: reader.read_u16()?,
    })
}

/// Reads only the transaction id, for matching replies before a full parse.
pub fn peek_id(message: &[u8]) -> Option<u16> {
    match message {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrous_stub_domain::{OpCode, ResponseCode, HEADER_LEN};

    #[test]
    fn test_header_round_trip() {
        let header = Header {
            id: 0xBEEF,
            flags: HeaderFlags {
                response: true,
                opcode: OpCode::Query,
                authoritative: true,
                truncated: false,
                recursion_desired: true,
                recursion_available: true,
                z: 0,
                response_code: ResponseCode::NXDomain,
            },
            qdcount: 1,
            ancount: 0,
            nscount: 1,
            arcount: 0,
        };

        let mut out = Vec::new();
        write_header(&header, &mut out);
        assert_eq!(out.len(), HEADER_LEN);
        assert_eq!(&out[2..4], &[0x85, 0x83]);

        let mut reader = WireReader::new(&out);
        assert_eq!(read_header(&mut reader).unwrap(), header);
    }

    #[test]
    fn test_peek_id() {
        assert_eq!(peek_id(&[0xAB, 0xCD, 0x01]), Some(0xABCD));
        assert_eq!(peek_id(&[0xAB]), None);
    }
}
