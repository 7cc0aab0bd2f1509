use super::{RecordClass, RecordType};
use crate::dns_name::DomainName;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Type-dependent payload of a resource record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),

    AAAA(Ipv6Addr),

    /// CNAME, NS and PTR all carry a single name.
    Name(DomainName),

    MX {
        preference: u16,
        exchange: DomainName,
    },

    /// Anything the codec does not interpret, byte for byte.
    Opaque(Box<[u8]>),
}

impl RData {
    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self {
            RData::A(v4) => Some(IpAddr::V4(*v4)),
            RData::AAAA(v6) => Some(IpAddr::V6(*v6)),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&DomainName> {
        match self {
            RData::Name(name) => Some(name),
            RData::MX { exchange, .. } => Some(exchange),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(v4) => write!(f, "{}", v4),
            RData::AAAA(v6) => write!(f, "{}", v6),
            RData::Name(name) => write!(f, "{}", name),
            RData::MX {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RData::Opaque(bytes) => {
                write!(f, "\\# {}", bytes.len())?;
                if !bytes.is_empty() {
                    f.write_str(" ")?;
                    for byte in bytes.iter() {
                        write!(f, "{:02x}", byte)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DomainName,

    pub record_type: RecordType,

    pub class: RecordClass,

    pub ttl: u32,

    pub data: RData,
}

impl ResourceRecord {
    pub fn new(
        name: DomainName,
        record_type: RecordType,
        class: RecordClass,
        ttl: u32,
        data: RData,
    ) -> Self {
        Self {
            name,
            record_type,
            class,
            ttl,
            data,
        }
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.class, self.record_type, self.data
        )
    }
}
