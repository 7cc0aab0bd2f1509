use crate::dns_name::DomainName;
use crate::dns_record::{RData, RecordClass, RecordType, ResourceRecord};
use std::fmt;
use std::net::IpAddr;

/// Size of the fixed message header.
pub const HEADER_LEN: usize = 12;

const FLAG_QR: u16 = 0x8000;
const FLAG_AA: u16 = 0x0400;
const FLAG_TC: u16 = 0x0200;
const FLAG_RD: u16 = 0x0100;
const FLAG_RA: u16 = 0x0080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpCode {
    #[default]
    Query,
    IQuery,
    Status,
    Notify,
    Update,
    Other(u8),
}

impl OpCode {
    pub fn to_u8(&self) -> u8 {
        match self {
            OpCode::Query => 0,
            OpCode::IQuery => 1,
            OpCode::Status => 2,
            OpCode::Notify => 4,
            OpCode::Update => 5,
            OpCode::Other(code) => *code & 0x0f,
        }
    }

    pub fn from_u8(code: u8) -> Self {
        match code & 0x0f {
            0 => OpCode::Query,
            1 => OpCode::IQuery,
            2 => OpCode::Status,
            4 => OpCode::Notify,
            5 => OpCode::Update,
            other => OpCode::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn to_u8(&self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => *code & 0x0f,
        }
    }

    pub fn from_u8(code: u8) -> Self {
        match code & 0x0f {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NXDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Other(code) => write!(f, "RCODE{}", code),
            known => f.write_str(known.as_str()),
        }
    }
}

/// The 16-bit flags word of the header, unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderFlags {
    pub response: bool,
    pub opcode: OpCode,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    /// The three reserved Z bits, preserved as received.
    pub z: u8,
    pub response_code: ResponseCode,
}

impl HeaderFlags {
    pub fn query(recursion_desired: bool) -> Self {
        Self {
            recursion_desired,
            ..Self::default()
        }
    }

    pub fn to_u16(&self) -> u16 {
        let mut bits = u16::from(self.opcode.to_u8()) << 11;
        bits |= u16::from(self.z & 0x07) << 4;
        bits |= u16::from(self.response_code.to_u8());
        if self.response {
            bits |= FLAG_QR;
        }
        if self.authoritative {
            bits |= FLAG_AA;
        }
        if self.truncated {
            bits |= FLAG_TC;
        }
        if self.recursion_desired {
            bits |= FLAG_RD;
        }
        if self.recursion_available {
            bits |= FLAG_RA;
        }
        bits
    }

    pub fn from_u16(bits: u16) -> Self {
        Self {
            response: bits & FLAG_QR != 0,
            opcode: OpCode::from_u8(((bits >> 11) & 0x0f) as u8),
            authoritative: bits & FLAG_AA != 0,
            truncated: bits & FLAG_TC != 0,
            recursion_desired: bits & FLAG_RD != 0,
            recursion_available: bits & FLAG_RA != 0,
            z: ((bits >> 4) & 0x07) as u8,
            response_code: ResponseCode::from_u8((bits & 0x0f) as u8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: HeaderFlags,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DomainName,
    pub record_type: RecordType,
    pub class: RecordClass,
}

impl Question {
    pub fn new(name: DomainName, record_type: RecordType) -> Self {
        Self {
            name,
            record_type,
            class: RecordClass::IN,
        }
    }

    /// Whether `other` asks the same thing, with names compared
    /// case-insensitively.
    pub fn matches(&self, other: &Question) -> bool {
        self.record_type == other.record_type
            && self.class == other.class
            && self.name.eq_ignore_case(&other.name)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.class, self.record_type)
    }
}

/// A decoded DNS message. Section lengths always agree with the header
/// counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.flags.response_code
    }

    pub fn is_nxdomain(&self) -> bool {
        self.response_code() == ResponseCode::NXDomain
    }

    pub fn truncated(&self) -> bool {
        self.header.flags.truncated
    }

    /// Addresses from A and AAAA answers, in answer order.
    pub fn addresses(&self) -> Vec<IpAddr> {
        self.answers
            .iter()
            .filter_map(|record| record.data.ip_addr())
            .collect()
    }

    /// The first CNAME target in the answer section.
    pub fn cname(&self) -> Option<&DomainName> {
        self.answers
            .iter()
            .find(|record| record.record_type == RecordType::CNAME)
            .and_then(|record| record.data.name())
    }

    /// MX answers as `(preference, exchange)`, lowest preference first.
    pub fn mail_exchangers(&self) -> Vec<(u16, &DomainName)> {
        let mut exchangers: Vec<(u16, &DomainName)> = self
            .answers
            .iter()
            .filter_map(|record| match &record.data {
                RData::MX {
                    preference,
                    exchange,
                } => Some((*preference, exchange)),
                _ => None,
            })
            .collect();
        exchangers.sort_by_key(|(preference, _)| *preference);
        exchangers
    }
}
