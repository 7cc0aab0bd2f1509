#![allow(dead_code)]
use ferrous_stub_domain::{
    DomainName, Header, HeaderFlags, Message, Question, RData, RecordClass, RecordType,
    ResourceRecord, ResponseCode,
};
use std::net::Ipv4Addr;

pub struct RecordBuilder {
    name: DomainName,
    record_type: RecordType,
    ttl: u32,
    data: RData,
}

impl RecordBuilder {
    pub fn a(name: &str, addr: [u8; 4]) -> Self {
        Self {
            name: name.parse().unwrap(),
            record_type: RecordType::A,
            ttl: 300,
            data: RData::A(Ipv4Addr::from(addr)),
        }
    }

    pub fn cname(name: &str, target: &str) -> Self {
        Self {
            name: name.parse().unwrap(),
            record_type: RecordType::CNAME,
            ttl: 300,
            data: RData::Name(target.parse().unwrap()),
        }
    }

    pub fn mx(name: &str, preference: u16, exchange: &str) -> Self {
        Self {
            name: name.parse().unwrap(),
            record_type: RecordType::MX,
            ttl: 300,
            data: RData::MX {
                preference,
                exchange: exchange.parse().unwrap(),
            },
        }
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn build(self) -> ResourceRecord {
        ResourceRecord::new(self.name, self.record_type, RecordClass::IN, self.ttl, self.data)
    }
}

/// Builds decoded messages as a parser would hand them back.
pub struct ResponseBuilder {
    id: u16,
    question: Question,
    response_code: ResponseCode,
    answers: Vec<ResourceRecord>,
}

impl ResponseBuilder {
    pub fn response(hostname: &str, record_type: RecordType) -> Self {
        Self {
            id: 0x5DD5,
            question: Question::new(hostname.parse().unwrap(), record_type),
            response_code: ResponseCode::NoError,
            answers: Vec::new(),
        }
    }

    pub fn response_code(mut self, response_code: ResponseCode) -> Self {
        self.response_code = response_code;
        self
    }

    pub fn answer(mut self, record: RecordBuilder) -> Self {
        self.answers.push(record.build());
        self
    }

    pub fn build(self) -> Message {
        let flags = HeaderFlags {
            response: true,
            recursion_desired: true,
            recursion_available: true,
            response_code: self.response_code,
            ..HeaderFlags::default()
        };
        Message {
            header: Header {
                id: self.id,
                flags,
                qdcount: 1,
                ancount: self.answers.len() as u16,
                nscount: 0,
                arcount: 0,
            },
            questions: vec![self.question],
            answers: self.answers,
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }
}
