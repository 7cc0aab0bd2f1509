//! Ferrous Stub Domain Layer
pub mod config;
pub mod dns_message;
pub mod dns_name;
pub mod dns_record;
pub mod errors;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use dns_message::{Header, HeaderFlags, Message, OpCode, Question, ResponseCode, HEADER_LEN};
pub use dns_name::{DomainName, MAX_LABEL_LEN, MAX_NAME_LEN};
pub use dns_record::{RData, RecordClass, RecordType, ResourceRecord};
pub use errors::{DomainError, ResolutionReason};
