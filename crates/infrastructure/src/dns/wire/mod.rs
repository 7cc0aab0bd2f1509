//! RFC 1035 §4 wire format: header, questions, resource records and
//! label-compressed names.

pub mod header;
pub mod label;
pub mod message_builder;
pub mod reader;
pub mod response_parser;

pub use header::peek_id;
pub use label::{decode_name, encode_hostname, encode_name, MAX_POINTER_DEPTH};
pub use message_builder::MessageBuilder;
pub use reader::WireReader;
pub use response_parser::ResponseParser;
