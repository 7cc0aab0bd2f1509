use super::label::decode_name;
use ferrous_stub_domain::{DomainError, DomainName};

/// Bounds-checked cursor over a received message buffer.
///
/// Every read either advances the cursor or fails with
/// `DomainError::MalformedMessage`; nothing is ever read past the end.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn message(&self) -> &'a [u8] {
        self.buf
    }

    pub fn read_u8(&mut self) -> Result<u8, DomainError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| truncated("byte", self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, DomainError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DomainError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DomainError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| truncated(&format!("{}-byte field", len), self.pos))?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads a possibly compressed name and moves past it (past the pointer,
    /// not the pointed-to data).
    pub fn read_name(&mut self) -> Result<DomainName, DomainError> {
        let (name, next) = decode_name(self.buf, self.pos)?;
        self.pos = next;
        Ok(name)
    }
}

fn truncated(what: &str, offset: usize) -> DomainError {
    DomainError::MalformedMessage(format!("truncated {} at offset {}", what, offset))
}
