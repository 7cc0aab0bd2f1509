//! Domain name label codec (RFC 1035 §3.1, §4.1.4)
//!
//! Names travel as a run of length-prefixed labels closed by a zero byte.
//! On decode, a length byte with the top two bits set is a compression
//! pointer: the low 14 bits give an offset earlier in the same message where
//! the rest of the name continues.

use ferrous_stub_domain::{DomainError, DomainName};

/// Longest chain of compression pointers followed for one name.
pub const MAX_POINTER_DEPTH: usize = 10;

const POINTER_MASK: u8 = 0xC0;

/// Appends the uncompressed wire form of `name` to `out`.
pub fn encode_name(name: &DomainName, out: &mut Vec<u8>) {
    for label in name.labels() {
        // DomainName guarantees 1..=63 bytes per label
        out.push(label.len() as u8);
        out.extend_from_slice(label);
    }
    out.push(0);
}

/// Encodes a dotted hostname, rejecting names that break the label or
/// total length limits.
///
/// `encode_hostname("www.sandiego.edu")` gives `(3)www(8)sandiego(3)edu(0)`.
pub fn encode_hostname(hostname: &str) -> Result<Vec<u8>, DomainError> {
    let name: DomainName = hostname.parse()?;
    let mut out = Vec::with_capacity(name.encoded_len());
    encode_name(&name, &mut out);
    Ok(out)
}

/// Decodes the name starting at `offset` inside the full `message`.
///
/// Returns the name and the offset just past it. When the name ends in a
/// compression pointer, that offset is the byte after the 2-byte pointer,
/// not after the pointed-to labels.
///
/// Pointers must point strictly backward and at most
/// [`MAX_POINTER_DEPTH`] of them are followed.
pub fn decode_name(message: &[u8], offset: usize) -> Result<(DomainName, usize), DomainError> {
    let mut name = DomainName::root();
    let mut pos = offset;
    let mut resume_at: Option<usize> = None;
    let mut depth = 0;

    loop {
        let len = *message.get(pos).ok_or_else(|| {
            malformed(format!("name at offset {} runs past end of message", offset))
        })?;

        match len & POINTER_MASK {
            0x00 if len == 0 => {
                return Ok((name, resume_at.unwrap_or(pos + 1)));
            }
            0x00 => {
                let start = pos + 1;
                let end = start + usize::from(len);
                let label = message.get(start..end).ok_or_else(|| {
                    malformed(format!("label at offset {} runs past end of message", pos))
                })?;
                name.push_label(label)
                    .map_err(|e| malformed(format!("name at offset {}: {}", offset, e)))?;
                pos = end;
            }
            POINTER_MASK => {
                let low = *message.get(pos + 1).ok_or_else(|| {
                    malformed(format!("compression pointer at offset {} is truncated", pos))
                })?;
                let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);
                if target >= pos {
                    return Err(malformed(format!(
                        "compression pointer at offset {} targets offset {}",
                        pos, target
                    )));
                }
                depth += 1;
                if depth > MAX_POINTER_DEPTH {
                    return Err(malformed(format!(
                        "name at offset {} follows more than {} compression pointers",
                        offset, MAX_POINTER_DEPTH
                    )));
                }
                resume_at.get_or_insert(pos + 2);
                pos = target;
            }
            reserved => {
                return Err(malformed(format!(
                    "reserved label type {:#04x} at offset {}",
                    reserved, pos
                )));
            }
        }
    }
}

fn malformed(detail: String) -> DomainError {
    DomainError::MalformedMessage(detail)
}
