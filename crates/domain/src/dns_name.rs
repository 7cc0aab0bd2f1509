use crate::errors::DomainError;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Longest label allowed on the wire (RFC 1035 §2.3.4).
pub const MAX_LABEL_LEN: usize = 63;

/// Longest encoded name, counting length bytes and the root terminator.
pub const MAX_NAME_LEN: usize = 255;

/// A fully qualified domain name held as its sequence of labels.
///
/// The root terminator is implicit: `www.sandiego.edu` holds three labels and
/// encodes to 18 bytes. Every label is 1–63 bytes and the encoded form never
/// exceeds 255 bytes, so any `DomainName` can be written to the wire as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DomainName {
    labels: SmallVec<[Box<[u8]>; 4]>,
}

impl DomainName {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_labels<I, L>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut name = Self::root();
        for label in labels {
            name.push_label(label.as_ref())?;
        }
        Ok(name)
    }

    /// Appends a label, enforcing the label and total length limits.
    pub fn push_label(&mut self, label: &[u8]) -> Result<(), DomainError> {
        if label.is_empty() {
            return Err(DomainError::InvalidName(format!(
                "empty label in '{}'",
                self
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidName(format!(
                "label '{}' is {} bytes, limit is {}",
                String::from_utf8_lossy(label),
                label.len(),
                MAX_LABEL_LEN
            )));
        }
        let encoded_len = self.encoded_len() + 1 + label.len();
        if encoded_len > MAX_NAME_LEN {
            return Err(DomainError::InvalidName(format!(
                "name would encode to {} bytes, limit is {}",
                encoded_len, MAX_NAME_LEN
            )));
        }
        self.labels.push(label.into());
        Ok(())
    }

    pub fn labels(&self) -> impl Iterator<Item = &[u8]> {
        self.labels.iter().map(|l| &l[..])
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Size of the uncompressed wire form: one length byte per label, the
    /// label bytes, and the zero terminator.
    pub fn encoded_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// DNS name comparison is case-insensitive for ASCII letters.
    pub fn eq_ignore_case(&self, other: &DomainName) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match std::str::from_utf8(label) {
                Ok(text) => write_text_label(f, text)?,
                Err(_) => {
                    for &byte in label.iter() {
                        write_byte(f, byte)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Printable non-ASCII characters of a UTF-8 label are written as-is.
fn write_text_label(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        if c.is_ascii() || c.is_control() {
            let mut utf8 = [0u8; 4];
            for &byte in c.encode_utf8(&mut utf8).as_bytes() {
                write_byte(f, byte)?;
            }
        } else {
            write!(f, "{}", c)?;
        }
    }
    Ok(())
}

fn write_byte(f: &mut fmt::Formatter<'_>, byte: u8) -> fmt::Result {
    match byte {
        b'.' | b'\\' => write!(f, "\\{}", byte as char),
        0x21..=0x7e => write!(f, "{}", byte as char),
        _ => write!(f, "\\{:03}", byte),
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    /// Parses dotted presentation form. A single trailing dot is accepted,
    /// `\.` and `\\` escape literal bytes, and `\DDD` gives a decimal byte.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let mut name = Self::root();
        let mut label: Vec<u8> = Vec::with_capacity(MAX_LABEL_LEN);
        let bytes = s.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    if label.is_empty() {
                        return Err(DomainError::InvalidName(format!(
                            "empty label in '{}'",
                            s
                        )));
                    }
                    name.push_label(&label)?;
                    label.clear();
                    i += 1;
                }
                b'\\' => {
                    let (byte, consumed) = parse_escape(&bytes[i + 1..])
                        .ok_or_else(|| DomainError::InvalidName(format!("bad escape in '{}'", s)))?;
                    label.push(byte);
                    i += 1 + consumed;
                }
                other => {
                    label.push(other);
                    i += 1;
                }
            }
        }

        if !label.is_empty() {
            name.push_label(&label)?;
        }
        Ok(name)
    }
}

fn parse_escape(rest: &[u8]) -> Option<(u8, usize)> {
    let first = *rest.first()?;
    if !first.is_ascii_digit() {
        return Some((first, 1));
    }
    let digits = rest.get(..3)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = digits
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
    u8::try_from(value).ok().map(|b| (b, 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name: DomainName = "www.sandiego.edu".parse().unwrap();
        assert_eq!(name.label_count(), 3);
        assert_eq!(name.to_string(), "www.sandiego.edu");
        assert_eq!(name.encoded_len(), 18);
    }

    #[test]
    fn test_trailing_dot_is_ignored() {
        let name: DomainName = "example.com.".parse().unwrap();
        assert_eq!(name.to_string(), "example.com");
    }

    #[test]
    fn test_root() {
        let name: DomainName = ".".parse().unwrap();
        assert!(name.is_root());
        assert_eq!(name.to_string(), ".");
        assert_eq!(name.encoded_len(), 1);
    }

    #[test]
    fn test_escapes_round_trip() {
        let name: DomainName = r"a\.b.c\\d.\007x".parse().unwrap();
        let labels: Vec<&[u8]> = name.labels().collect();
        assert_eq!(labels, vec![&b"a.b"[..], &b"c\\d"[..], &b"\x07x"[..]]);
        assert_eq!(name.to_string(), r"a\.b.c\\d.\007x");
    }

    #[test]
    fn test_utf8_labels_display_as_text() {
        let name: DomainName = "münchen.de".parse().unwrap();
        assert_eq!(name.labels().next(), Some("münchen".as_bytes()));
        assert_eq!(name.to_string(), "münchen.de");
    }

    #[test]
    fn test_invalid_utf8_label_is_escaped() {
        let name = DomainName::from_labels([&[0xc3, b'x'][..], &b"de"[..]]).unwrap();
        assert_eq!(name.to_string(), r"\195x.de");
        assert_eq!(name.to_string().parse::<DomainName>().unwrap(), name);
    }

    #[test]
    fn test_case_insensitive_compare() {
        let a: DomainName = "WWW.Example.COM".parse().unwrap();
        let b: DomainName = "www.example.com".parse().unwrap();
        assert!(a.eq_ignore_case(&b));
        assert_ne!(a, b);
    }
}
