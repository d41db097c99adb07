//! Token system for the SCL scanner
//!
//! One tagged value per lexical element. NAME borrows the scanner's
//! match buffer and is only valid until the next pull; callers that
//! buffer tokens convert to [`OwnedToken`] first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scanned token with its semantic payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token<'a> {
    // === PUNCTUATION ===
    /// `=` or `:`
    Equals,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `{`
    GroupStart,
    /// `}`
    GroupEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `(`
    ListStart,
    /// `)`
    ListEnd,

    // === SCALARS ===
    /// Case-insensitive `true` / `false`
    Boolean(bool),
    /// Decoded string literal contents (raw bytes, no transcoding)
    Str(Vec<u8>),
    /// 32-bit integer (decimal in range, demoted unsigned, or octal)
    Integer(i32),
    /// 64-bit integer (`L`/`LL` suffix, or decimal promoted out of
    /// unsigned 32-bit range)
    Integer64(i64),
    /// 32-bit hexadecimal literal, bit pattern exposed as signed
    Hex(i32),
    /// 64-bit hexadecimal literal (`L`/`LL` suffix)
    Hex64(u64),
    /// Floating point literal
    Float(f64),

    // === IDENTIFIERS ===
    /// Setting name; borrows the scanner's match buffer until the next
    /// token pull
    Name(#[serde(borrow)] &'a str),

    // === DIAGNOSTICS ===
    /// A byte no rule matched
    Garbage(u8),
    /// Scanner-level failure; details are on the error channel
    Error,
}

impl<'a> Token<'a> {
    /// Check if this token is a value-bearing scalar
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Boolean(_)
                | Self::Str(_)
                | Self::Integer(_)
                | Self::Integer64(_)
                | Self::Hex(_)
                | Self::Hex64(_)
                | Self::Float(_)
        )
    }

    /// Check if this token is structural punctuation
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::Comma
                | Self::Semicolon
                | Self::GroupStart
                | Self::GroupEnd
                | Self::ArrayStart
                | Self::ArrayEnd
                | Self::ListStart
                | Self::ListEnd
        )
    }

    /// Get the name if this token is a NAME
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Get the string payload as UTF-8, if it is valid UTF-8
    pub fn as_utf8_str(&self) -> Option<&str> {
        match self {
            Self::Str(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Get the classification of this token
    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Equals
            | Self::Comma
            | Self::Semicolon
            | Self::GroupStart
            | Self::GroupEnd
            | Self::ArrayStart
            | Self::ArrayEnd
            | Self::ListStart
            | Self::ListEnd => TokenClass::Punctuation,
            Self::Boolean(_)
            | Self::Integer(_)
            | Self::Integer64(_)
            | Self::Hex(_)
            | Self::Hex64(_)
            | Self::Float(_) => TokenClass::Scalar,
            Self::Str(_) => TokenClass::Text,
            Self::Name(_) => TokenClass::Name,
            Self::Garbage(_) => TokenClass::Garbage,
            Self::Error => TokenClass::Diagnostic,
        }
    }

    /// Detach the token from the scanner's buffers
    pub fn to_owned_token(&self) -> OwnedToken {
        match self {
            Self::Equals => OwnedToken::Equals,
            Self::Comma => OwnedToken::Comma,
            Self::Semicolon => OwnedToken::Semicolon,
            Self::GroupStart => OwnedToken::GroupStart,
            Self::GroupEnd => OwnedToken::GroupEnd,
            Self::ArrayStart => OwnedToken::ArrayStart,
            Self::ArrayEnd => OwnedToken::ArrayEnd,
            Self::ListStart => OwnedToken::ListStart,
            Self::ListEnd => OwnedToken::ListEnd,
            Self::Boolean(b) => OwnedToken::Boolean(*b),
            Self::Str(s) => OwnedToken::Str(s.clone()),
            Self::Integer(v) => OwnedToken::Integer(*v),
            Self::Integer64(v) => OwnedToken::Integer64(*v),
            Self::Hex(v) => OwnedToken::Hex(*v),
            Self::Hex64(v) => OwnedToken::Hex64(*v),
            Self::Float(v) => OwnedToken::Float(*v),
            Self::Name(name) => OwnedToken::Name(name.to_string()),
            Self::Garbage(b) => OwnedToken::Garbage(*b),
            Self::Error => OwnedToken::Error,
        }
    }

    /// Render the token as it would appear in SCL source
    pub fn as_scl_string(&self) -> String {
        match self {
            Self::Equals => "=".to_string(),
            Self::Comma => ",".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::GroupStart => "{".to_string(),
            Self::GroupEnd => "}".to_string(),
            Self::ArrayStart => "[".to_string(),
            Self::ArrayEnd => "]".to_string(),
            Self::ListStart => "(".to_string(),
            Self::ListEnd => ")".to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Str(bytes) => render_string_literal(bytes),
            Self::Integer(v) => v.to_string(),
            Self::Integer64(v) => format!("{}L", v),
            Self::Hex(v) => format!("0x{:x}", *v as u32),
            Self::Hex64(v) => format!("0x{:x}L", v),
            Self::Float(v) => v.to_string(),
            Self::Name(name) => name.to_string(),
            Self::Garbage(b) => format!("<garbage 0x{:02x}>", b),
            Self::Error => "<error>".to_string(),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_scl_string())
    }
}

/// Quote and re-escape decoded string bytes for display
fn render_string_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x0c => out.push_str("\\f"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('"');
    out
}

/// An owned mirror of [`Token`] for callers that buffer tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OwnedToken {
    Equals,
    Comma,
    Semicolon,
    GroupStart,
    GroupEnd,
    ArrayStart,
    ArrayEnd,
    ListStart,
    ListEnd,
    Boolean(bool),
    Str(Vec<u8>),
    Integer(i32),
    Integer64(i64),
    Hex(i32),
    Hex64(u64),
    Float(f64),
    Name(String),
    Garbage(u8),
    Error,
}

impl OwnedToken {
    /// Borrow back as a [`Token`]
    pub fn as_token(&self) -> Token<'_> {
        match self {
            Self::Equals => Token::Equals,
            Self::Comma => Token::Comma,
            Self::Semicolon => Token::Semicolon,
            Self::GroupStart => Token::GroupStart,
            Self::GroupEnd => Token::GroupEnd,
            Self::ArrayStart => Token::ArrayStart,
            Self::ArrayEnd => Token::ArrayEnd,
            Self::ListStart => Token::ListStart,
            Self::ListEnd => Token::ListEnd,
            Self::Boolean(b) => Token::Boolean(*b),
            Self::Str(s) => Token::Str(s.clone()),
            Self::Integer(v) => Token::Integer(*v),
            Self::Integer64(v) => Token::Integer64(*v),
            Self::Hex(v) => Token::Hex(*v),
            Self::Hex64(v) => Token::Hex64(*v),
            Self::Float(v) => Token::Float(*v),
            Self::Name(name) => Token::Name(name),
            Self::Garbage(b) => Token::Garbage(*b),
            Self::Error => Token::Error,
        }
    }
}

impl From<Token<'_>> for OwnedToken {
    fn from(token: Token<'_>) -> Self {
        token.to_owned_token()
    }
}

impl fmt::Display for OwnedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token().as_scl_string())
    }
}

/// Token classification for metrics and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Structural punctuation
    Punctuation,
    /// Numeric and boolean values
    Scalar,
    /// String literals
    Text,
    /// Setting names
    Name,
    /// Unmatched bytes
    Garbage,
    /// Error markers
    Diagnostic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Token::Equals.is_punctuation());
        assert!(Token::Integer(1).is_scalar());
        assert!(!Token::Name("port").is_scalar());
        assert_eq!(Token::Garbage(b'%').token_class(), TokenClass::Garbage);
        assert_eq!(Token::Str(vec![]).token_class(), TokenClass::Text);
    }

    #[test]
    fn test_name_accessor() {
        assert_eq!(Token::Name("port").as_name(), Some("port"));
        assert_eq!(Token::Comma.as_name(), None);
    }

    #[test]
    fn test_utf8_accessor() {
        assert_eq!(Token::Str(b"abc".to_vec()).as_utf8_str(), Some("abc"));
        assert_eq!(Token::Str(vec![0xff]).as_utf8_str(), None);
    }

    #[test]
    fn test_owned_round_trip() {
        let owned = OwnedToken::from(Token::Name("port"));
        assert_eq!(owned, OwnedToken::Name("port".to_string()));
        assert_eq!(owned.as_token(), Token::Name("port"));
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(Token::Integer64(255).to_string(), "255L");
        assert_eq!(Token::Hex(-1).to_string(), "0xffffffff");
        assert_eq!(Token::Str(b"a\tb".to_vec()).to_string(), "\"a\\tb\"");
        assert_eq!(Token::Str(vec![0x01]).to_string(), "\"\\x01\"");
    }
}
