//! Numeric literal matching and classification
//!
//! The matcher implements maximal munch over the whole numeric family
//! (float, decimal, octal, hex, and the `L`/`LL` 64-bit variants); the
//! classifier applies the promotion ladder. The downcast rules are
//! load-bearing for compatibility and must not be widened: octal is
//! always a 32-bit INTEGER via modular truncation, and decimal values in
//! `(INT_MAX, UINT_MAX]` demote to the truncated 32-bit INTEGER.

use crate::tokens::Token;
use std::num::IntErrorKind;

/// Numeric classification errors (surface as ERROR tokens)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumericError {
    #[error("malformed numeric literal '{lexeme}'")]
    Malformed { lexeme: String },

    #[error("numeric literal '{lexeme}' is out of range")]
    OutOfRange { lexeme: String },
}

/// Which numeric rule won the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Float,
    Integer,
    Integer64,
    Hex,
    Hex64,
}

/// A matched numeric lexeme: byte length plus the winning rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericMatch {
    pub len: usize,
    pub kind: NumericKind,
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// Count trailing `L` / `LL` (case-sensitive) at `rest[i..]`
fn suffix_len(rest: &[u8], i: usize) -> usize {
    if rest.get(i) == Some(&b'L') {
        if rest.get(i + 1) == Some(&b'L') {
            2
        } else {
            1
        }
    } else {
        0
    }
}

/// Match the longest numeric lexeme at the start of `rest`.
///
/// Returns `None` when no numeric rule matches at all (a bare sign, for
/// instance, falls through to the garbage rule).
pub fn match_numeric(rest: &[u8]) -> Option<NumericMatch> {
    // Hex family first: `0x`/`0X` with at least one hex digit. A bare
    // `0x` is not hex; the `0` matches as an integer and `x` is left for
    // the name rule.
    if rest.first() == Some(&b'0') && matches!(rest.get(1), Some(b'x') | Some(b'X')) {
        let mut i = 2;
        while rest.get(i).copied().is_some_and(is_hex_digit) {
            i += 1;
        }
        if i > 2 {
            let suffix = suffix_len(rest, i);
            let kind = if suffix > 0 {
                NumericKind::Hex64
            } else {
                NumericKind::Hex
            };
            return Some(NumericMatch {
                len: i + suffix,
                kind,
            });
        }
    }

    let mut i = 0;
    if matches!(rest.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let mut int_digits = 0;
    while rest.get(i).copied().is_some_and(is_digit) {
        i += 1;
        int_digits += 1;
    }

    let mut has_dot = false;
    if rest.get(i) == Some(&b'.') {
        has_dot = true;
        i += 1;
        while rest.get(i).copied().is_some_and(is_digit) {
            i += 1;
        }
    }

    // An exponent only counts if at least one digit follows; otherwise
    // the `e` is left for the name rule (proper backtracking)
    let mut has_exp = false;
    if matches!(rest.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(rest.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_digits_start = j;
        while rest.get(j).copied().is_some_and(is_digit) {
            j += 1;
        }
        if j > exp_digits_start {
            has_exp = true;
            i = j;
        }
    }

    if has_dot || (int_digits > 0 && has_exp) {
        return Some(NumericMatch {
            len: i,
            kind: NumericKind::Float,
        });
    }

    if int_digits == 0 {
        return None;
    }

    let suffix = suffix_len(rest, i);
    if suffix > 0 {
        Some(NumericMatch {
            len: i + suffix,
            kind: NumericKind::Integer64,
        })
    } else {
        Some(NumericMatch {
            len: i,
            kind: NumericKind::Integer,
        })
    }
}

/// Apply the promotion ladder to a matched lexeme
pub fn classify(lexeme: &[u8], kind: NumericKind) -> Result<Token<'static>, NumericError> {
    let text = std::str::from_utf8(lexeme).map_err(|_| NumericError::Malformed {
        lexeme: String::from_utf8_lossy(lexeme).into_owned(),
    })?;

    match kind {
        NumericKind::Float => {
            // atof semantics: lexemes the float rules accept but f64
            // parsing rejects (".", "+.") evaluate to zero
            Ok(Token::Float(text.parse::<f64>().unwrap_or(0.0)))
        }

        NumericKind::Integer => classify_integer(text),

        NumericKind::Integer64 => {
            let digits = text.trim_end_matches('L');
            let value = digits
                .parse::<i64>()
                .map_err(|e| integer_error(text, e.kind()))?;
            Ok(Token::Integer64(value))
        }

        NumericKind::Hex => {
            let digits = &text[2..];
            let value = u64::from_str_radix(digits, 16)
                .map_err(|e| integer_error(text, e.kind()))?;
            if value > u64::from(u32::MAX) {
                return Err(NumericError::OutOfRange {
                    lexeme: text.to_string(),
                });
            }
            Ok(Token::Hex(value as u32 as i32))
        }

        NumericKind::Hex64 => {
            let digits = text[2..].trim_end_matches('L');
            let value = u64::from_str_radix(digits, 16)
                .map_err(|e| integer_error(text, e.kind()))?;
            Ok(Token::Hex64(value))
        }
    }
}

/// Unsuffixed integer literals: octal detection, then the promotion ladder
fn classify_integer(text: &str) -> Result<Token<'static>, NumericError> {
    // Leading zero with length >= 2 means octal, always emitted as a
    // 32-bit INTEGER via modular truncation
    if text.len() >= 2 && text.starts_with('0') {
        let value =
            i64::from_str_radix(text, 8).map_err(|e| integer_error(text, e.kind()))?;
        return Ok(Token::Integer(value as i32));
    }

    let value = text
        .parse::<i64>()
        .map_err(|e| integer_error(text, e.kind()))?;

    if value >= i64::from(i32::MIN) && value <= i64::from(i32::MAX) {
        Ok(Token::Integer(value as i32))
    } else if value > i64::from(i32::MAX) && value <= i64::from(u32::MAX) {
        // demotion: values in (INT_MAX, UINT_MAX] keep their 32-bit
        // truncated representation
        Ok(Token::Integer(value as u32 as i32))
    } else {
        Ok(Token::Integer64(value))
    }
}

fn integer_error(text: &str, kind: &IntErrorKind) -> NumericError {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => NumericError::OutOfRange {
            lexeme: text.to_string(),
        },
        _ => NumericError::Malformed {
            lexeme: text.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(input: &[u8]) -> (usize, NumericKind) {
        let m = match_numeric(input).expect("should match");
        (m.len, m.kind)
    }

    fn token(input: &[u8]) -> Token<'static> {
        let m = match_numeric(input).expect("should match");
        classify(&input[..m.len], m.kind).expect("should classify")
    }

    #[test]
    fn test_integer_matching() {
        assert_eq!(matched(b"42;"), (2, NumericKind::Integer));
        assert_eq!(matched(b"-7 "), (2, NumericKind::Integer));
        assert_eq!(matched(b"+13"), (3, NumericKind::Integer));
    }

    #[test]
    fn test_integer64_matching() {
        assert_eq!(matched(b"42L;"), (3, NumericKind::Integer64));
        assert_eq!(matched(b"42LL;"), (4, NumericKind::Integer64));
        // a third L is not part of the literal
        assert_eq!(matched(b"42LLL"), (4, NumericKind::Integer64));
    }

    #[test]
    fn test_hex_matching() {
        assert_eq!(matched(b"0xFF;"), (4, NumericKind::Hex));
        assert_eq!(matched(b"0XaB"), (4, NumericKind::Hex));
        assert_eq!(matched(b"0xFFL"), (5, NumericKind::Hex64));
        assert_eq!(matched(b"0xFFLL"), (6, NumericKind::Hex64));
        // bare 0x is integer zero; the x belongs to the next token
        assert_eq!(matched(b"0x"), (1, NumericKind::Integer));
    }

    #[test]
    fn test_float_matching() {
        assert_eq!(matched(b"1.5;"), (3, NumericKind::Float));
        assert_eq!(matched(b".5"), (2, NumericKind::Float));
        assert_eq!(matched(b"-.5"), (3, NumericKind::Float));
        assert_eq!(matched(b"1."), (2, NumericKind::Float));
        assert_eq!(matched(b"1e6"), (3, NumericKind::Float));
        assert_eq!(matched(b"1.5e-3;"), (6, NumericKind::Float));
        assert_eq!(matched(b"2E+10"), (5, NumericKind::Float));
    }

    #[test]
    fn test_exponent_backtracking() {
        // "5.e" has no exponent digits: the float is "5." and the e is a name
        assert_eq!(matched(b"5.e"), (2, NumericKind::Float));
        assert_eq!(matched(b"12e"), (2, NumericKind::Integer));
        assert_eq!(matched(b"12e+"), (2, NumericKind::Integer));
    }

    #[test]
    fn test_bare_sign_matches_nothing() {
        assert!(match_numeric(b"-x").is_none());
        assert!(match_numeric(b"+").is_none());
    }

    #[test]
    fn test_integer_classification() {
        assert_eq!(token(b"42"), Token::Integer(42));
        assert_eq!(token(b"-42"), Token::Integer(-42));
        assert_eq!(token(b"2147483647"), Token::Integer(i32::MAX));
        assert_eq!(token(b"-2147483648"), Token::Integer(i32::MIN));
    }

    #[test]
    fn test_unsigned_demotion() {
        // (INT_MAX, UINT_MAX] keeps the 32-bit truncated representation
        assert_eq!(token(b"3000000000"), Token::Integer(-1294967296));
        assert_eq!(token(b"4294967295"), Token::Integer(-1));
    }

    #[test]
    fn test_promotion_to_integer64() {
        assert_eq!(token(b"4294967296"), Token::Integer64(4294967296));
        assert_eq!(token(b"5000000000"), Token::Integer64(5000000000));
        assert_eq!(token(b"-3000000000"), Token::Integer64(-3000000000));
    }

    #[test]
    fn test_decimal_overflow_is_out_of_range() {
        let result = classify(b"99999999999999999999", NumericKind::Integer);
        assert!(matches!(result, Err(NumericError::OutOfRange { .. })));
    }

    #[test]
    fn test_octal_always_integer() {
        assert_eq!(token(b"010"), Token::Integer(8));
        assert_eq!(token(b"0777"), Token::Integer(511));
        // octal magnitude beyond 32 bits truncates modularly: 0o40000000000 == 1 << 32
        assert_eq!(token(b"040000000000"), Token::Integer(0));
    }

    #[test]
    fn test_octal_with_bad_digits_is_malformed() {
        let result = classify(b"09", NumericKind::Integer);
        assert!(matches!(result, Err(NumericError::Malformed { .. })));
    }

    #[test]
    fn test_signed_leading_zero_is_decimal() {
        // the octal rule keys on the lexeme's first byte, not the first digit
        assert_eq!(token(b"+010"), Token::Integer(10));
    }

    #[test]
    fn test_integer64_classification() {
        assert_eq!(token(b"42L"), Token::Integer64(42));
        assert_eq!(token(b"-9LL"), Token::Integer64(-9));
        assert_eq!(token(b"012L"), Token::Integer64(12));
    }

    #[test]
    fn test_hex_classification() {
        assert_eq!(token(b"0xFF"), Token::Hex(255));
        assert_eq!(token(b"0xFFFFFFFF"), Token::Hex(-1));
        assert_eq!(token(b"0xFFL"), Token::Hex64(255));
        assert_eq!(
            token(b"0xFFFFFFFFFFFFFFFFL"),
            Token::Hex64(u64::MAX)
        );
    }

    #[test]
    fn test_hex_overflow() {
        let result = classify(b"0x1FFFFFFFF", NumericKind::Hex);
        assert!(matches!(result, Err(NumericError::OutOfRange { .. })));

        let result = classify(b"0x1FFFFFFFFFFFFFFFFL", NumericKind::Hex64);
        assert!(matches!(result, Err(NumericError::OutOfRange { .. })));
    }

    #[test]
    fn test_float_classification() {
        assert_eq!(token(b"1.5"), Token::Float(1.5));
        assert_eq!(token(b"-2.5e2"), Token::Float(-250.0));
        // atof fallback for degenerate float lexemes
        assert_eq!(token(b"."), Token::Float(0.0));
    }
}
