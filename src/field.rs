//! Numeric field parsing.
//!
//! Fields are parsed in place from the shared input buffer: given a cursor,
//! each representation consumes the longest valid numeric prefix and reports
//! how many bytes it used. Zero consumed bytes means "empty field"; the
//! caller decides what that means (for feature columns it is an implicit
//! sparse zero, not an error).

mod private {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
}

/// A numeric representation CSV blocks can be parsed into.
///
/// The set is closed: exactly `f32`, `i32` and `i64`. The representation is
/// fixed per parser instance, so dispatch happens at monomorphization time
/// rather than per field.
pub trait FieldValue: Copy + Default + Send + Sync + private::Sealed + 'static {
    /// True for the float representation. Weight columns are only honored
    /// for float blocks.
    const IS_FLOAT: bool;

    /// Parse the longest valid numeric prefix of `bytes`.
    ///
    /// Returns the value and the number of bytes consumed (including any
    /// leading spaces or tabs). Zero consumed bytes means the cursor holds no
    /// numeric prefix at all.
    fn parse_prefix(bytes: &[u8]) -> (Self, usize);

    /// Weight-channel representation of the value.
    fn to_weight(self) -> f32;
}

impl FieldValue for f32 {
    const IS_FLOAT: bool = true;

    fn parse_prefix(bytes: &[u8]) -> (Self, usize) {
        let ws = leading_space_len(bytes);
        let len = float_prefix_len(&bytes[ws..]);
        if len == 0 {
            return (0.0, 0);
        }
        // The prefix is ASCII float syntax by construction, so both
        // conversions succeed.
        match std::str::from_utf8(&bytes[ws..ws + len])
            .ok()
            .and_then(|text| text.parse::<f32>().ok())
        {
            Some(value) => (value, ws + len),
            None => (0.0, 0),
        }
    }

    fn to_weight(self) -> f32 {
        self
    }
}

impl FieldValue for i32 {
    const IS_FLOAT: bool = false;

    fn parse_prefix(bytes: &[u8]) -> (Self, usize) {
        let (value, consumed) = int_prefix(bytes);
        // Cast semantics: the wide parse truncates to 32 bits.
        (value as i32, consumed)
    }

    fn to_weight(self) -> f32 {
        self as f32
    }
}

impl FieldValue for i64 {
    const IS_FLOAT: bool = false;

    fn parse_prefix(bytes: &[u8]) -> (Self, usize) {
        int_prefix(bytes)
    }

    fn to_weight(self) -> f32 {
        self as f32
    }
}

fn leading_space_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count()
}

/// Length of the longest prefix matching decimal/exponent float syntax.
///
/// A dangling exponent marker is not consumed: `"1e"` parses as `1` with one
/// byte consumed, and `"1e+"` likewise.
fn float_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - frac_start;
        if int_digits + frac_digits > 0 {
            i = j;
        }
    }

    if int_digits + frac_digits == 0 {
        return 0;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// strtoll-style integer prefix parse with base auto-detection.
///
/// `0x`/`0X` selects hex (only when at least one hex digit follows, otherwise
/// just the `0` is consumed), a leading `0` selects octal, anything else
/// decimal. Overflow saturates at the 64-bit bounds.
fn int_prefix(bytes: &[u8]) -> (i64, usize) {
    let ws = leading_space_len(bytes);
    let mut i = ws;

    let mut negative = false;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        negative = bytes[i] == b'-';
        i += 1;
    }

    let (base, digits_start) = if bytes.get(i) == Some(&b'0')
        && matches!(bytes.get(i + 1), Some(b'x' | b'X'))
        && bytes.get(i + 2).is_some_and(|b| b.is_ascii_hexdigit())
    {
        (16u64, i + 2)
    } else if bytes.get(i) == Some(&b'0') {
        (8, i)
    } else {
        (10, i)
    };

    let mut j = digits_start;
    let mut magnitude: u64 = 0;
    while j < bytes.len() {
        let digit = match digit_value(bytes[j], base) {
            Some(d) => d,
            None => break,
        };
        magnitude = magnitude.saturating_mul(base).saturating_add(digit);
        j += 1;
    }

    if j == digits_start {
        return (0, 0);
    }

    let value = if negative {
        (-(magnitude.min(1 << 63) as i128)) as i64
    } else {
        magnitude.min(i64::MAX as u64) as i64
    };
    (value, j)
}

fn digit_value(byte: u8, base: u64) -> Option<u64> {
    let digit = match byte {
        b'0'..=b'9' => u64::from(byte - b'0'),
        b'a'..=b'f' => u64::from(byte - b'a') + 10,
        b'A'..=b'F' => u64::from(byte - b'A') + 10,
        _ => return None,
    };
    (digit < base).then_some(digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn parse_f32(text: &str) -> (f32, usize) {
        f32::parse_prefix(text.as_bytes())
    }

    fn parse_i64(text: &str) -> (i64, usize) {
        i64::parse_prefix(text.as_bytes())
    }

    #[test]
    fn float_stops_at_the_first_non_numeric_byte() {
        assert_eq!(parse_f32("1.5,2"), (1.5, 3));
        assert_eq!(parse_f32("42"), (42.0, 2));
        assert_eq!(parse_f32("-2e3"), (-2000.0, 4));
        assert_eq!(parse_f32(".5"), (0.5, 2));
        assert_eq!(parse_f32("5."), (5.0, 2));
    }

    #[test]
    fn float_does_not_consume_a_dangling_exponent() {
        assert_eq!(parse_f32("1e"), (1.0, 1));
        assert_eq!(parse_f32("1e+"), (1.0, 1));
        assert_eq!(parse_f32("2E-4x"), (2e-4, 4));
    }

    #[test]
    fn float_empty_and_non_numeric_fields_consume_nothing() {
        assert_eq!(parse_f32(""), (0.0, 0));
        assert_eq!(parse_f32("abc"), (0.0, 0));
        assert_eq!(parse_f32("."), (0.0, 0));
        assert_eq!(parse_f32("+"), (0.0, 0));
    }

    #[test]
    fn float_skips_leading_spaces_but_counts_them_as_consumed() {
        let (value, consumed) = parse_f32("  7.25");
        assert_abs_diff_eq!(value, 7.25);
        assert_eq!(consumed, 6);
    }

    #[test]
    fn integer_base_is_auto_detected() {
        assert_eq!(parse_i64("0x1F"), (31, 4));
        assert_eq!(parse_i64("010"), (8, 3));
        assert_eq!(parse_i64("10"), (10, 2));
        assert_eq!(parse_i64("-42,"), (-42, 3));
    }

    #[test]
    fn integer_backtracks_on_bad_base_prefixes() {
        // "0x" with no hex digit consumes only the zero; "09" stops at the
        // non-octal digit.
        assert_eq!(parse_i64("0x"), (0, 1));
        assert_eq!(parse_i64("0xg"), (0, 1));
        assert_eq!(parse_i64("09"), (0, 1));
        assert_eq!(parse_i64("123abc"), (123, 3));
    }

    #[test]
    fn integer_overflow_saturates_at_the_64_bit_bounds() {
        assert_eq!(parse_i64("99999999999999999999999"), (i64::MAX, 23));
        assert_eq!(parse_i64("-99999999999999999999999"), (i64::MIN, 24));
        // One past the bounds in either direction.
        assert_eq!(parse_i64("9223372036854775808"), (i64::MAX, 19));
        assert_eq!(parse_i64("-9223372036854775809"), (i64::MIN, 20));
    }

    #[test]
    fn integer_empty_fields_consume_nothing() {
        assert_eq!(parse_i64(""), (0, 0));
        assert_eq!(parse_i64("-"), (0, 0));
        assert_eq!(parse_i64("x5"), (0, 0));
    }

    #[test]
    fn narrow_integer_truncates_like_a_cast() {
        // 2^32 truncates to zero in 32 bits but survives in 64.
        assert_eq!(i32::parse_prefix(b"4294967296"), (0, 10));
        assert_eq!(i64::parse_prefix(b"4294967296"), (4_294_967_296, 10));
    }
}
