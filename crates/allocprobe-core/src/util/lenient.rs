/// Characters C's `isspace` accepts in the default locale.
const C_WHITESPACE: &[u8] = b" \t\n\x0b\x0c\r";

/// Parses a mebibyte count the way C's `atoi` would, without validation.
///
/// Leading whitespace (as C's `isspace` defines it) and a single sign are
/// skipped, then the longest run of decimal digits is taken. Input without
/// such a run yields `0`. A digit run too large for `usize` saturates to
/// `usize::MAX`. A negative count wraps like a signed-to-unsigned cast and is
/// mapped to `usize::MAX` as well, so both later fail the mebibyte-to-byte
/// conversion instead of turning into a small allocation.
///
/// This leniency is intentional: `alloc malloc abc` behaves like
/// `alloc malloc 0`.
///
/// ```
/// use allocprobe_core::util::parse_mebibytes;
///
/// assert_eq!(parse_mebibytes("100"), 100);
/// assert_eq!(parse_mebibytes("12abc"), 12);
/// assert_eq!(parse_mebibytes("abc"), 0);
/// assert_eq!(parse_mebibytes("-5"), usize::MAX);
/// ```
pub fn parse_mebibytes(s: &str) -> usize {
    let s = s.trim_start_matches(|c: char| c.is_ascii() && C_WHITESPACE.contains(&(c as u8)));
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let count = s
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0usize, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add((digit - b'0') as usize)
        });
    if negative && count != 0 {
        usize::MAX
    } else {
        count
    }
}

#[cfg(test)]
mod tests {
    use super::parse_mebibytes;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_mebibytes("0"), 0);
        assert_eq!(parse_mebibytes("1"), 1);
        assert_eq!(parse_mebibytes("2048"), 2048);
        assert_eq!(parse_mebibytes("007"), 7);
    }

    #[test]
    fn non_numeric_yields_zero() {
        assert_eq!(parse_mebibytes("abc"), 0);
        assert_eq!(parse_mebibytes(""), 0);
        assert_eq!(parse_mebibytes("   "), 0);
        assert_eq!(parse_mebibytes("-"), 0);
        assert_eq!(parse_mebibytes("-abc"), 0);
        assert_eq!(parse_mebibytes("++5"), 0);
        assert_eq!(parse_mebibytes("+-5"), 0);
        assert_eq!(parse_mebibytes("0x10"), 0);
    }

    #[test]
    fn negative_counts_wrap_to_max() {
        assert_eq!(parse_mebibytes("-5"), usize::MAX);
        assert_eq!(parse_mebibytes("  -1"), usize::MAX);
        assert_eq!(parse_mebibytes("-12abc"), usize::MAX);
        assert_eq!(parse_mebibytes("-0"), 0);
    }

    #[test]
    fn prefix_and_whitespace() {
        assert_eq!(parse_mebibytes("  42"), 42);
        assert_eq!(parse_mebibytes("\t+8"), 8);
        assert_eq!(parse_mebibytes("\x0b7"), 7);
        assert_eq!(parse_mebibytes("\x0c\r\n9"), 9);
        assert_eq!(parse_mebibytes("12abc"), 12);
        assert_eq!(parse_mebibytes("3 4"), 3);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(parse_mebibytes("99999999999999999999999999999"), usize::MAX);
    }
}
