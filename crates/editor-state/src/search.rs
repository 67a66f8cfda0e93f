#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("odd number of hex digits")]
    OddLength,

    #[error("`{0}` is not a hex digit")]
    InvalidDigit(char),
}

/// Parses `"de ad be ef"` or `"deadbeef"` into bytes. Whitespace between
/// digit pairs is ignored.
///
/// # Errors
///
/// [`PatternError`] when the pattern is empty, has a stray digit, or holds
/// anything other than hex digits and whitespace.
pub fn parse_hex_pattern(pattern: &str) -> Result<Vec<u8>, PatternError> {
    let digits = pattern
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(PatternError::InvalidDigit(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    if digits.is_empty() {
        return Err(PatternError::Empty);
    }
    if digits.len() % 2 != 0 {
        return Err(PatternError::OddLength);
    }

    Ok(digits.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

/// Start index of every non-overlapping occurrence of `needle`.
#[must_use]
pub fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    memchr::memmem::find_iter(haystack, needle).collect()
}
