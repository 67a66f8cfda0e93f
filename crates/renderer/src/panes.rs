use std::fmt::Write;

use crate::{BYTES_PER_ROW, TextEncoding};

/// Hex pane: sixteen two-digit groups per row separated by single spaces,
/// rows joined by newlines. Missing groups on the last row are empty, trailing
/// whitespace is trimmed and exactly one space is appended.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + 1);

    for (row_idx, row) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        if row_idx > 0 {
            out.push('\n');
        }

        for col in 0..BYTES_PER_ROW {
            if col > 0 {
                out.push(' ');
            }
            if let Some(byte) = row.get(col) {
                // Writing into a String cannot fail.
                let _ = write!(out, "{byte:02x}");
            }
        }
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push(' ');
    out
}

/// Text pane: one character per byte, sixteen per row.
///
/// Control bytes (below `0x20`) and bytes that do not decode under
/// `encoding` render as `.`. A full last row is followed by a newline so the
/// caret can sit on the next row.
#[must_use]
pub fn to_text(bytes: &[u8], encoding: TextEncoding) -> String {
    let chars: Vec<char> = bytes.iter().map(|&b| display_char(b, encoding)).collect();
    let full_rows = chars.len() - chars.len() % BYTES_PER_ROW;

    let mut out = chars[..full_rows]
        .chunks(BYTES_PER_ROW)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    out.push('\n');
    out.extend(&chars[full_rows..]);

    out.trim_start_matches('\n').to_string()
}

/// Offset column: `{row:07x}0` for every displayed row, starting at
/// `scroll_row`. One line more than full rows is always produced, so the
/// column stays aligned with the caret row past the last byte.
#[must_use]
pub fn tens_count(scroll_row: u64, shown_len: usize) -> String {
    let rows = (shown_len / BYTES_PER_ROW) as u64 + 1;
    let mut out = String::new();

    for row in scroll_row..scroll_row.saturating_add(rows) {
        let _ = writeln!(out, "{row:07x}0");
    }

    out
}

/// Column header: `00 01 … 0f`.
#[must_use]
pub fn units_count() -> String {
    (0..BYTES_PER_ROW)
        .map(|digit| format!("0{digit:x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[inline]
fn display_char(byte: u8, encoding: TextEncoding) -> char {
    if byte < 0x20 {
        return '.';
    }

    encoding.decode(byte).unwrap_or('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_single_full_row() {
        let hex = to_hex(b"0123456789abcdef");

        assert_eq!(
            hex,
            "30 31 32 33 34 35 36 37 38 39 61 62 63 64 65 66 "
        );
    }

    #[test]
    fn test_hex_partial_last_row() {
        let bytes: Vec<u8> = (0u8..18).collect();
        let hex = to_hex(&bytes);
        let rows: Vec<&str> = hex.split('\n').collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "10 11 ");
    }

    #[test]
    fn test_hex_empty() {
        assert_eq!(to_hex(&[]), " ");
    }

    #[test]
    fn test_text_rows_and_placeholders() {
        let mut bytes = b"Hello, world!!!!".to_vec();
        bytes.extend_from_slice(&[0x00, 0x1f, 0x41, 0xff]);

        let text = to_text(&bytes, TextEncoding::Utf8);

        assert_eq!(text, "Hello, world!!!!\n..A.");
    }

    #[test]
    fn test_text_full_row_gets_trailing_newline() {
        assert_eq!(
            to_text(b"0123456789abcdef", TextEncoding::Utf8),
            "0123456789abcdef\n"
        );
        assert_eq!(to_text(b"abc", TextEncoding::Utf8), "abc");
        assert_eq!(to_text(&[], TextEncoding::Utf8), "");
    }

    #[test]
    fn test_text_respects_encoding() {
        assert_eq!(to_text(&[0xe9], TextEncoding::Latin1), "é");
        assert_eq!(to_text(&[0xe9], TextEncoding::Ascii), ".");
    }

    #[test]
    fn test_tens_count() {
        assert_eq!(tens_count(0, 16), "00000000\n00000010\n");
        assert_eq!(tens_count(0x1f, 3), "000001f0\n");
        assert_eq!(tens_count(0x12345678, 0), "123456780\n");
    }

    #[test]
    fn test_units_count() {
        assert_eq!(
            units_count(),
            "00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f"
        );
    }
}
