//! Cursor-based line and field scanning.
//!
//! All scanning works on byte offsets into the shared input buffer; no line
//! or field is ever copied out. Both `\n` and `\r` terminate a line, so
//! `\r\n` files need no special casing.

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[inline]
pub(crate) fn is_newline(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Advance past any run of newline bytes starting at `pos`.
pub(crate) fn skip_newlines(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && is_newline(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Advance past a UTF-8 byte-order mark, if one sits at `pos`.
pub(crate) fn skip_bom(bytes: &[u8], pos: usize) -> usize {
    if bytes[pos..].starts_with(&UTF8_BOM) {
        pos + UTF8_BOM.len()
    } else {
        pos
    }
}

/// End of the line starting at `pos`: the first newline byte at or after
/// `pos`, or the end of the buffer.
pub(crate) fn find_line_end(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && !is_newline(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// First occurrence of `delimiter` in `bytes[pos..end]`, or `end`.
pub(crate) fn find_delimiter(bytes: &[u8], mut pos: usize, end: usize, delimiter: u8) -> usize {
    while pos < end && bytes[pos] != delimiter {
        pos += 1;
    }
    pos
}
