//! RFC 4122 version-4 identifier layout and validation.
//!
//! An identifier is the 36-character string
//! `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx` where `x` is a hex digit, the
//! version nibble is literally `4`, and the variant nibble `y` is one of
//! `8`, `9`, `a`, `b`. Validation is case-insensitive; formatting emits
//! lowercase.

use once_cell::sync::Lazy;
use regex::Regex;

/// Length in bytes of a formatted identifier.
pub const UID_LEN: usize = 36;

static V4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^(?i)[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("v4 identifier pattern is a valid regex")
});

const HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";

/// Two lowercase hex characters per byte value, indexed by the byte.
static BYTE_TO_HEX: [[u8; 2]; 256] = build_byte_table();

const fn build_byte_table() -> [[u8; 2]; 256] {
    let mut table = [[0u8; 2]; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = [HEX_DIGITS[i >> 4], HEX_DIGITS[i & 0x0f]];
        i += 1;
    }
    table
}

fn push_hex(out: &mut String, byte: u8) {
    let pair = BYTE_TO_HEX[byte as usize];
    out.push(char::from(pair[0]));
    out.push(char::from(pair[1]));
}

/// Formats four 32-bit draws into the version-4 identifier layout.
///
/// Bytes are consumed low-to-high within each draw. The version nibble is
/// forced to `4` and the variant bits to `10`; all other nibbles come from
/// the draws unchanged, rendered lowercase through the byte lookup table.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // every cast is masked or shifted to one byte
pub fn format_v4(d0: u32, d1: u32, d2: u32, d3: u32) -> String {
    let mut out = String::with_capacity(UID_LEN);
    push_hex(&mut out, (d0 & 0xff) as u8);
    push_hex(&mut out, (d0 >> 8 & 0xff) as u8);
    push_hex(&mut out, (d0 >> 16 & 0xff) as u8);
    push_hex(&mut out, (d0 >> 24) as u8);
    out.push('-');
    push_hex(&mut out, (d1 & 0xff) as u8);
    push_hex(&mut out, (d1 >> 8 & 0xff) as u8);
    out.push('-');
    push_hex(&mut out, ((d1 >> 16 & 0x0f) | 0x40) as u8);
    push_hex(&mut out, (d1 >> 24) as u8);
    out.push('-');
    push_hex(&mut out, ((d2 & 0x3f) | 0x80) as u8);
    push_hex(&mut out, (d2 >> 8 & 0xff) as u8);
    out.push('-');
    push_hex(&mut out, (d2 >> 16 & 0xff) as u8);
    push_hex(&mut out, (d2 >> 24) as u8);
    push_hex(&mut out, (d3 & 0xff) as u8);
    push_hex(&mut out, (d3 >> 8 & 0xff) as u8);
    push_hex(&mut out, (d3 >> 16 & 0xff) as u8);
    push_hex(&mut out, (d3 >> 24) as u8);
    out
}

/// Returns `true` when `input` is a well-formed version-4 identifier.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    V4_PATTERN.is_match(input)
}

/// Returns the inputs that are well-formed version-4 identifiers.
///
/// Relative order is preserved; duplicates are not collapsed. A single
/// malformed input simply does not appear in the result.
pub fn filter_valid<I, S>(inputs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .filter(|s| is_valid(s.as_ref()))
        .map(|s| s.as_ref().to_string())
        .collect()
}
