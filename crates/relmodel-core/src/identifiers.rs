//! Identifier length limits, uniquification and quoting.
//!
//! Lengths are counted in characters, not bytes, so multi-byte identifiers are
//! never split in the middle of a code point.

use sha2::{Digest, Sha256};

/// Separator placed between a truncated name and its hash suffix.
pub const HASH_SEPARATOR: char = '~';

/// Number of hex digits taken from the digest for the suffix.
pub const HASH_DIGITS: usize = 8;

/// Full width of the `~xxxxxxxx` suffix.
pub const HASH_SUFFIX_LEN: usize = HASH_DIGITS + 1;

/// Shorten `name` to at most `max_length` characters.
///
/// Names that already fit are returned unchanged. Longer names keep their
/// leading characters and end in `~` plus eight hex digits of the SHA-256 of
/// the full name, so the result is exactly `max_length` characters and two
/// long names sharing a prefix still differ. Below the suffix width the
/// result is made of digest digits alone.
///
/// # Example
///
/// ```
/// use relmodel_core::identifiers::truncate;
///
/// assert_eq!(truncate("PK_Orders", 128), "PK_Orders");
///
/// let long = "IX_".to_string() + &"x".repeat(300);
/// let short = truncate(&long, 128);
/// assert_eq!(short.chars().count(), 128);
/// assert_eq!(short, truncate(&long, 128));
/// ```
#[must_use]
pub fn truncate(name: &str, max_length: usize) -> String {
    let length = name.chars().count();
    if length <= max_length {
        return name.to_string();
    }

    let digest = hex_digest(name);
    if max_length < HASH_SUFFIX_LEN {
        return digest[..max_length].to_string();
    }

    let keep = max_length - HASH_SUFFIX_LEN;
    let mut out = String::with_capacity(max_length + 4);
    out.extend(name.chars().take(keep));
    out.push(HASH_SEPARATOR);
    out.push_str(&digest[..HASH_DIGITS]);
    out
}

/// Make `name` unique among identifiers for which `is_taken` returns true.
///
/// The truncated name is returned if free; otherwise `1`, `2`, ... is
/// appended, shortening the base so the result stays within `max_length`.
/// Once the counter no longer fits beside the base, candidates are the
/// truncated `name` + counter, which is a digest prefix at short limits.
/// A `max_length` of zero always yields the empty string.
pub fn uniquify<F>(name: &str, max_length: usize, mut is_taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let mut candidate = truncate(name, max_length);
    if max_length == 0 {
        return candidate;
    }
    let mut counter: u64 = 1;
    while is_taken(&candidate) {
        let suffix = counter.to_string();
        candidate = if suffix.len() < max_length {
            let mut base = truncate(name, max_length - suffix.len());
            base.push_str(&suffix);
            base
        } else {
            truncate(&format!("{name}{suffix}"), max_length)
        };
        counter += 1;
    }
    candidate
}

/// Quote an identifier with double quotes, doubling embedded quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn hex_digest(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}
