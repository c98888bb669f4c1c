//! Address display helpers

const LEADING_CHARS: usize = 6;
const TRAILING_CHARS: usize = 4;

/// Shorten an address for display, e.g. `0x1234...5678`.
///
/// Inputs too short to abbreviate are returned unchanged.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < LEADING_CHARS + TRAILING_CHARS {
        return address.to_string();
    }

    let head: String = chars[..LEADING_CHARS].iter().collect();
    let tail: String = chars[chars.len() - TRAILING_CHARS..].iter().collect();
    format!("{}...{}", head, tail)
}
