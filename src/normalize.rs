/// Strip one matching pair of outer quotes from a token, if present.
///
/// Handles `"` and `'`. Quotes embedded mid-field or escaped quotes are left
/// alone; this is deliberately not an RFC CSV unescape.
pub fn strip_quotes(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &token[1..token.len() - 1];
        }
    }
    token
}
