//! Token helpers shared by the line parsers.

/// Splits a line on runs of whitespace.
pub fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Returns `true` when the tokens of `line` are exactly `expected`.
pub fn tokens_equal(line: &str, expected: &[&str]) -> bool {
    line.split_whitespace().eq(expected.iter().copied())
}

/// Returns `true` when the first tokens of `line` are `prefix`.
pub fn starts_with_tokens(line: &str, prefix: &[&str]) -> bool {
    let mut words = line.split_whitespace();
    prefix.iter().all(|expected| words.next() == Some(*expected))
}

/// Reduces a host name to its first dot-delimited component.
pub fn short_host(host: &str) -> &str {
    host.split('.').next().unwrap_or(host)
}

/// Strips surrounding parentheses and a leading `v` from a version token,
/// e.g. `(v1.000)` → `1.000`.
pub fn clean_version(token: &str) -> &str {
    let inner = token.trim_start_matches('(').trim_end_matches(')');
    inner.strip_prefix('v').unwrap_or(inner)
}

/// Strips trailing `)` and `,` from a pid token, e.g. `7581),` → `7581`.
pub fn clean_pid(token: &str) -> &str {
    token.trim_end_matches([')', ','])
}
