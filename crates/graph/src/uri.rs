//! Canonical repository URIs.
//!
//! Clone URLs come in many spellings (`https://GitHub.com/a/b.git`,
//! `git@github.com:a/b`, `github.com/a/b/`); they all collapse to
//! `github.com/a/b`. Applying [`make_uri`] to its own output is a no-op.

/// Canonicalize a repository identifier. Empty input stays empty.
pub fn make_uri(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let rest = match raw.find("://") {
        Some(idx) => &raw[idx + 3..],
        None => raw,
    };

    let (host, path) = split_host_path(rest);

    let mut path = path.trim_start_matches('/');
    loop {
        let trimmed = path.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        if trimmed.len() == path.len() {
            break;
        }
        path = trimmed;
    }

    let mut uri = host.to_ascii_lowercase();
    if !path.is_empty() {
        uri.push('/');
        uri.push_str(path);
    }
    uri
}

/// Splits `[user@]host[:port]/path`. A colon not followed by a numeric
/// port separates host and path, as in scp-like `git@host:path` URLs; the
/// same rule applies with or without a scheme so output parses back to itself.
fn split_host_path(rest: &str) -> (&str, &str) {
    let slash = rest.find('/').unwrap_or(rest.len());
    let host_start = rest[..slash].rfind('@').map_or(0, |idx| idx + 1);
    let rest = &rest[host_start..];
    let authority = &rest[..slash - host_start];

    if let Some(colon) = authority.find(':') {
        let after = &authority[colon + 1..];
        let is_port = !after.is_empty() && after.bytes().all(|b| b.is_ascii_digit());
        if !is_port {
            return (&rest[..colon], &rest[colon + 1..]);
        }
    }

    (authority, &rest[authority.len()..])
}
