use urlencoding::encode;

/// Extract the host (with port) from a URL string, for display in the header.
pub fn hostname_from_url(u: &str) -> String {
    let s = u.trim();
    let s = s.split_once("://").map(|(_, rest)| rest).unwrap_or(s);
    let authority = s.split(['/', '?', '#']).next().unwrap_or(s);
    let host = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    host.to_string()
}

/// Percent-encode a value used as a single path segment (emails contain `@` and `+`).
pub fn path_segment(value: &str) -> String {
    encode(value).into_owned()
}
