use urlencoding::encode;

/// Build a query string from key-value pairs
pub fn build_query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Query parameters for the user search endpoint; a blank search lists everyone.
pub fn search_params(search_email: &str) -> Option<Vec<(String, String)>> {
    let trimmed = search_email.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(vec![("searchEmail".to_string(), trimmed.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_characters() {
        let pairs = vec![("searchEmail".to_string(), "a+b@x.io".to_string())];
        assert_eq!(build_query_string(&pairs), "searchEmail=a%2Bb%40x.io");
    }

    #[test]
    fn blank_search_has_no_params() {
        assert!(search_params("   ").is_none());
        assert_eq!(
            search_params(" bob ").unwrap(),
            vec![("searchEmail".to_string(), "bob".to_string())]
        );
    }
}
