use regex::Regex;
use std::sync::OnceLock;

fn filename_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"filename[^;=\n]*=("[^"]*"|'[^']*'|[^;\n]*)"#).expect("valid filename regex")
    })
}

/// Extract a download filename from a `Content-Disposition` header.
///
/// Quotes are removed, RFC 5987 `UTF-8''` values are percent-decoded and any
/// directory part is dropped so the result is always a bare file name.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let caps = filename_regex().captures(header)?;
    let raw = caps.get(1)?.as_str().trim().replace(['"', '\''], "");
    let raw = match raw.strip_prefix("UTF-8").or_else(|| raw.strip_prefix("utf-8")) {
        Some(encoded) => urlencoding::decode(encoded)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| encoded.to_string()),
        None => raw,
    };
    let name = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_filename() {
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="AzaionSuite.Installer.exe""#),
            Some("AzaionSuite.Installer.exe".to_string())
        );
    }

    #[test]
    fn bare_filename_stops_at_semicolon() {
        assert_eq!(
            filename_from_content_disposition("attachment; filename=setup-stage.zip; size=10"),
            Some("setup-stage.zip".to_string())
        );
    }

    #[test]
    fn extended_value_is_decoded() {
        assert_eq!(
            filename_from_content_disposition("attachment; filename*=UTF-8''Azaion%20Setup.exe"),
            Some("Azaion Setup.exe".to_string())
        );
    }

    #[test]
    fn directories_are_stripped() {
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="../../etc/passwd""#),
            Some("passwd".to_string())
        );
        assert_eq!(filename_from_content_disposition("inline"), None);
    }
}
