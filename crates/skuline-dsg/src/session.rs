//! Session headers and cookie persistence.
//!
//! Cookie acquisition is an external collaborator; this module only reads the
//! credential file once at startup and can persist a refreshed value for the
//! next run. Without a valid cookie every fetch degrades to the skippable
//! "no data" path.

use std::path::Path;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};

const REFERER: &str = "https://www.dickssportinggoods.com/p/nike-womens-dunk-low-shoes-23nikwdnklwwhtblcftwa/23nikwdnklwwhtblcftwa";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

/// Read the session cookie string from the credential file.
pub fn load_cookie(path: &Path) -> anyhow::Result<String> {
    let cookie = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read cookie file {}", path.display()))?;
    Ok(cookie.trim().to_string())
}

/// Persist a refreshed cookie string for later runs.
pub fn save_cookie(path: &Path, cookie: &str) -> anyhow::Result<()> {
    std::fs::write(path, cookie)
        .with_context(|| format!("cannot write cookie file {}", path.display()))
}

/// Browser-imitating header set with the session cookie attached, applied as
/// the client's default headers.
pub fn build_headers(cookie: &str) -> anyhow::Result<HeaderMap> {
    const STATIC_HEADERS: [(&str, &str); 12] = [
        ("accept", "application/json, text/plain, */*"),
        ("accept-language", "en-US,en;q=0.9"),
        ("origin", "https://www.dickssportinggoods.com"),
        ("priority", "u=1, i"),
        ("referer", REFERER),
        (
            "sec-ch-ua",
            "\"Google Chrome\";v=\"129\", \"Not=A?Brand\";v=\"8\", \"Chromium\";v=\"129\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-site"),
        ("user-agent", USER_AGENT),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in STATIC_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if !cookie.is_empty() {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(cookie).context("cookie contains invalid header bytes")?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_include_cookie() {
        let headers = build_headers("session=abc123").unwrap();
        assert_eq!(headers.get(COOKIE).unwrap(), "session=abc123");
        assert_eq!(headers.get("accept").unwrap(), "application/json, text/plain, */*");
    }

    #[test]
    fn empty_cookie_is_omitted() {
        let headers = build_headers("").unwrap();
        assert!(headers.get(COOKIE).is_none());
    }

    #[test]
    fn cookie_with_control_bytes_is_rejected() {
        assert!(build_headers("bad\ncookie").is_err());
    }

    #[test]
    fn cookie_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.txt");
        save_cookie(&path, "session=xyz\n").unwrap();
        assert_eq!(load_cookie(&path).unwrap(), "session=xyz");
    }

    #[test]
    fn missing_cookie_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_cookie(&dir.path().join("absent.txt")).is_err());
    }
}
