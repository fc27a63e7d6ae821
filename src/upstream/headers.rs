//! Header utilities for upstream requests
//!
//! The duckchat endpoints only answer requests that look like they come from
//! a browser on duckduckgo.com, so every upstream call carries the same fixed
//! impersonation set. `Accept-Encoding` is left to reqwest, which advertises
//! and decodes gzip, brotli, deflate and zstd itself.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, CONTENT_TYPE};

use super::provider::SessionToken;

/// Header carrying the session token, on the status response and the chat request
pub const TOKEN_HEADER: &str = "x-vqd-4";

/// Header asking the status endpoint to issue a new token
pub const ACCEPT_TOKEN_HEADER: &str = "x-vqd-accept";

/// Browser impersonation header set (names must be lowercase)
const IMPERSONATION_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("accept-language", "zh-CN,zh;q=0.9"),
    ("origin", "https://duckduckgo.com/"),
    ("cookie", "l=wt-wt; ah=wt-wt; dcm=6"),
    ("dnt", "1"),
    ("priority", "u=1, i"),
    ("referer", "https://duckduckgo.com/"),
    (
        "sec-ch-ua",
        r#""Microsoft Edge";v="129", "Not(A:Brand";v="8", "Chromium";v="129""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""Windows""#),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
    ),
];

/// Build the impersonation header set shared by all upstream requests
pub fn impersonation_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(IMPERSONATION_HEADERS.len() + 2);

    for (name, value) in IMPERSONATION_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    headers
}

/// Headers for the token handshake: impersonation set plus the accept-token flag
pub fn token_request_headers() -> HeaderMap {
    let mut headers = impersonation_headers();
    headers.insert(
        HeaderName::from_static(ACCEPT_TOKEN_HEADER),
        HeaderValue::from_static("1"),
    );
    headers
}

/// Headers for the chat call: base set plus the session token and JSON content type
pub fn chat_request_headers(
    base: &HeaderMap,
    token: &SessionToken,
) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = base.clone();
    let mut token_value = HeaderValue::from_str(token.as_str())?;
    token_value.set_sensitive(true);

    headers.insert(HeaderName::from_static(TOKEN_HEADER), token_value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
