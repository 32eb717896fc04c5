use bytes::Bytes;
use reqwest::{header::HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// A fully drained HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Deserializes the body as JSON. The status code is not looked at.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::DecodingError)
    }

    /// Decodes the body with the charset named by `Content-Type`, falling
    /// back to UTF-8. Malformed sequences are replaced.
    #[cfg(feature = "charset")]
    pub fn text(&self) -> String {
        let encoding = self
            .charset()
            .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
            .unwrap_or(encoding_rs::UTF_8);
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }

    #[cfg(not(feature = "charset"))]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[cfg(feature = "charset")]
    fn charset(&self) -> Option<&str> {
        let content_type = self.headers.get(reqwest::header::CONTENT_TYPE)?.to_str().ok()?;
        content_type.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE, SET_COOKIE};
    use serde::Deserialize;

    fn make_response(content_type: Option<&'static str>, body: &'static [u8]) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Response::new(StatusCode::OK, headers, Bytes::from_static(body))
    }

    #[test]
    fn test_json() {
        #[derive(Debug, Deserialize)]
        struct Echo {
            url: String,
        }

        let response = make_response(
            Some("application/json"),
            br#"{"url": "http://example.test/get"}"#,
        );
        let echo: Echo = response.json().unwrap();
        assert_eq!(echo.url, "http://example.test/get");
        assert!(response.is_success());
    }

    #[test]
    fn test_json_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Echo {
            url: String,
        }

        let response = make_response(Some("application/json"), br#"{"url": 1}"#);
        assert!(matches!(
            response.json::<Echo>(),
            Err(Error::DecodingError(_))
        ));
        let response = make_response(None, b"<html></html>");
        assert!(matches!(
            response.json::<serde_json::Value>(),
            Err(Error::DecodingError(_))
        ));
    }

    #[test]
    fn test_headers_case_insensitive_and_multi_valued() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let response = Response::new(StatusCode::NOT_FOUND, headers, Bytes::new());

        assert_eq!(response.headers().get_all("Set-Cookie").iter().count(), 2);
        assert_eq!(
            response.headers().get("CONTENT-TYPE").unwrap(),
            "text/plain"
        );
        assert!(!response.is_success());
        assert!(response.into_bytes().is_empty());
    }

    #[test]
    fn test_text_utf8() {
        let response = make_response(None, "你好".as_bytes());
        assert_eq!(response.text(), "你好");
    }

    #[test]
    #[cfg(feature = "charset")]
    fn test_text_charset() {
        let response = make_response(Some("text/html; charset=GBK"), &[0xC4, 0xE3, 0xBA, 0xC3]);
        assert_eq!(response.charset(), Some("GBK"));
        assert_eq!(response.text(), "你好");

        let response = make_response(Some(r#"text/plain; Charset="utf-8""#), b"hi");
        assert_eq!(response.charset(), Some("utf-8"));
        assert_eq!(response.text(), "hi");
    }
}
