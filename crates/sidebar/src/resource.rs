// ABOUTME: HTTP fetching of the sidebars page with a content-length cap and charset decoding.
// ABOUTME: Maps reqwest failures onto SidebarError codes, keeping timeouts distinct from other fetch errors.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::SidebarError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using the content-type charset or detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes using the charset from a content-type header, falling back to detection.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| part.trim().strip_prefix("charset=").map(str::to_string))
        .map(|charset| charset.trim_matches('"').trim_matches('\'').to_string())
}

fn request_error(url: &str, context: &str, err: reqwest::Error) -> SidebarError {
    if err.is_timeout() {
        SidebarError::timeout(url, "Fetch", Some(anyhow::anyhow!("{}: {}", context, err)))
    } else {
        SidebarError::fetch(url, "Fetch", Some(anyhow::anyhow!("{}: {}", context, err)))
    }
}

/// GET `url`. Anything other than a 200 response is an error.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    headers: &HashMap<String, String>,
) -> Result<FetchResult, SidebarError> {
    let parsed = url::Url::parse(url).map_err(|e| {
        SidebarError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(SidebarError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let mut request = client.get(parsed);
    for (key, value) in headers {
        request = request.header(key, value);
    }

    tracing::debug!(url, "fetching");
    let response = request
        .send()
        .await
        .map_err(|e| request_error(url, "request failed", e))?;

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(SidebarError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response
        .bytes()
        .await
        .map_err(|e| request_error(url, "failed to read body", e))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(SidebarError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if status != 200 {
        return Err(SidebarError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchResult {
        status,
        url: url.to_string(),
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("test-agent")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/sidebars");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<section>hi</section>");
        });

        let result = fetch(&test_client(), &server.url("/sidebars"), &HashMap::new())
            .await
            .expect("fetch should succeed");
        mock.assert();
        assert_eq!(result.status, 200);
        assert_eq!(result.text(), "<section>hi</section>");
    }

    #[tokio::test]
    async fn test_fetch_sends_custom_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/sidebars").header("x-preview", "1");
            then.status(200).body("ok");
        });

        let headers = HashMap::from([("x-preview".to_string(), "1".to_string())]);
        fetch(&test_client(), &server.url("/sidebars"), &headers)
            .await
            .expect("fetch should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_non_200_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/sidebars");
            then.status(404).body("not found");
        });

        let err = fetch(&test_client(), &server.url("/sidebars"), &HashMap::new())
            .await
            .expect_err("404 should fail");
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500)).body("late");
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = fetch(&client, &server.url("/slow"), &HashMap::new())
            .await
            .expect_err("should time out");
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_scheme() {
        let err = fetch(&test_client(), "ftp://example.com/sidebars", &HashMap::new())
            .await
            .expect_err("ftp is not fetched");
        assert!(err.is_invalid_url());
    }

    #[test]
    fn test_decode_uses_declared_charset() {
        let body = b"caf\xe9";
        assert_eq!(decode_body(body, Some("text/html; charset=ISO-8859-1")), "café");
    }

    #[test]
    fn test_extract_charset_strips_quotes() {
        assert_eq!(
            extract_charset("text/html; Charset=\"UTF-8\"").as_deref(),
            Some("utf-8")
        );
        assert_eq!(extract_charset("text/html"), None);
    }
}
