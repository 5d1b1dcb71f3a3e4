//! Async HTTP client wrapping reqwest.
//!
//! One plain GET per request, no retries, client-default timeout and
//! redirect handling. Non-2xx statuses are deliberately not treated as
//! errors: the body of a 404 page simply fails table selection downstream.

/// HTTP client for fetching the page named in an upload.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client with a standard browser user-agent.
    pub fn new() -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// GET the URL and return the response body as text.
    pub async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        let resp = self.client.get(url).send().await?;
        resp.text().await
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
