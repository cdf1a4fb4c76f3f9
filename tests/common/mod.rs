#![allow(dead_code)]

use reqwest::Client;

/// Get the base URL from TEST_API_URL, or None to skip the test when no
/// live server is configured.
pub fn base_url() -> Option<String> {
    std::env::var("TEST_API_URL").ok().filter(|s| !s.is_empty())
}

/// Build a reusable HTTP client.
pub fn http_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client")
}
