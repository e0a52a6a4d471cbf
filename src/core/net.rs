// src/core/net.rs

// HTTPS GET against the stats API (blocking; one worker, one request at a time)

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};

use crate::config::consts::{HOST, HTTP_TIMEOUT_SECS, PREFIX};
use crate::error::SourceError;

/// The stats API stalls or 403s requests that don't look like they came from
/// the nba.com front end.
fn default_headers() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(USER_AGENT, HeaderValue::from_static(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    ));
    h.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    h.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    h.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    h.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    h.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    h.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    h
}

pub fn client() -> Result<Client, SourceError> {
    Ok(Client::builder()
        .default_headers(default_headers())
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?)
}

/// GET `https://<HOST><PREFIX><endpoint>` with `query`, returning the body text.
/// Any non-2xx status is an error.
pub fn http_get(client: &Client, endpoint: &str, query: &[(&str, &str)]) -> Result<String, SourceError> {
    let url = format!("https://{}{}{}", HOST, PREFIX, endpoint);
    let resp = client.get(&url).query(query).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status { status: status.as_u16(), url });
    }
    Ok(resp.text()?)
}
