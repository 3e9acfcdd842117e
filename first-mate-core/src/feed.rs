//! Fetching a student's timetable feed.

use url::Url;

use crate::error::{FirstMateError, FirstMateResult};
use crate::ics::validate_calendar;

/// Turn a feed URL as copied from myUNSW into one we can fetch.
///
/// `webcal://` is rewritten to `https://`; anything other than http(s)
/// is rejected.
pub fn normalize_feed_url(raw: &str) -> FirstMateResult<Url> {
    let raw = raw.trim();
    let rewritten = match raw.get(..9) {
        Some(scheme) if scheme.eq_ignore_ascii_case("webcal://") => {
            format!("https://{}", &raw[9..])
        }
        _ => raw.to_string(),
    };

    let url = Url::parse(&rewritten)
        .map_err(|e| FirstMateError::InvalidFeedUrl(raw.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FirstMateError::InvalidFeedUrl(
            raw.to_string(),
            format!("unsupported scheme '{}'", other),
        )),
    }
}

fn http_client() -> FirstMateResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!("first-mate/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FirstMateError::Download(e.to_string()))
}

/// Download an ICS feed and check that it is a calendar.
pub async fn download_ical(raw_url: &str) -> FirstMateResult<String> {
    let url = normalize_feed_url(raw_url)?;
    fetch_calendar(&http_client()?, url).await
}

async fn fetch_calendar(client: &reqwest::Client, url: Url) -> FirstMateResult<String> {
    tracing::info!(%url, "downloading calendar feed");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FirstMateError::Download(format!("{}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(FirstMateError::Download(format!(
            "{} returned HTTP {}",
            url,
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FirstMateError::Download(format!("{}: {}", url, e)))?;

    validate_calendar(&body)?;
    tracing::debug!(%url, bytes = body.len(), "calendar feed downloaded");

    Ok(body)
}
