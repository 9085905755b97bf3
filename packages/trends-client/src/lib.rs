//! Pure Google Trends client.
//!
//! A minimal client for the unofficial Trends web API. Supports comparing up
//! to five keywords over a timeframe and returning their relative interest
//! over time, plus acquiring the `NID` session cookie the API expects.
//!
//! The API answers in two steps: an `explore` call hands out a token per
//! widget, and the `TIMESERIES` widget token is then redeemed against
//! `widgetdata/multiline`. Both bodies start with an anti-hijacking guard
//! that is stripped before parsing.
//!
//! # Example
//!
//! ```rust,ignore
//! use trends_client::{TrendsClient, TrendsQuery};
//!
//! let cookie = trends_client::fetch_session_cookie("https://trends.google.com").await?;
//! let client = TrendsClient::new(cookie);
//!
//! let query = TrendsQuery::new(["Inception Movie", "Feature film"], "2010-07-16 2011-07-16");
//! let series = client.interest_over_time(&query).await?;
//! println!("{:?}", series.mean("Inception Movie"));
//! ```

pub mod error;
pub mod types;

pub use error::{Result, TrendsError};
pub use types::{InterestSeries, TimelinePoint, TrendsQuery, ALL_CATEGORIES};

use reqwest::header::{COOKIE, SET_COOKIE, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use types::{ExploreResponse, MultilineResponse, Widget};

pub const BASE_URL: &str = "https://trends.google.com";

const SESSION_COOKIE: &str = "NID";
const TIMESERIES_WIDGET: &str = "TIMESERIES";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

#[derive(Clone)]
pub struct TrendsClient {
    client: reqwest::Client,
    session_cookie: String,
    base_url: String,
    language: String,
    tz_offset_minutes: i32,
}

impl TrendsClient {
    /// Create a client that authenticates with the given `NID` cookie value.
    pub fn new(session_cookie: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            session_cookie: session_cookie.into(),
            base_url: BASE_URL.to_string(),
            language: "en-US".to_string(),
            tz_offset_minutes: 0,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Relative interest over time for every keyword of `query`.
    pub async fn interest_over_time(&self, query: &TrendsQuery) -> Result<InterestSeries> {
        query.validate()?;

        let widget = self.explore(query).await?;
        let token = widget
            .token
            .ok_or_else(|| TrendsError::Malformed("time-series widget has no token".into()))?;
        let request = widget
            .request
            .ok_or_else(|| TrendsError::Malformed("time-series widget has no request".into()))?;

        let url = format!("{}/trends/api/widgetdata/multiline", self.base_url);
        let request = serde_json::to_string(&request)?;
        let data: MultilineResponse = self
            .get_guarded(&url, &[("req", request.as_str()), ("token", token.as_str())])
            .await?;

        tracing::debug!(
            keywords = ?query.keywords,
            timeframe = %query.timeframe,
            points = data.default.timeline_data.len(),
            "Fetched interest over time"
        );

        InterestSeries::new(query.keywords.clone(), data.default.timeline_data)
    }

    async fn explore(&self, query: &TrendsQuery) -> Result<Widget> {
        let url = format!("{}/trends/api/explore", self.base_url);
        let request = serde_json::to_string(&query.explore_request())?;
        let explore: ExploreResponse = self.get_guarded(&url, &[("req", request.as_str())]).await?;

        explore
            .widgets
            .into_iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or_else(|| TrendsError::Malformed("no time-series widget in explore response".into()))
    }

    async fn get_guarded<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        let tz = self.tz_offset_minutes.to_string();
        let resp = self
            .client
            .get(url)
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, self.session_cookie))
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .query(&[("hl", self.language.as_str()), ("tz", tz.as_str())])
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TrendsError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TrendsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(strip_guard(&body)?)?)
    }
}

/// Drops the `)]}'` prefix the API puts in front of JSON bodies.
fn strip_guard(body: &str) -> Result<&str> {
    body.find('{')
        .map(|start| &body[start..])
        .ok_or_else(|| TrendsError::Malformed("response has no JSON object".into()))
}

/// Request the Trends landing page and return the `NID` cookie it sets.
pub async fn fetch_session_cookie(base_url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let resp = client
        .get(format!("{}/", base_url.trim_end_matches('/')))
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await?;

    let cookie = resp
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_cookie_value);

    match cookie {
        Some(value) => Ok(value),
        None => {
            tracing::warn!(status = %resp.status(), "Trends landing page set no session cookie");
            Err(TrendsError::MissingCookie)
        }
    }
}

fn session_cookie_value(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
}
