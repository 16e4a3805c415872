//! OpenMensa v2 JSON API client.
//!
//! [`OpenMensaApi`] wraps a `reqwest` client and maps the handful of endpoints
//! the CLI needs onto typed records:
//!
//! - `GET /canteens?page=N` – one page of the canteen listing
//! - `GET /canteens/{id}` – a single canteen
//! - `GET /canteens/{id}/days` – opening days, with optional `page`, `limit`, `start`
//! - `GET /canteens/{id}/days/{date}/meals` – meals for one day
//!
//! Every request drains the full body before classifying the outcome, and every
//! failure is logged here and handed back as a [`MensaError`]. Presentation is
//! left to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use mensa::api::{ApiSettings, OpenMensaApi};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = OpenMensaApi::new(ApiSettings::default())?;
//!
//!     let today = api.meals_today(32).await?;
//!     println!("{} meals on {}", today.meals.len(), today.day.date);
//!
//!     let all = api.fetch_all_canteens().await?;
//!     println!("{} canteens known", all.len());
//!     Ok(())
//! }
//! ```

use crate::error::{MensaError, Result};
use crate::fetcher::{DEFAULT_CONCURRENCY, PageFetcher};
use crate::models::{Canteen, CanteenDate, CanteenPage, DayMeals, Meal, parse_date};
use chrono::NaiveDate;
use reqwest::Url;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const OPENMENSA_API_BASE: &str = "https://openmensa.org/api/v2";
pub const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of days requested for week views
pub const WEEK_DAYS: u32 = 7;

/// Connection settings for [`OpenMensaApi`]
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Maximum number of canteen pages fetched at once
    pub concurrency: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: OPENMENSA_API_BASE.to_string(),
            timeout: Some(REQUEST_TIMEOUT),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Parameters for the day-listing endpoint. Zero and `None` mean "omit".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaysQuery {
    pub start: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl DaysQuery {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Build the query pairs actually sent upstream.
    ///
    /// A start date that is not `YYYY-MM-DD` is logged and left out, which makes
    /// the API fall back to the current date.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if self.page != 0 {
            params.push(("page", self.page.to_string()));
        }
        if self.limit != 0 {
            params.push(("limit", self.limit.to_string()));
        }
        if let Some(start) = self.start.as_deref().filter(|s| !s.is_empty()) {
            match parse_date(start) {
                Ok(date) => params.push(("start", date.format("%Y-%m-%d").to_string())),
                Err(e) => tracing::warn!(start, error = %e, "ignoring start date, using current date"),
            }
        }

        params
    }
}

/// OpenMensa API client
#[derive(Clone)]
pub struct OpenMensaApi {
    client: reqwest::Client,
    base_url: Url,
    concurrency: usize,
}

impl OpenMensaApi {
    /// Create a client for the endpoint described by `settings`.
    pub fn new(settings: ApiSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            MensaError::Validation(format!("malformed API URL '{}': {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MensaError::Validation(format!(
                "API URL '{}' cannot carry a path",
                settings.base_url
            )));
        }

        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(settings.concurrency.max(1))
            .user_agent(format!("mensa/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        // Local stub servers must not be routed through a system proxy
        if matches!(base_url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]")) {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            concurrency: settings.concurrency.max(1),
        })
    }

    /// Join the base endpoint with path segments and query pairs.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// GET `segments` with `query` and decode the JSON body.
    ///
    /// Returns the decoded value together with the response headers.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<(T, HeaderMap)> {
        let url = self.endpoint(segments, query);
        tracing::debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "request failed");
            MensaError::Transport(e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "failed to read response body");
            MensaError::Transport(e)
        })?;

        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!(%url, "not found");
            return Err(MensaError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            tracing::warn!(%url, %status, "unexpected status");
            return Err(MensaError::Http {
                status,
                url: url.to_string(),
            });
        }

        let value = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(%url, error = %e, "failed to decode response");
            MensaError::Decode(e)
        })?;

        Ok((value, headers))
    }

    /// Fetch a single canteen by id.
    ///
    /// An empty object or `null` body counts as an unknown canteen.
    pub async fn canteen(&self, id: u32) -> Result<Canteen> {
        let id_segment = id.to_string();
        let (canteen, _): (Option<Canteen>, _) =
            self.get_json(&["canteens", &id_segment], &[]).await?;

        match canteen {
            Some(canteen) if canteen.id != 0 => Ok(canteen.normalized()),
            _ => Err(MensaError::NotFound(format!("canteen {}", id))),
        }
    }

    /// Fetch one page of the canteen listing.
    pub async fn canteen_page(&self, page: u32) -> Result<CanteenPage> {
        let (canteens, headers): (Vec<Canteen>, _) = self
            .get_json(&["canteens"], &[("page", page.to_string())])
            .await?;
        let total_pages = total_pages(&headers).inspect_err(|e| {
            tracing::warn!(page, error = %e, "unusable page count");
        })?;

        Ok(CanteenPage {
            canteens: canteens.into_iter().map(Canteen::normalized).collect(),
            total_pages,
        })
    }

    /// Fetch every canteen, several pages at a time.
    ///
    /// Fails as a whole if any page fails; no partial listing is returned.
    pub async fn fetch_all_canteens(&self) -> Result<Vec<Canteen>> {
        let api = self.clone();
        PageFetcher::new(self.concurrency)
            .fetch_all(move |page| {
                let api = api.clone();
                async move { api.canteen_page(page).await }
            })
            .await
    }

    /// List opening days of a canteen.
    pub async fn days(&self, canteen_id: u32, query: &DaysQuery) -> Result<Vec<CanteenDate>> {
        let id_segment = canteen_id.to_string();
        let (days, _) = self
            .get_json(&["canteens", &id_segment, "days"], &query.params())
            .await?;
        Ok(days)
    }

    /// First day of the listing selected by `start`, `page` and `limit`.
    pub async fn resolve_date(
        &self,
        canteen_id: u32,
        start: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<CanteenDate> {
        let query = DaysQuery {
            start: start.map(str::to_string),
            page,
            limit,
        };
        self.days(canteen_id, &query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MensaError::NotFound(format!("no listed days for canteen {}", canteen_id)))
    }

    pub async fn today(&self, canteen_id: u32) -> Result<CanteenDate> {
        self.resolve_date(canteen_id, None, 0, 1).await
    }

    /// The day after today, approximated as page 2 of a one-day listing.
    ///
    /// Gaps in the listing (weekends, holidays) shift the result accordingly.
    pub async fn tomorrow(&self, canteen_id: u32) -> Result<CanteenDate> {
        self.resolve_date(canteen_id, None, 2, 1).await
    }

    /// Opening status for a specific `YYYY-MM-DD` date.
    pub async fn date_status(&self, canteen_id: u32, date: &str) -> Result<CanteenDate> {
        self.resolve_date(canteen_id, Some(date), 0, 1).await
    }

    /// Up to seven upcoming listed days.
    pub async fn week(&self, canteen_id: u32) -> Result<Vec<CanteenDate>> {
        let days = self.days(canteen_id, &DaysQuery::limit(WEEK_DAYS)).await?;
        if days.is_empty() {
            return Err(MensaError::NotFound(format!(
                "no listed days for canteen {}",
                canteen_id
            )));
        }
        Ok(days)
    }

    /// Meals offered on `date`.
    pub async fn meals(&self, canteen_id: u32, date: NaiveDate) -> Result<Vec<Meal>> {
        let id_segment = canteen_id.to_string();
        let date_segment = date.format("%Y-%m-%d").to_string();
        let (meals, _) = self
            .get_json(
                &["canteens", &id_segment, "days", &date_segment, "meals"],
                &[],
            )
            .await?;
        Ok(meals)
    }

    /// Meals for an already resolved day. A failed lookup yields no meals.
    async fn meals_for(&self, canteen_id: u32, day: CanteenDate) -> DayMeals {
        let meals = match self.meals(canteen_id, day.date).await {
            Ok(meals) => meals,
            Err(e) => {
                tracing::warn!(canteen_id, date = %day.date, error = %e, "no meal data");
                Vec::new()
            }
        };
        DayMeals { day, meals }
    }

    pub async fn meals_today(&self, canteen_id: u32) -> Result<DayMeals> {
        let day = self.today(canteen_id).await?;
        Ok(self.meals_for(canteen_id, day).await)
    }

    pub async fn meals_tomorrow(&self, canteen_id: u32) -> Result<DayMeals> {
        let day = self.tomorrow(canteen_id).await?;
        Ok(self.meals_for(canteen_id, day).await)
    }

    /// Meals for each of the upcoming listed days, fetched one day at a time.
    pub async fn meals_week(&self, canteen_id: u32) -> Result<Vec<DayMeals>> {
        let days = self.week(canteen_id).await?;
        let mut week = Vec::with_capacity(days.len());
        for day in days {
            week.push(self.meals_for(canteen_id, day).await);
        }
        Ok(week)
    }
}

/// Read the page count advertised by the canteen listing.
pub fn total_pages(headers: &HeaderMap) -> Result<u32> {
    let value = headers
        .get(TOTAL_PAGES_HEADER)
        .ok_or(MensaError::MissingHeader(TOTAL_PAGES_HEADER))?;
    let text = value.to_str().unwrap_or_default().trim();

    text.parse().map_err(|_| MensaError::InvalidHeader {
        name: TOTAL_PAGES_HEADER,
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn api(base: &str) -> OpenMensaApi {
        OpenMensaApi::new(ApiSettings {
            base_url: base.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments_and_query() {
        let api = api(OPENMENSA_API_BASE);
        let url = api.endpoint(&["canteens"], &[("page", "3".to_string())]);
        assert_eq!(url.as_str(), "https://openmensa.org/api/v2/canteens?page=3");

        let url = api.endpoint(&["canteens", "32", "days", "2020-01-15", "meals"], &[]);
        assert_eq!(
            url.as_str(),
            "https://openmensa.org/api/v2/canteens/32/days/2020-01-15/meals"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let api = api("http://127.0.0.1:9/api/v2/");
        let url = api.endpoint(&["canteens", "1"], &[]);
        assert_eq!(url.as_str(), "http://127.0.0.1:9/api/v2/canteens/1");
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let result = OpenMensaApi::new(ApiSettings {
            base_url: "not a url".to_string(),
            ..ApiSettings::default()
        });
        assert!(matches!(result, Err(MensaError::Validation(_))));
    }

    #[test]
    fn test_days_params_omit_unset_values() {
        assert!(DaysQuery::default().params().is_empty());
        assert_eq!(DaysQuery::limit(7).params(), vec![("limit", "7".to_string())]);

        let tomorrow = DaysQuery {
            start: None,
            page: 2,
            limit: 1,
        };
        assert_eq!(
            tomorrow.params(),
            vec![("page", "2".to_string()), ("limit", "1".to_string())]
        );
    }

    #[test]
    fn test_days_params_validate_start_date() {
        let valid = DaysQuery {
            start: Some("2020-02-13".to_string()),
            page: 3,
            limit: 3,
        };
        assert_eq!(
            valid.params(),
            vec![
                ("page", "3".to_string()),
                ("limit", "3".to_string()),
                ("start", "2020-02-13".to_string()),
            ]
        );

        let invalid = DaysQuery {
            start: Some("13.02.2020".to_string()),
            page: 0,
            limit: 1,
        };
        assert_eq!(invalid.params(), vec![("limit", "1".to_string())]);
    }

    #[test]
    fn test_total_pages_header() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            total_pages(&headers),
            Err(MensaError::MissingHeader(_))
        ));

        headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from_static("abc"));
        assert!(matches!(
            total_pages(&headers),
            Err(MensaError::InvalidHeader { .. })
        ));

        headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from_static("12"));
        assert_eq!(total_pages(&headers).unwrap(), 12);
    }
}
