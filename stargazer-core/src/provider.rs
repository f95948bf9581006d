use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, header::ACCEPT};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{
    coordinate::Coordinate,
    error::{FetchError, truncate_body},
    model::{CelestialData, DailyPeriod, ForecastPeriod, PointLinks},
};

pub mod nws;
pub mod usno;

/// Source of grid metadata plus hourly and daily forecasts.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn points(&self, coordinate: Coordinate) -> Result<PointLinks, FetchError>;

    async fn hourly(&self, links: &PointLinks) -> Result<Vec<ForecastPeriod>, FetchError>;

    async fn daily(&self, links: &PointLinks) -> Result<Vec<DailyPeriod>, FetchError>;
}

/// Source of sun/moon events and moon illumination.
#[async_trait]
pub trait CelestialProvider: Send + Sync + Debug {
    async fn celestial(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
        utc_offset_hours: f64,
    ) -> Result<CelestialData, FetchError>;
}

/// Thin JSON-over-HTTP client shared by the providers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { http })
    }

    /// GET `url` and decode the body; any non-2xx status is an error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        debug!(url, ?query, "GET");

        let mut req = self
            .http
            .get(url)
            .header(ACCEPT, "application/geo+json, application/json");
        if !query.is_empty() {
            req = req.query(query);
        }

        let res = req
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|source| FetchError::Decode { url: url.to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Ping {
        ok: bool,
    }

    fn client() -> HttpClient {
        HttpClient::new("stargazer-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_user_agent_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("user-agent", "stargazer-test"))
            .and(query_param("q", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .mount(&server)
            .await;

        let url = format!("{}/ping", server.uri());
        let ping: Ping = client().get_json(&url, &[("q", "1".to_string())]).await.unwrap();
        assert!(ping.ok);
    }

    #[tokio::test]
    async fn non_success_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let url = format!("{}/ping", server.uri());
        let err = client().get_json::<Ping>(&url, &[]).await.unwrap_err();
        match err {
            FetchError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let url = format!("{}/ping", server.uri());
        let err = client().get_json::<Ping>(&url, &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
