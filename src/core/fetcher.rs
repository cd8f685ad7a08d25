use crate::config::toml_config::SourceConfig;
use crate::domain::model::RawCentersResponse;
use crate::utils::error::{NotifierError, Result};
use reqwest::Client;
use std::time::Duration;

/// 呼叫 calendarByDistrict API，每次一個地區、一個日期
pub struct SlotFetcher {
    client: Client,
    endpoint: String,
}

impl SlotFetcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(source: &SourceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = source.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        if let Some(user_agent) = &source.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: source.endpoint.clone(),
        })
    }

    pub async fn fetch(&self, district_id: u32, date: &str) -> Result<RawCentersResponse> {
        tracing::debug!(
            "Requesting {} for district_id={} date={}",
            self.endpoint,
            district_id,
            date
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("district_id", district_id.to_string()), ("date", date.to_string())])
            .send()
            .await
            .map_err(|source| NotifierError::FetchError {
                district_id,
                source,
            })?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(NotifierError::UpstreamStatusError {
                district_id,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| NotifierError::FetchError {
                district_id,
                source,
            })?;
        tracing::debug!("Result for district_id {}: {}", district_id, body);

        // 嚴格解碼成型別結構，格式錯誤回傳錯誤而非 panic
        serde_json::from_str(&body).map_err(|source| NotifierError::DecodeError {
            district_id,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_sends_district_and_date() {
        let server = MockServer::start();
        let mock_data = serde_json::json!({
            "centers": [{
                "center_id": 1234,
                "block_name": "Haveli",
                "district_name": "Pune",
                "sessions": [{
                    "date": "21-10-2026",
                    "min_age_limit": 18,
                    "available_capacity": 12,
                    "slots": ["09:00AM-11:00AM"]
                }]
            }]
        });

        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/calendarByDistrict")
                .query_param("district_id", "363")
                .query_param("date", "19-10-2026");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_data);
        });

        let fetcher = SlotFetcher::new(server.url("/calendarByDistrict"));
        let response = fetcher.fetch(363, "19-10-2026").await.unwrap();

        api_mock.assert();
        assert_eq!(response.centers.len(), 1);
        assert_eq!(response.centers[0].district_name, "Pune");
        assert_eq!(response.centers[0].sessions[0].available_capacity, 12);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/calendarByDistrict");
            then.status(403);
        });

        let fetcher = SlotFetcher::new(server.url("/calendarByDistrict"));
        let result = fetcher.fetch(363, "19-10-2026").await;

        api_mock.assert();
        assert!(matches!(
            result,
            Err(NotifierError::UpstreamStatusError {
                district_id: 363,
                status: 403
            })
        ));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_decode_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/calendarByDistrict");
            then.status(200).body("{'centers': []}");
        });

        let fetcher = SlotFetcher::new(server.url("/calendarByDistrict"));
        let result = fetcher.fetch(363, "19-10-2026").await;

        api_mock.assert();
        assert!(matches!(result, Err(NotifierError::DecodeError { .. })));
    }

    #[tokio::test]
    async fn test_fetch_missing_centers_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/calendarByDistrict");
            then.status(200)
                .json_body(serde_json::json!({"error": "Invalid district"}));
        });

        let fetcher = SlotFetcher::new(server.url("/calendarByDistrict"));
        let result = fetcher.fetch(9999, "19-10-2026").await;

        assert!(matches!(result, Err(NotifierError::DecodeError { .. })));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // 沒有伺服器監聽的埠
        let fetcher = SlotFetcher::new("http://127.0.0.1:9/calendarByDistrict");
        let result = fetcher.fetch(363, "19-10-2026").await;

        assert!(matches!(result, Err(NotifierError::FetchError { .. })));
    }

    fn source_config(endpoint: String) -> SourceConfig {
        SourceConfig {
            endpoint,
            timeout_seconds: Some(1),
            user_agent: Some("vaccine-notifier-test".to_string()),
        }
    }

    #[tokio::test]
    async fn test_configured_user_agent_is_sent() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/calendarByDistrict")
                .header("user-agent", "vaccine-notifier-test");
            then.status(200)
                .json_body(serde_json::json!({"centers": []}));
        });

        let fetcher = SlotFetcher::from_config(&source_config(server.url("/calendarByDistrict")))
            .unwrap();
        let response = fetcher.fetch(363, "19-10-2026").await.unwrap();

        api_mock.assert();
        assert!(response.centers.is_empty());
    }

    #[tokio::test]
    async fn test_configured_timeout_is_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/calendarByDistrict");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({"centers": []}));
        });

        let fetcher = SlotFetcher::from_config(&source_config(server.url("/calendarByDistrict")))
            .unwrap();
        let result = fetcher.fetch(363, "19-10-2026").await;

        match result {
            Err(NotifierError::FetchError { district_id, source }) => {
                assert_eq!(district_id, 363);
                assert!(source.is_timeout());
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
