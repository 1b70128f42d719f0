use chrono::Utc;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::auth;
use crate::error::ExchangeError;
use crate::payloads::{
    EventProbabilitiesPayload, EventResultsPayload, PoolCreatePayload, SportEventPayload,
};
use crate::responses::{GenericResponse, PoolStatusResponse, SportEventStatusResponse};
use crate::status::SportEventStatus;
use crate::ExchangeApi;

const POOLS: &str = "pools";
const SPORT_EVENTS: &str = "sport_events";

/// Signed HTTP client for the exchange API.
///
/// `base_url` is injectable so tests can point the client at a mock server.
#[derive(Debug, Clone)]
pub struct Client {
    key: String,
    secret: String,
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<T, ExchangeError> {
        let bytes = match body {
            Some(b) => serde_json::to_vec(b)?,
            None => Vec::new(),
        };

        let url = self.url_for(path);
        let content_md5 = auth::content_md5(&bytes);
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let canonical = auth::canonical_string(
            method.as_str(),
            "application/json",
            &content_md5,
            &format!("/{path}"),
            &date,
        );
        let authorization = auth::signature(&self.key, &self.secret, &canonical);

        let response = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", authorization)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Content-MD5", content_md5)
            .header("Date", date)
            .body(bytes)
            .send()
            .await
            .map_err(|source| ExchangeError::Transport {
                method: method.to_string(),
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ExchangeError::Transport {
                method: method.to_string(),
                url,
                source,
            })
    }
}

#[async_trait::async_trait]
impl ExchangeApi for Client {
    async fn create_pool(
        &self,
        payload: &PoolCreatePayload,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(Method::POST, POOLS, Some(&json!({ "pool": payload })))
            .await
    }

    async fn toggle_pool_visibility(
        &self,
        external_id: &str,
        visible: bool,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{POOLS}/{external_id}/visible"),
            Some(&json!({ "pool": { "visible": visible } })),
        )
        .await
    }

    async fn toggle_pool_trading(
        &self,
        external_id: &str,
        trading: bool,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{POOLS}/{external_id}/trading"),
            Some(&json!({ "pool": { "trading": trading } })),
        )
        .await
    }

    async fn settle_pool(&self, external_id: &str) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{POOLS}/{external_id}/settle"),
            Some(&json!({})),
        )
        .await
    }

    async fn pool_status(&self, external_id: &str) -> Result<PoolStatusResponse, ExchangeError> {
        self.send(
            Method::GET,
            &format!("{POOLS}/{external_id}"),
            None::<&serde_json::Value>,
        )
        .await
    }

    async fn create_sport_event(
        &self,
        payload: &SportEventPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::POST,
            SPORT_EVENTS,
            Some(&json!({ "sport_event": payload })),
        )
        .await
    }

    async fn update_event_probabilities(
        &self,
        external_id: &str,
        payload: &EventProbabilitiesPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{SPORT_EVENTS}/{external_id}/probabilities"),
            Some(payload),
        )
        .await
    }

    async fn update_event_results(
        &self,
        external_id: &str,
        payload: &EventResultsPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{SPORT_EVENTS}/{external_id}/result"),
            Some(&json!({ "results": payload })),
        )
        .await
    }

    async fn progress_sport_event(
        &self,
        external_id: &str,
        from: SportEventStatus,
        to: SportEventStatus,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{SPORT_EVENTS}/{external_id}/progress"),
            Some(&json!({ "old_status": from, "new_status": to })),
        )
        .await
    }

    async fn reverse_sport_event(
        &self,
        external_id: &str,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{SPORT_EVENTS}/{external_id}/reverse"),
            Some(&json!({})),
        )
        .await
    }

    async fn abandon_sport_event(
        &self,
        external_id: &str,
    ) -> Result<GenericResponse, ExchangeError> {
        self.send(
            Method::PUT,
            &format!("{SPORT_EVENTS}/{external_id}/abandon"),
            Some(&json!({})),
        )
        .await
    }

    async fn sport_event_status(
        &self,
        external_id: &str,
    ) -> Result<SportEventStatusResponse, ExchangeError> {
        self.send(
            Method::GET,
            &format!("{SPORT_EVENTS}/{external_id}"),
            None::<&serde_json::Value>,
        )
        .await
    }
}
