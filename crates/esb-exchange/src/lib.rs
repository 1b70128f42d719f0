//! esb-exchange
//!
//! Thin RPC boundary to the Colossus betting-settlement exchange.
//!
//! This crate owns the wire vocabulary (payloads, responses, exchange-side
//! status enums) and the signed HTTP client. It knows nothing about internal
//! models; `esb-convert` translates between the two vocabularies.
//!
//! All operations are idempotent on the exchange side; the feed relies on
//! that plus resync-before-advance instead of exactly-once delivery.

mod auth;
mod client;
mod error;
mod payloads;
mod responses;
mod status;

pub use client::Client;
pub use error::ExchangeError;
pub use payloads::*;
pub use responses::*;
pub use status::*;

use async_trait::async_trait;

/// Exchange RPC surface consumed by the feed.
///
/// Implemented by [`Client`] for production and by the scripted exchange in
/// `esb-testkit` for scenario tests.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn create_pool(&self, payload: &PoolCreatePayload)
        -> Result<GenericResponse, ExchangeError>;

    async fn toggle_pool_visibility(
        &self,
        external_id: &str,
        visible: bool,
    ) -> Result<GenericResponse, ExchangeError>;

    async fn toggle_pool_trading(
        &self,
        external_id: &str,
        trading: bool,
    ) -> Result<GenericResponse, ExchangeError>;

    async fn settle_pool(&self, external_id: &str) -> Result<GenericResponse, ExchangeError>;

    async fn pool_status(&self, external_id: &str) -> Result<PoolStatusResponse, ExchangeError>;

    async fn create_sport_event(
        &self,
        payload: &SportEventPayload,
    ) -> Result<GenericResponse, ExchangeError>;

    async fn update_event_probabilities(
        &self,
        external_id: &str,
        payload: &EventProbabilitiesPayload,
    ) -> Result<GenericResponse, ExchangeError>;

    async fn update_event_results(
        &self,
        external_id: &str,
        payload: &EventResultsPayload,
    ) -> Result<GenericResponse, ExchangeError>;

    async fn progress_sport_event(
        &self,
        external_id: &str,
        from: SportEventStatus,
        to: SportEventStatus,
    ) -> Result<GenericResponse, ExchangeError>;

    async fn reverse_sport_event(&self, external_id: &str)
        -> Result<GenericResponse, ExchangeError>;

    async fn abandon_sport_event(&self, external_id: &str)
        -> Result<GenericResponse, ExchangeError>;

    async fn sport_event_status(
        &self,
        external_id: &str,
    ) -> Result<SportEventStatusResponse, ExchangeError>;
}

// Lets callers share one client between the feeder and an admin surface.
#[async_trait]
impl<T: ExchangeApi + ?Sized> ExchangeApi for std::sync::Arc<T> {
    async fn create_pool(
        &self,
        payload: &PoolCreatePayload,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).create_pool(payload).await
    }

    async fn toggle_pool_visibility(
        &self,
        external_id: &str,
        visible: bool,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).toggle_pool_visibility(external_id, visible).await
    }

    async fn toggle_pool_trading(
        &self,
        external_id: &str,
        trading: bool,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).toggle_pool_trading(external_id, trading).await
    }

    async fn settle_pool(&self, external_id: &str) -> Result<GenericResponse, ExchangeError> {
        (**self).settle_pool(external_id).await
    }

    async fn pool_status(&self, external_id: &str) -> Result<PoolStatusResponse, ExchangeError> {
        (**self).pool_status(external_id).await
    }

    async fn create_sport_event(
        &self,
        payload: &SportEventPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).create_sport_event(payload).await
    }

    async fn update_event_probabilities(
        &self,
        external_id: &str,
        payload: &EventProbabilitiesPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).update_event_probabilities(external_id, payload).await
    }

    async fn update_event_results(
        &self,
        external_id: &str,
        payload: &EventResultsPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).update_event_results(external_id, payload).await
    }

    async fn progress_sport_event(
        &self,
        external_id: &str,
        from: SportEventStatus,
        to: SportEventStatus,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).progress_sport_event(external_id, from, to).await
    }

    async fn reverse_sport_event(
        &self,
        external_id: &str,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).reverse_sport_event(external_id).await
    }

    async fn abandon_sport_event(
        &self,
        external_id: &str,
    ) -> Result<GenericResponse, ExchangeError> {
        (**self).abandon_sport_event(external_id).await
    }

    async fn sport_event_status(
        &self,
        external_id: &str,
    ) -> Result<SportEventStatusResponse, ExchangeError> {
        (**self).sport_event_status(external_id).await
    }
}
