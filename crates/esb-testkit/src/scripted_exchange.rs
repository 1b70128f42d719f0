//! Scripted exchange double.
//!
//! Tracks remote pool/sport-event state under the same transition rules the
//! real exchange applies, so multi-stage passes (create, visible, trading)
//! observe consistent statuses. Unknown identifiers answer 404, which the
//! feed treats as "not yet created".

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use esb_exchange::{
    EventProbabilitiesPayload, EventResultsPayload, ExchangeApi, ExchangeError,
    ExchangePoolStatus, GenericResponse, PoolCreatePayload, PoolStatusResponse,
    SportEventPayload, SportEventStatus, SportEventStatusResponse,
};

/// One recorded RPC, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeCall {
    CreatePool(String),
    ToggleVisibility(String, bool),
    ToggleTrading(String, bool),
    SettlePool(String),
    PoolStatus(String),
    CreateSportEvent(String),
    UpdateProbabilities(String, usize),
    UpdateResults(String),
    Progress(String, SportEventStatus, SportEventStatus),
    Reverse(String),
    Abandon(String),
    SportEventStatus(String),
}

#[derive(Default)]
struct Inner {
    calls: Vec<ExchangeCall>,
    pools: HashMap<String, PoolStatusResponse>,
    events: HashMap<String, SportEventStatus>,
    failing: HashSet<&'static str>,
}

#[derive(Default)]
pub struct ScriptedExchange {
    inner: Mutex<Inner>,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("scripted exchange lock poisoned")
    }

    /// Every call to the named operation fails with a 500 until
    /// [`Self::heal`] is called.
    pub fn fail_on(&self, operation: &'static str) {
        self.lock().failing.insert(operation);
    }

    pub fn heal(&self, operation: &'static str) {
        self.lock().failing.remove(operation);
    }

    /// Pre-seed a remote pool at the given status.
    pub fn put_pool(&self, external_id: &str, status: ExchangePoolStatus) {
        self.lock().pools.insert(
            external_id.to_string(),
            PoolStatusResponse {
                status: Some(status),
                settlement_status: None,
                settled_at: None,
            },
        );
    }

    /// Pre-seed a remote pool that already carries a settlement timestamp.
    pub fn put_settled_pool(&self, external_id: &str, status: ExchangePoolStatus) {
        self.lock().pools.insert(
            external_id.to_string(),
            PoolStatusResponse {
                status: Some(status),
                settlement_status: Some("settled".to_string()),
                settled_at: Some(Utc::now()),
            },
        );
    }

    /// Pre-seed a remote sport event at the given status.
    pub fn put_event(&self, external_id: &str, status: SportEventStatus) {
        self.lock().events.insert(external_id.to_string(), status);
    }

    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.lock().calls.clone()
    }

    pub fn calls_for(&self, external_id: &str) -> Vec<ExchangeCall> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                ExchangeCall::CreatePool(id)
                | ExchangeCall::ToggleVisibility(id, _)
                | ExchangeCall::ToggleTrading(id, _)
                | ExchangeCall::SettlePool(id)
                | ExchangeCall::PoolStatus(id)
                | ExchangeCall::CreateSportEvent(id)
                | ExchangeCall::UpdateProbabilities(id, _)
                | ExchangeCall::UpdateResults(id)
                | ExchangeCall::Progress(id, _, _)
                | ExchangeCall::Reverse(id)
                | ExchangeCall::Abandon(id)
                | ExchangeCall::SportEventStatus(id) => id == external_id,
            })
            .collect()
    }

    pub fn event_status(&self, external_id: &str) -> Option<SportEventStatus> {
        self.lock().events.get(external_id).copied()
    }

    fn check(&self, inner: &Inner, operation: &'static str, id: &str) -> Result<(), ExchangeError> {
        if inner.failing.contains(operation) {
            return Err(ExchangeError::Status {
                url: format!("scripted://{operation}/{id}"),
                status: 500,
                body: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(operation: &str, id: &str) -> ExchangeError {
        ExchangeError::Status {
            url: format!("scripted://{operation}/{id}"),
            status: 404,
            body: "not found".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ExchangeApi for ScriptedExchange {
    async fn create_pool(
        &self,
        payload: &PoolCreatePayload,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::CreatePool(payload.ext_id.clone()));
        self.check(&inner, "create_pool", &payload.ext_id)?;
        inner.pools.insert(
            payload.ext_id.clone(),
            PoolStatusResponse {
                status: Some(ExchangePoolStatus::Created),
                settlement_status: None,
                settled_at: None,
            },
        );
        Ok(GenericResponse::default())
    }

    async fn toggle_pool_visibility(
        &self,
        external_id: &str,
        visible: bool,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::ToggleVisibility(external_id.to_string(), visible));
        self.check(&inner, "toggle_pool_visibility", external_id)?;
        if !inner.pools.contains_key(external_id) {
            return Err(Self::not_found("toggle_pool_visibility", external_id));
        }
        Ok(GenericResponse::default())
    }

    async fn toggle_pool_trading(
        &self,
        external_id: &str,
        trading: bool,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::ToggleTrading(external_id.to_string(), trading));
        self.check(&inner, "toggle_pool_trading", external_id)?;
        let Some(pool) = inner.pools.get_mut(external_id) else {
            return Err(Self::not_found("toggle_pool_trading", external_id));
        };
        if trading {
            pool.status = Some(ExchangePoolStatus::Open);
        }
        Ok(GenericResponse::default())
    }

    async fn settle_pool(&self, external_id: &str) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::SettlePool(external_id.to_string()));
        self.check(&inner, "settle_pool", external_id)?;
        let Some(pool) = inner.pools.get_mut(external_id) else {
            return Err(Self::not_found("settle_pool", external_id));
        };
        pool.settled_at = Some(Utc::now());
        pool.settlement_status = Some("settled".to_string());
        Ok(GenericResponse::default())
    }

    async fn pool_status(&self, external_id: &str) -> Result<PoolStatusResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::PoolStatus(external_id.to_string()));
        self.check(&inner, "pool_status", external_id)?;
        inner
            .pools
            .get(external_id)
            .cloned()
            .ok_or_else(|| Self::not_found("pool_status", external_id))
    }

    async fn create_sport_event(
        &self,
        payload: &SportEventPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::CreateSportEvent(payload.ext_id.clone()));
        self.check(&inner, "create_sport_event", &payload.ext_id)?;
        inner
            .events
            .insert(payload.ext_id.clone(), SportEventStatus::NotStarted);
        Ok(GenericResponse::default())
    }

    async fn update_event_probabilities(
        &self,
        external_id: &str,
        payload: &EventProbabilitiesPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner.calls.push(ExchangeCall::UpdateProbabilities(
            external_id.to_string(),
            payload.markets.len(),
        ));
        self.check(&inner, "update_event_probabilities", external_id)?;
        if !inner.events.contains_key(external_id) {
            return Err(Self::not_found("update_event_probabilities", external_id));
        }
        Ok(GenericResponse::default())
    }

    async fn update_event_results(
        &self,
        external_id: &str,
        _payload: &EventResultsPayload,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::UpdateResults(external_id.to_string()));
        self.check(&inner, "update_event_results", external_id)?;
        if !inner.events.contains_key(external_id) {
            return Err(Self::not_found("update_event_results", external_id));
        }
        Ok(GenericResponse::default())
    }

    async fn progress_sport_event(
        &self,
        external_id: &str,
        from: SportEventStatus,
        to: SportEventStatus,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner.calls.push(ExchangeCall::Progress(
            external_id.to_string(),
            from,
            to,
        ));
        self.check(&inner, "progress_sport_event", external_id)?;
        let Some(status) = inner.events.get_mut(external_id) else {
            return Err(Self::not_found("progress_sport_event", external_id));
        };
        *status = to;
        Ok(GenericResponse::default())
    }

    async fn reverse_sport_event(
        &self,
        external_id: &str,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::Reverse(external_id.to_string()));
        self.check(&inner, "reverse_sport_event", external_id)?;
        let Some(status) = inner.events.get_mut(external_id) else {
            return Err(Self::not_found("reverse_sport_event", external_id));
        };
        *status = match *status {
            SportEventStatus::InPlay => SportEventStatus::NotStarted,
            SportEventStatus::Completed => SportEventStatus::InPlay,
            SportEventStatus::Official => SportEventStatus::Completed,
            other => other,
        };
        Ok(GenericResponse::default())
    }

    async fn abandon_sport_event(
        &self,
        external_id: &str,
    ) -> Result<GenericResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::Abandon(external_id.to_string()));
        self.check(&inner, "abandon_sport_event", external_id)?;
        let Some(status) = inner.events.get_mut(external_id) else {
            return Err(Self::not_found("abandon_sport_event", external_id));
        };
        *status = SportEventStatus::Abandoned;
        Ok(GenericResponse::default())
    }

    async fn sport_event_status(
        &self,
        external_id: &str,
    ) -> Result<SportEventStatusResponse, ExchangeError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(ExchangeCall::SportEventStatus(external_id.to_string()));
        self.check(&inner, "sport_event_status", external_id)?;
        match inner.events.get(external_id) {
            Some(status) => Ok(SportEventStatusResponse {
                status: Some(*status),
                period: None,
            }),
            None => Err(Self::not_found("sport_event_status", external_id)),
        }
    }
}
