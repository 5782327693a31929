use std::sync::Arc;

use axum::extract::FromRef;
use storage::Database;

use crate::features::shop::gateway::PaymentGateway;
use crate::middleware::auth::ApiKeys;
use crate::realtime::RealtimeHub;

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl_hours: i64,
}

impl SessionSettings {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub hub: RealtimeHub,
    pub api_keys: ApiKeys,
    pub sessions: SessionSettings,
    pub payments: Arc<dyn PaymentGateway>,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for RealtimeHub {
    fn from_ref(state: &AppState) -> Self {
        state.hub.clone()
    }
}

impl FromRef<AppState> for ApiKeys {
    fn from_ref(state: &AppState) -> Self {
        state.api_keys.clone()
    }
}

impl FromRef<AppState> for SessionSettings {
    fn from_ref(state: &AppState) -> Self {
        state.sessions
    }
}

impl FromRef<AppState> for Arc<dyn PaymentGateway> {
    fn from_ref(state: &AppState) -> Self {
        state.payments.clone()
    }
}
