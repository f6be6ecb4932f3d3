//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::catalog::CatalogService;
use crate::ledger::LedgerService;
use crate::services::KpiService;
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub auth_service: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub ledger: Arc<LedgerService>,
    pub kpi: Arc<KpiService>,
}

impl AppState {
    /// Wire all services over a shared store
    pub fn new(store: Arc<Store>, jwt_secret: String, access_token_ttl_seconds: i64) -> Self {
        let auth_service = Arc::new(AuthService::new(
            store.clone(),
            jwt_secret,
            access_token_ttl_seconds,
        ));
        let catalog = Arc::new(CatalogService::new(store.clone()));
        let ledger = Arc::new(LedgerService::new(store.clone()));
        let kpi = Arc::new(KpiService::new(store.clone()));

        Self {
            store,
            auth_service,
            catalog,
            ledger,
            kpi,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<CatalogService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.catalog.clone()
    }
}

impl FromRef<AppState> for Arc<LedgerService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ledger.clone()
    }
}

impl FromRef<AppState> for Arc<KpiService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.kpi.clone()
    }
}
