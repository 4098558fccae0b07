use clinica_core::model::{BusquedaGlobal, DashboardData, EstadoSistema, PacienteCompleto};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::error::{ApiError, StoreError};
use crate::services::OrquestadorService;

pub const MSG_DASHBOARD: &str = "Error al cargar los datos del dashboard";
pub const MSG_PACIENTE_COMPLETO: &str = "Error al cargar los datos completos del paciente";
pub const MSG_BUSQUEDA_GLOBAL: &str = "Error al realizar la búsqueda global";
pub const MSG_ESTADO_SISTEMA: &str = "Error al verificar el estado del sistema";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrquestadorState {
    pub dashboard: Option<DashboardData>,
    pub in_flight: usize,
    pub error: Option<String>,
}

impl OrquestadorState {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Dashboard and cross-entity lookups.
///
/// Only the most recently issued dashboard fetch may replace the dashboard.
/// After `close` no result touches the state.
pub struct OrquestadorStore {
    service: Arc<OrquestadorService>,
    state: Mutex<OrquestadorState>,
    dashboard_ticket: AtomicU64,
    closed: AtomicBool,
}

impl OrquestadorStore {
    pub fn new(service: Arc<OrquestadorService>) -> Self {
        Self {
            service,
            state: Mutex::new(OrquestadorState::default()),
            dashboard_ticket: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Orchestrator store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> OrquestadorState {
        self.state.lock().await.clone()
    }

    async fn begin(&self) {
        let mut state = self.state.lock().await;
        state.in_flight += 1;
        state.error = None;
    }

    async fn finish<T>(&self, result: Result<T, ApiError>, message: &'static str) -> Result<T, StoreError> {
        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        let closed = self.is_closed();
        result.map_err(|source| {
            tracing::warn!(message, error = %source, "Orchestrator request failed");
            if !closed {
                state.error = Some(message.to_string());
            }
            StoreError::new(message, source)
        })
    }

    pub async fn fetch_dashboard(&self) -> Result<DashboardData, StoreError> {
        let ticket = self.dashboard_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.begin().await;
        let result = self.service.dashboard().await.map(|r| r.data);
        let dashboard = self.finish(result, MSG_DASHBOARD).await?;

        let mut state = self.state.lock().await;
        let latest = self.dashboard_ticket.load(Ordering::SeqCst);
        if ticket == latest && !self.is_closed() {
            state.dashboard = Some(dashboard.clone());
        } else {
            tracing::debug!(ticket, latest, "Discarding stale dashboard");
        }
        Ok(dashboard)
    }

    pub async fn paciente_completo(&self, paciente_id: &str) -> Result<PacienteCompleto, StoreError> {
        self.begin().await;
        let result = self.service.paciente_completo(paciente_id).await.map(|r| r.data);
        self.finish(result, MSG_PACIENTE_COMPLETO).await
    }

    pub async fn buscar(&self, query: &str) -> Result<BusquedaGlobal, StoreError> {
        self.begin().await;
        let result = self.service.buscar(query).await.map(|r| r.data);
        self.finish(result, MSG_BUSQUEDA_GLOBAL).await
    }

    pub async fn estado_sistema(&self) -> Result<EstadoSistema, StoreError> {
        self.begin().await;
        let result = self.service.estado_sistema().await.map(|r| r.data);
        self.finish(result, MSG_ESTADO_SISTEMA).await
    }
}
