//! Application wiring: configuration in, services and stores out.

use clinica_core::{AuthGate, GateDecision, Route};
use std::sync::Arc;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::error::{ApiError, TokenError};
use crate::http::{ConnectionReport, HttpClient, Service};
use crate::screen::ListScreen;
use crate::services::{
    AuthService, ConsultasService, ExamenesService, ExpedientesService, OrquestadorService,
    PacientesService,
};
use crate::session::AuthSession;
use crate::store::{ContactoStore, OrquestadorStore, ResourceStore};
use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token store error: {0}")]
    Token(#[from] TokenError),

    #[error("Client setup error: {0}")]
    Api(#[from] ApiError),
}

pub struct App {
    config: ClientConfig,
    gate: AuthGate,
    tokens: Arc<dyn TokenStore>,
    pacientes_client: HttpClient,
    pacientes: Arc<PacientesService>,
    consultas: Arc<ConsultasService>,
    examenes: Arc<ExamenesService>,
    expedientes: Arc<ExpedientesService>,
    orquestador: Arc<OrquestadorService>,
    session: Arc<AuthSession>,
}

impl App {
    /// Build with the token store named by the configuration.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenStore> = match &config.auth.token_file {
            Some(path) => Arc::new(FileTokenStore::open(path)?),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_tokens(config, tokens)
    }

    pub fn with_tokens(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, AppError> {
        let mode = config.auth.mode;
        let client = |service: Service| {
            let settings = match service {
                Service::Pacientes => &config.services.pacientes,
                Service::Consultas => &config.services.consultas,
                Service::Orquestador => &config.services.orquestador,
            };
            HttpClient::new(service, settings, &config.http, mode, tokens.clone())
        };

        let pacientes_client = client(Service::Pacientes)?;
        let consultas_client = client(Service::Consultas)?;
        let orquestador_client = client(Service::Orquestador)?;

        let auth = Arc::new(AuthService::new(pacientes_client.clone()));
        let session = Arc::new(AuthSession::new(auth, mode));

        tracing::info!(
            pacientes = %pacientes_client.base_url(),
            consultas = %consultas_client.base_url(),
            orquestador = %orquestador_client.base_url(),
            auth_mode = %mode,
            "Client configured"
        );

        Ok(Self {
            gate: AuthGate::new(mode),
            tokens,
            pacientes: Arc::new(PacientesService::new(pacientes_client.clone())),
            consultas: Arc::new(ConsultasService::new(consultas_client)),
            examenes: Arc::new(ExamenesService::new(orquestador_client.clone())),
            expedientes: Arc::new(ExpedientesService::new(orquestador_client.clone())),
            orquestador: Arc::new(OrquestadorService::new(orquestador_client)),
            pacientes_client,
            session,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    pub fn pacientes(&self) -> &Arc<PacientesService> {
        &self.pacientes
    }

    pub fn consultas(&self) -> &Arc<ConsultasService> {
        &self.consultas
    }

    pub fn examenes(&self) -> &Arc<ExamenesService> {
        &self.examenes
    }

    pub fn expedientes(&self) -> &Arc<ExpedientesService> {
        &self.expedientes
    }

    pub fn orquestador(&self) -> &Arc<OrquestadorService> {
        &self.orquestador
    }

    /// Guard decision for `route` given the current session.
    pub async fn guard(&self, route: &Route, required_roles: &[&str]) -> GateDecision {
        let view = self.session.view().await;
        self.gate.check(route, &view, required_roles)
    }

    /// Guard decision for a location as the user typed it.
    pub async fn guard_path(&self, requested: &str, required_roles: &[&str]) -> GateDecision {
        let view = self.session.view().await;
        self.gate.check_path(requested, &view, required_roles)
    }

    pub async fn check_connection(&self) -> ConnectionReport {
        self.pacientes_client.check_connection().await
    }

    pub fn pacientes_store(&self) -> Arc<ResourceStore<PacientesService>> {
        Arc::new(ResourceStore::new(self.pacientes.clone()))
    }

    pub fn consultas_store(&self, paciente_id: Option<&str>) -> Arc<ResourceStore<ConsultasService>> {
        Arc::new(scoped(self.consultas.clone(), paciente_id))
    }

    pub fn examenes_store(&self, paciente_id: Option<&str>) -> Arc<ResourceStore<ExamenesService>> {
        Arc::new(scoped(self.examenes.clone(), paciente_id))
    }

    pub fn expedientes_store(&self, paciente_id: Option<&str>) -> Arc<ResourceStore<ExpedientesService>> {
        Arc::new(scoped(self.expedientes.clone(), paciente_id))
    }

    pub fn contacto_store(&self, paciente_id: &str) -> ContactoStore {
        ContactoStore::new(self.pacientes.clone(), paciente_id)
    }

    pub fn orquestador_store(&self) -> OrquestadorStore {
        OrquestadorStore::new(self.orquestador.clone())
    }

    pub fn pacientes_screen(&self) -> ListScreen<PacientesService> {
        ListScreen::new(self.pacientes_store())
    }

    pub fn consultas_screen(&self) -> ListScreen<ConsultasService> {
        ListScreen::new(self.consultas_store(None))
    }

    pub fn examenes_screen(&self) -> ListScreen<ExamenesService> {
        ListScreen::new(self.examenes_store(None))
    }

    pub fn historias_screen(&self) -> ListScreen<ExpedientesService> {
        ListScreen::new(self.expedientes_store(None))
    }
}

fn scoped<S: crate::services::ResourceService>(
    service: Arc<S>,
    paciente_id: Option<&str>,
) -> ResourceStore<S> {
    match paciente_id {
        Some(id) => ResourceStore::for_patient(service, id),
        None => ResourceStore::new(service),
    }
}
