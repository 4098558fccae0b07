use async_trait::async_trait;
use clinica_core::{Expediente, ExpedienteFormData};

use super::{Collection, Messages, ResourceService};
use crate::error::{ApiError, Result};
use crate::http::HttpClient;

/// Medical record entries, served by the orchestrator.
#[derive(Debug, Clone)]
pub struct ExpedientesService {
    expedientes: Collection,
}

impl ExpedientesService {
    pub fn new(client: HttpClient) -> Self {
        Self {
            expedientes: Collection::new(client, "expedientes"),
        }
    }
}

#[async_trait]
impl ResourceService for ExpedientesService {
    type Entity = Expediente;
    type Draft = ExpedienteFormData;

    const MESSAGES: Messages = Messages {
        cargar_lista: "Error al cargar los expedientes",
        cargar_uno: "Error al cargar el expediente",
        crear: "Error al crear el expediente",
        actualizar: "Error al actualizar el expediente",
        eliminar: "Error al eliminar el expediente",
        buscar: "Error al buscar expedientes",
        actualizar_estado: "Error al actualizar el expediente",
    };

    async fn list(&self) -> Result<Vec<Expediente>> {
        self.expedientes.list().await
    }

    async fn get(&self, id: &str) -> Result<Expediente> {
        self.expedientes.get(id).await
    }

    async fn create(&self, draft: &ExpedienteFormData) -> Result<Expediente> {
        self.expedientes.create(draft).await
    }

    async fn update(&self, id: &str, draft: &ExpedienteFormData) -> Result<Expediente> {
        self.expedientes.update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.expedientes.delete(id).await
    }

    async fn list_by_patient(&self, paciente_id: &str) -> Result<Vec<Expediente>> {
        self.expedientes.list_by_patient(paciente_id).await
    }

    fn unsupported(&self, operation: &'static str) -> ApiError {
        self.expedientes.unsupported(operation)
    }
}
