use async_trait::async_trait;
use clinica_core::{EstadoExamen, Examen, ExamenFormData};

use super::{Collection, Messages, ResourceService, StatusService};
use crate::error::{ApiError, Result};
use crate::http::HttpClient;

/// Lab exams, served by the orchestrator.
#[derive(Debug, Clone)]
pub struct ExamenesService {
    examenes: Collection,
}

impl ExamenesService {
    pub fn new(client: HttpClient) -> Self {
        Self {
            examenes: Collection::new(client, "examenes"),
        }
    }
}

#[async_trait]
impl ResourceService for ExamenesService {
    type Entity = Examen;
    type Draft = ExamenFormData;

    const MESSAGES: Messages = Messages {
        cargar_lista: "Error al cargar los exámenes",
        cargar_uno: "Error al cargar el examen",
        crear: "Error al crear el examen",
        actualizar: "Error al actualizar el examen",
        eliminar: "Error al eliminar el examen",
        buscar: "Error al buscar exámenes",
        actualizar_estado: "Error al actualizar el estado del examen",
    };

    async fn list(&self) -> Result<Vec<Examen>> {
        self.examenes.list().await
    }

    async fn get(&self, id: &str) -> Result<Examen> {
        self.examenes.get(id).await
    }

    async fn create(&self, draft: &ExamenFormData) -> Result<Examen> {
        self.examenes.create(draft).await
    }

    async fn update(&self, id: &str, draft: &ExamenFormData) -> Result<Examen> {
        self.examenes.update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.examenes.delete(id).await
    }

    async fn list_by_patient(&self, paciente_id: &str) -> Result<Vec<Examen>> {
        self.examenes.list_by_patient(paciente_id).await
    }

    fn unsupported(&self, operation: &'static str) -> ApiError {
        self.examenes.unsupported(operation)
    }
}

#[async_trait]
impl StatusService for ExamenesService {
    type Estado = EstadoExamen;

    async fn update_status(&self, id: &str, estado: EstadoExamen) -> Result<Examen> {
        self.examenes.update_status(id, estado).await
    }
}
