use async_trait::async_trait;
use clinica_core::{Consulta, ConsultaFormData, EstadoConsulta};

use super::{Collection, Messages, ResourceService, StatusService};
use crate::error::{ApiError, Result};
use crate::http::HttpClient;

/// Consultations, served by the consultas backend.
#[derive(Debug, Clone)]
pub struct ConsultasService {
    consultas: Collection,
}

impl ConsultasService {
    pub fn new(client: HttpClient) -> Self {
        Self {
            consultas: Collection::new(client, "consultas"),
        }
    }
}

#[async_trait]
impl ResourceService for ConsultasService {
    type Entity = Consulta;
    type Draft = ConsultaFormData;

    const MESSAGES: Messages = Messages {
        cargar_lista: "Error al cargar las consultas",
        cargar_uno: "Error al cargar la consulta",
        crear: "Error al crear la consulta",
        actualizar: "Error al actualizar la consulta",
        eliminar: "Error al eliminar la consulta",
        buscar: "Error al buscar consultas",
        actualizar_estado: "Error al actualizar el estado de la consulta",
    };

    async fn list(&self) -> Result<Vec<Consulta>> {
        self.consultas.list().await
    }

    async fn get(&self, id: &str) -> Result<Consulta> {
        self.consultas.get(id).await
    }

    async fn create(&self, draft: &ConsultaFormData) -> Result<Consulta> {
        self.consultas.create(draft).await
    }

    async fn update(&self, id: &str, draft: &ConsultaFormData) -> Result<Consulta> {
        self.consultas.update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.consultas.delete(id).await
    }

    async fn list_by_patient(&self, paciente_id: &str) -> Result<Vec<Consulta>> {
        self.consultas.list_by_patient(paciente_id).await
    }

    fn unsupported(&self, operation: &'static str) -> ApiError {
        self.consultas.unsupported(operation)
    }
}

#[async_trait]
impl StatusService for ConsultasService {
    type Estado = EstadoConsulta;

    async fn update_status(&self, id: &str, estado: EstadoConsulta) -> Result<Consulta> {
        self.consultas.update_status(id, estado).await
    }
}
