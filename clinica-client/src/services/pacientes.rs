use async_trait::async_trait;
use clinica_core::{ContactoFormData, ContactoInfo, Paciente, PacienteFormData};

use super::{Collection, Messages, ResourceService, Searchable};
use crate::error::{ApiError, Result};
use crate::http::{segment, HttpClient};

#[derive(Debug, Clone)]
pub struct PacientesService {
    pacientes: Collection,
}

impl PacientesService {
    pub fn new(client: HttpClient) -> Self {
        Self {
            pacientes: Collection::new(client, "pacientes"),
        }
    }

    /// Contact details of a patient; `None` when the backend has none (404).
    pub async fn get_contacto(&self, paciente_id: &str) -> Result<Option<ContactoInfo>> {
        let path = format!("/pacientes/{}/contacto", segment(paciente_id));
        match self.pacientes.client().get(&path).await {
            Ok(contacto) => Ok(Some(contacto)),
            Err(e) if e.is_not_found() => {
                tracing::debug!(paciente_id, "Patient has no contact information");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(paciente_id, error = %e, "Error fetching contact info");
                Err(e)
            }
        }
    }

    pub async fn save_contacto(&self, paciente_id: &str, data: &ContactoFormData) -> Result<ContactoInfo> {
        let path = format!("/pacientes/{}/contacto", segment(paciente_id));
        self.pacientes
            .client()
            .post(&path, data)
            .await
            .inspect_err(|e| tracing::error!(paciente_id, error = %e, "Error updating contact info"))
    }
}

#[async_trait]
impl ResourceService for PacientesService {
    type Entity = Paciente;
    type Draft = PacienteFormData;

    const MESSAGES: Messages = Messages {
        cargar_lista: "Error al cargar los pacientes",
        cargar_uno: "Error al cargar el paciente",
        crear: "Error al crear el paciente",
        actualizar: "Error al actualizar el paciente",
        eliminar: "Error al eliminar el paciente",
        buscar: "Error al buscar pacientes",
        actualizar_estado: "Error al actualizar el paciente",
    };

    async fn list(&self) -> Result<Vec<Paciente>> {
        self.pacientes.list().await
    }

    async fn get(&self, id: &str) -> Result<Paciente> {
        self.pacientes.get(id).await
    }

    async fn create(&self, draft: &PacienteFormData) -> Result<Paciente> {
        self.pacientes.create(draft).await
    }

    async fn update(&self, id: &str, draft: &PacienteFormData) -> Result<Paciente> {
        self.pacientes.update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.pacientes.delete(id).await
    }

    fn unsupported(&self, operation: &'static str) -> ApiError {
        self.pacientes.unsupported(operation)
    }
}

#[async_trait]
impl Searchable for PacientesService {
    async fn search(&self, query: &str) -> Result<Vec<Paciente>> {
        self.pacientes
            .client()
            .get_with_query("/pacientes/search", &[("q", query)])
            .await
            .inspect_err(|e| tracing::error!(query, error = %e, "Error searching patients"))
    }
}
