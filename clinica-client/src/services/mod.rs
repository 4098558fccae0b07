//! Typed wrappers over each backend collection.
//!
//! Services are thin: build the path, send, decode. Failures are logged at
//! this boundary and returned unchanged.

pub mod auth;
pub mod consultas;
pub mod examenes;
pub mod expedientes;
pub mod orquestador;
pub mod pacientes;

pub use auth::AuthService;
pub use consultas::ConsultasService;
pub use examenes::ExamenesService;
pub use expedientes::ExpedientesService;
pub use orquestador::OrquestadorService;
pub use pacientes::PacientesService;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::http::{segment, HttpClient};

/// User-facing messages recorded by a store when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub cargar_lista: &'static str,
    pub cargar_uno: &'static str,
    pub crear: &'static str,
    pub actualizar: &'static str,
    pub eliminar: &'static str,
    pub buscar: &'static str,
    pub actualizar_estado: &'static str,
}

#[async_trait]
pub trait ResourceService: Send + Sync + 'static {
    type Entity: clinica_core::Entity;
    type Draft: Serialize + Send + Sync;

    const MESSAGES: Messages;

    async fn list(&self) -> Result<Vec<Self::Entity>>;
    async fn get(&self, id: &str) -> Result<Self::Entity>;
    async fn create(&self, draft: &Self::Draft) -> Result<Self::Entity>;
    async fn update(&self, id: &str, draft: &Self::Draft) -> Result<Self::Entity>;
    async fn delete(&self, id: &str) -> Result<()>;

    /// Entities belonging to one patient; not every backend exposes this.
    async fn list_by_patient(&self, paciente_id: &str) -> Result<Vec<Self::Entity>> {
        let _ = paciente_id;
        Err(self.unsupported("list_by_patient"))
    }

    fn unsupported(&self, operation: &'static str) -> ApiError;
}

#[async_trait]
pub trait Searchable: ResourceService {
    async fn search(&self, query: &str) -> Result<Vec<Self::Entity>>;
}

#[async_trait]
pub trait StatusService: ResourceService {
    type Estado: Serialize + Copy + Send + Sync + std::fmt::Display;

    async fn update_status(&self, id: &str, estado: Self::Estado) -> Result<Self::Entity>;
}

#[derive(Serialize)]
struct EstadoBody<E> {
    estado: E,
}

/// One REST collection on one backend: `/{name}`, `/{name}/{id}` and
/// `/pacientes/{id}/{name}`.
#[derive(Debug, Clone)]
pub(crate) struct Collection {
    client: HttpClient,
    name: &'static str,
}

impl Collection {
    pub(crate) fn new(client: HttpClient, name: &'static str) -> Self {
        Self { client, name }
    }

    pub(crate) fn client(&self) -> &HttpClient {
        &self.client
    }

    fn root(&self) -> String {
        format!("/{}", self.name)
    }

    fn item(&self, id: &str) -> String {
        format!("/{}/{}", self.name, segment(id))
    }

    pub(crate) fn unsupported(&self, operation: &'static str) -> ApiError {
        ApiError::Unsupported {
            service: self.client.service(),
            operation,
        }
    }

    pub(crate) async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.client
            .get(&self.root())
            .await
            .inspect_err(|e| tracing::error!(collection = self.name, error = %e, "Error fetching list"))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.client
            .get(&self.item(id))
            .await
            .inspect_err(|e| tracing::error!(collection = self.name, id, error = %e, "Error fetching item"))
    }

    pub(crate) async fn create<T, B>(&self, draft: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.client
            .post(&self.root(), draft)
            .await
            .inspect_err(|e| tracing::error!(collection = self.name, error = %e, "Error creating item"))
    }

    pub(crate) async fn update<T, B>(&self, id: &str, draft: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.client
            .put(&self.item(id), draft)
            .await
            .inspect_err(|e| tracing::error!(collection = self.name, id, error = %e, "Error updating item"))
    }

    pub(crate) async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(&self.item(id))
            .await
            .inspect_err(|e| tracing::error!(collection = self.name, id, error = %e, "Error deleting item"))
    }

    pub(crate) async fn list_by_patient<T: DeserializeOwned>(&self, paciente_id: &str) -> Result<Vec<T>> {
        let path = format!("/pacientes/{}/{}", segment(paciente_id), self.name);
        self.client.get(&path).await.inspect_err(|e| {
            tracing::error!(collection = self.name, paciente_id, error = %e, "Error fetching patient items")
        })
    }

    pub(crate) async fn update_status<T, E>(&self, id: &str, estado: E) -> Result<T>
    where
        T: DeserializeOwned,
        E: Serialize + Send + Sync + std::fmt::Display,
    {
        let path = format!("{}/estado", self.item(id));
        let body = EstadoBody { estado };
        self.client.patch(&path, &body).await.inspect_err(|e| {
            tracing::error!(collection = self.name, id, estado = %body.estado, error = %e, "Error updating status")
        })
    }
}
