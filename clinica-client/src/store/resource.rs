//! Client-side list state for one entity type.
//!
//! List-replacing calls (`fetch_all`, `search`) take a ticket when issued and
//! only the most recently issued one may replace the list. Once `close` is
//! called nothing that completes afterwards touches the state.

use clinica_core::Entity;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{ApiError, StoreError};
use crate::services::{ResourceService, Searchable, StatusService};

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<T>,
}

#[derive(Debug)]
struct State<T> {
    items: Vec<T>,
    in_flight: usize,
    error: Option<String>,
    selected: Option<T>,
    last_ticket: u64,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            in_flight: 0,
            error: None,
            selected: None,
            last_ticket: 0,
        }
    }
}

impl<T: Entity> State<T> {
    fn upsert(&mut self, entity: &T) {
        match self.items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(slot) => *slot = entity.clone(),
            None => self.items.push(entity.clone()),
        }
    }

    fn replace(&mut self, id: &str, entity: &T) {
        if let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) {
            *slot = entity.clone();
        }
        if self.selected.as_ref().is_some_and(|s| s.id() == id) {
            self.selected = Some(entity.clone());
        }
    }

    fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id() != id);
        if self.selected.as_ref().is_some_and(|s| s.id() == id) {
            self.selected = None;
        }
    }
}

pub struct ResourceStore<S: ResourceService> {
    service: Arc<S>,
    paciente_id: Option<String>,
    state: Mutex<State<S::Entity>>,
    closed: AtomicBool,
}

impl<S: ResourceService> ResourceStore<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            paciente_id: None,
            state: Mutex::new(State::default()),
            closed: AtomicBool::new(false),
        }
    }

    /// A store whose list holds only one patient's entities.
    pub fn for_patient(service: Arc<S>, paciente_id: impl Into<String>) -> Self {
        Self {
            paciente_id: Some(paciente_id.into()),
            ..Self::new(service)
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn paciente_id(&self) -> Option<&str> {
        self.paciente_id.as_deref()
    }

    pub async fn snapshot(&self) -> StoreSnapshot<S::Entity> {
        let state = self.state.lock().await;
        StoreSnapshot {
            items: state.items.clone(),
            loading: state.in_flight > 0,
            error: state.error.clone(),
            selected: state.selected.clone(),
        }
    }

    pub async fn items(&self) -> Vec<S::Entity> {
        self.state.lock().await.items.clone()
    }

    pub async fn find(&self, id: &str) -> Option<S::Entity> {
        self.state.lock().await.items.iter().find(|item| item.id() == id).cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.in_flight > 0
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn selected(&self) -> Option<S::Entity> {
        self.state.lock().await.selected.clone()
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.error = None;
    }

    /// Detach the store; late results are dropped.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(paciente_id = ?self.paciente_id, "Store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn begin(&self) {
        let mut state = self.state.lock().await;
        state.in_flight += 1;
        state.error = None;
    }

    async fn begin_list(&self) -> u64 {
        let mut state = self.state.lock().await;
        state.in_flight += 1;
        state.error = None;
        state.last_ticket += 1;
        state.last_ticket
    }

    async fn finish<R>(
        &self,
        result: Result<R, ApiError>,
        message: &'static str,
        apply: impl FnOnce(&mut State<S::Entity>, &R),
    ) -> Result<R, StoreError> {
        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        let closed = self.is_closed();

        match result {
            Ok(value) => {
                if !closed {
                    apply(&mut *state, &value);
                }
                Ok(value)
            }
            Err(source) => {
                tracing::warn!(message, error = %source, "Store operation failed");
                if !closed {
                    state.error = Some(message.to_string());
                }
                Err(StoreError::new(message, source))
            }
        }
    }

    async fn finish_list(
        &self,
        ticket: u64,
        result: Result<Vec<S::Entity>, ApiError>,
        message: &'static str,
    ) -> Result<Vec<S::Entity>, StoreError> {
        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        let current = ticket == state.last_ticket && !self.is_closed();
        if !current {
            tracing::debug!(ticket, latest = state.last_ticket, "Discarding superseded list result");
        }

        match result {
            Ok(items) => {
                if current {
                    state.items = items.clone();
                }
                Ok(items)
            }
            Err(source) => {
                tracing::warn!(message, error = %source, "Store list operation failed");
                if current {
                    state.error = Some(message.to_string());
                }
                Err(StoreError::new(message, source))
            }
        }
    }

    /// Reload the whole list (or the patient's list when scoped).
    pub async fn fetch_all(&self) -> Result<Vec<S::Entity>, StoreError> {
        let ticket = self.begin_list().await;
        let result = match &self.paciente_id {
            Some(paciente_id) => self.service.list_by_patient(paciente_id).await,
            None => self.service.list().await,
        };
        self.finish_list(ticket, result, S::MESSAGES.cargar_lista).await
    }

    pub async fn get(&self, id: &str) -> Result<S::Entity, StoreError> {
        self.begin().await;
        let result = self.service.get(id).await;
        self.finish(result, S::MESSAGES.cargar_uno, |_, _| {}).await
    }

    /// Fetch one entity into the selection mirror.
    pub async fn select(&self, id: &str) -> Result<S::Entity, StoreError> {
        self.begin().await;
        let result = self.service.get(id).await;
        self.finish(result, S::MESSAGES.cargar_uno, |state, entity| {
            state.selected = Some(entity.clone());
        })
        .await
    }

    pub async fn create(&self, draft: &S::Draft) -> Result<S::Entity, StoreError> {
        self.begin().await;
        let result = self.service.create(draft).await.and_then(|entity| {
            if entity.id().is_empty() {
                Err(ApiError::MissingId)
            } else {
                Ok(entity)
            }
        });
        self.finish(result, S::MESSAGES.crear, |state, entity| state.upsert(entity))
            .await
    }

    pub async fn update(&self, id: &str, draft: &S::Draft) -> Result<S::Entity, StoreError> {
        self.begin().await;
        let result = self.service.update(id, draft).await;
        self.finish(result, S::MESSAGES.actualizar, |state, entity| state.replace(id, entity))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.begin().await;
        let result = self.service.delete(id).await;
        self.finish(result, S::MESSAGES.eliminar, |state, _| state.remove(id))
            .await
    }
}

impl<S: Searchable> ResourceStore<S> {
    /// Replace the list with matches; a blank query reloads everything.
    pub async fn search(&self, query: &str) -> Result<Vec<S::Entity>, StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return self.fetch_all().await;
        }
        let ticket = self.begin_list().await;
        let result = self.service.search(query).await;
        self.finish_list(ticket, result, S::MESSAGES.buscar).await
    }
}

impl<S: StatusService> ResourceStore<S> {
    pub async fn update_status(&self, id: &str, estado: S::Estado) -> Result<S::Entity, StoreError> {
        self.begin().await;
        let result = self.service.update_status(id, estado).await;
        self.finish(result, S::MESSAGES.actualizar_estado, |state, entity| {
            state.replace(id, entity)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::http::Service;
    use crate::services::Messages;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Nota {
        id: String,
        texto: String,
    }

    impl Entity for Nota {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn nota(id: &str, texto: &str) -> Nota {
        Nota {
            id: id.to_string(),
            texto: texto.to_string(),
        }
    }

    #[derive(Default)]
    struct FakeNotas {
        items: std::sync::Mutex<Vec<Nota>>,
        gates: std::sync::Mutex<VecDeque<oneshot::Receiver<()>>>,
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl FakeNotas {
        fn with(items: Vec<Nota>) -> Arc<Self> {
            let fake = Self::default();
            *fake.items.lock().unwrap() = items;
            Arc::new(fake)
        }

        fn check(&self) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                Err(ApiError::Request("boom".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ResourceService for FakeNotas {
        type Entity = Nota;
        type Draft = Nota;

        const MESSAGES: Messages = Messages {
            cargar_lista: "Error al cargar las notas",
            cargar_uno: "Error al cargar la nota",
            crear: "Error al crear la nota",
            actualizar: "Error al actualizar la nota",
            eliminar: "Error al eliminar la nota",
            buscar: "Error al buscar notas",
            actualizar_estado: "Error al actualizar la nota",
        };

        async fn list(&self) -> Result<Vec<Nota>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let gate = self.gates.lock().unwrap().pop_front();
            if let Some(gate) = gate {
                let _ = gate.await;
                return Ok(vec![nota(&format!("call-{call}"), "")]);
            }
            self.check()?;
            Ok(self.items.lock().unwrap().clone())
        }

        async fn get(&self, id: &str) -> Result<Nota> {
            self.check()?;
            self.items
                .lock()
                .unwrap()
                .iter()
                .find(|n| n.id == id)
                .cloned()
                .ok_or(ApiError::Status {
                    service: Service::Pacientes,
                    status: 404,
                    message: "Not Found".into(),
                    body: None,
                })
        }

        async fn create(&self, draft: &Nota) -> Result<Nota> {
            self.check()?;
            self.items.lock().unwrap().push(draft.clone());
            Ok(draft.clone())
        }

        async fn update(&self, _id: &str, draft: &Nota) -> Result<Nota> {
            self.check()?;
            Ok(draft.clone())
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            self.check()
        }

        fn unsupported(&self, operation: &'static str) -> ApiError {
            ApiError::Unsupported {
                service: Service::Pacientes,
                operation,
            }
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let store = ResourceStore::new(FakeNotas::with(vec![nota("1", "a"), nota("2", "b")]));
        store.fetch_all().await.unwrap();

        store.create(&nota("3", "c")).await.unwrap();
        store.create(&nota("3", "c2")).await.unwrap();
        let items = store.items().await;
        assert_eq!(items.iter().filter(|n| n.id == "3").count(), 1);
        assert_eq!(store.find("3").await.unwrap().texto, "c2");

        store.update("1", &nota("1", "a2")).await.unwrap();
        let items = store.items().await;
        assert_eq!(items[0], nota("1", "a2"));
        assert_eq!(items[1], nota("2", "b"));

        store.delete("2").await.unwrap();
        assert!(store.find("2").await.is_none());
        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn test_create_without_id_is_an_error() {
        let store = ResourceStore::new(FakeNotas::with(vec![]));
        let err = store.create(&nota("", "x")).await.unwrap_err();
        assert!(matches!(err.source, ApiError::MissingId));
        assert!(store.items().await.is_empty());
        assert_eq!(store.error().await.as_deref(), Some("Error al crear la nota"));
    }

    #[tokio::test]
    async fn test_failure_sets_message_and_clears_loading() {
        let service = FakeNotas::with(vec![nota("1", "a")]);
        let store = ResourceStore::new(service.clone());
        store.fetch_all().await.unwrap();

        service.fail.store(true, Ordering::SeqCst);
        let err = store.fetch_all().await.unwrap_err();
        assert_eq!(err.message, "Error al cargar las notas");

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.error.as_deref(), Some("Error al cargar las notas"));
        assert!(!snapshot.loading);
        assert_eq!(snapshot.items, vec![nota("1", "a")]);

        service.fail.store(false, Ordering::SeqCst);
        store.fetch_all().await.unwrap();
        assert!(store.error().await.is_none());
    }

    #[tokio::test]
    async fn test_select_mirror_follows_update_and_delete() {
        let store = ResourceStore::new(FakeNotas::with(vec![nota("1", "a")]));
        store.fetch_all().await.unwrap();
        store.select("1").await.unwrap();

        store.update("1", &nota("1", "b")).await.unwrap();
        assert_eq!(store.selected().await, Some(nota("1", "b")));

        store.delete("1").await.unwrap();
        assert!(store.selected().await.is_none());
    }

    #[tokio::test]
    async fn test_last_issued_list_wins() {
        let service = FakeNotas::with(vec![]);
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        service.gates.lock().unwrap().extend([rx1, rx2]);

        let store = ResourceStore::new(service);
        let release = async {
            tokio::task::yield_now().await;
            let _ = tx2.send(());
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            let _ = tx1.send(());
        };

        let (first, second, _) = tokio::join!(store.fetch_all(), store.fetch_all(), release);
        assert_eq!(first.unwrap()[0].id, "call-1");
        assert_eq!(second.unwrap()[0].id, "call-2");

        assert_eq!(store.items().await, vec![nota("call-2", "")]);
        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn test_closed_store_ignores_late_results() {
        let service = FakeNotas::with(vec![]);
        let (tx, rx) = oneshot::channel();
        service.gates.lock().unwrap().push_back(rx);

        let store = ResourceStore::new(service);
        let unmount = async {
            tokio::task::yield_now().await;
            store.close();
            let _ = tx.send(());
        };

        let (result, _) = tokio::join!(store.fetch_all(), unmount);
        assert!(result.is_ok());
        assert!(store.items().await.is_empty());
        assert!(store.is_closed());
    }
}
