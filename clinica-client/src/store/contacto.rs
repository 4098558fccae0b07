use clinica_core::forms::ContactoForm;
use clinica_core::{ContactoInfo, FieldErrors, FormInput};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::services::PacientesService;

pub const MSG_CONTACTO_CARGAR: &str = "Error al cargar la información de contacto";
pub const MSG_CONTACTO_GUARDAR: &str = "Error al guardar la información de contacto";

/// What the contact panel of a patient shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactoView {
    Loading,
    /// The backend has no contact record for this patient.
    Missing,
    Loaded(ContactoInfo),
    Error(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ContactoSaveError {
    #[error("Invalid contact form: {0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
struct State {
    view: ContactoView,
    last_ticket: u64,
}

/// Contact panel state for one patient.
///
/// `load` and `save` both take a ticket; only the most recently issued call
/// may change the view, and nothing applies after `close`.
pub struct ContactoStore {
    service: Arc<PacientesService>,
    paciente_id: String,
    state: Mutex<State>,
    closed: AtomicBool,
}

impl ContactoStore {
    pub fn new(service: Arc<PacientesService>, paciente_id: impl Into<String>) -> Self {
        Self {
            service,
            paciente_id: paciente_id.into(),
            state: Mutex::new(State {
                view: ContactoView::Loading,
                last_ticket: 0,
            }),
            closed: AtomicBool::new(false),
        }
    }

    pub fn paciente_id(&self) -> &str {
        &self.paciente_id
    }

    pub async fn view(&self) -> ContactoView {
        self.state.lock().await.view.clone()
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(paciente_id = %self.paciente_id, "Contact store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn begin(&self, loading: bool) -> u64 {
        let mut state = self.state.lock().await;
        if loading {
            state.view = ContactoView::Loading;
        }
        state.last_ticket += 1;
        state.last_ticket
    }

    async fn apply(&self, ticket: u64, view: ContactoView) {
        let mut state = self.state.lock().await;
        if ticket == state.last_ticket && !self.is_closed() {
            state.view = view;
        } else {
            tracing::debug!(ticket, latest = state.last_ticket, "Discarding stale contact result");
        }
    }

    /// Give back a ticket whose call changed nothing, so an earlier load may still land.
    async fn release(&self, ticket: u64) {
        let mut state = self.state.lock().await;
        if ticket == state.last_ticket {
            state.last_ticket -= 1;
        }
    }

    /// Fetch the contact record; returns what this call observed.
    pub async fn load(&self) -> ContactoView {
        let ticket = self.begin(true).await;

        let view = match self.service.get_contacto(&self.paciente_id).await {
            Ok(Some(contacto)) => ContactoView::Loaded(contacto),
            Ok(None) => ContactoView::Missing,
            Err(e) => ContactoView::Error(format!("{}: {}", MSG_CONTACTO_CARGAR, e.detalle())),
        };

        self.apply(ticket, view.clone()).await;
        view
    }

    /// Validate and send; nothing goes out when the form is invalid.
    pub async fn save(&self, form: &ContactoForm) -> Result<ContactoInfo, ContactoSaveError> {
        let data = form.validate().map_err(ContactoSaveError::Invalid)?;
        let ticket = self.begin(false).await;

        let contacto = match self.service.save_contacto(&self.paciente_id, &data).await {
            Ok(contacto) => contacto,
            Err(e) => {
                self.release(ticket).await;
                return Err(StoreError::new(MSG_CONTACTO_GUARDAR, e).into());
            }
        };

        self.apply(ticket, ContactoView::Loaded(contacto.clone())).await;
        Ok(contacto)
    }
}
