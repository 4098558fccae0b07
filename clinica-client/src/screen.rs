//! List page controller: a store plus modal and delete-confirmation state.

use clinica_core::{Entity, FormInput};
use std::sync::Arc;

use crate::error::StoreError;
use crate::services::ResourceService;
use crate::store::ResourceStore;
use crate::submit::{FormSubmitter, SubmitError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Create,
    Edit(String),
    View(String),
}

pub struct ListScreen<S: ResourceService> {
    store: Arc<ResourceStore<S>>,
    submitter: FormSubmitter,
    modal: Modal,
    banner: Option<String>,
}

impl<S: ResourceService> ListScreen<S> {
    pub fn new(store: Arc<ResourceStore<S>>) -> Self {
        Self {
            store,
            submitter: FormSubmitter::new(),
            modal: Modal::Closed,
            banner: None,
        }
    }

    pub fn store(&self) -> &Arc<ResourceStore<S>> {
        &self.store
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub async fn mount(&mut self) -> Result<(), StoreError> {
        self.store.fetch_all().await.map(|_| ())
    }

    /// Leaving the page; responses still in flight are discarded.
    pub fn unmount(self) {
        self.store.close();
    }

    pub fn open_create(&mut self) {
        self.banner = None;
        self.modal = Modal::Create;
    }

    pub fn open_edit(&mut self, id: impl Into<String>) {
        self.banner = None;
        self.modal = Modal::Edit(id.into());
    }

    pub fn open_view(&mut self, id: impl Into<String>) {
        self.modal = Modal::View(id.into());
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
        self.banner = None;
    }

    /// Submit the form for the open create/edit modal; closes it on success.
    pub async fn submit<F>(&mut self, form: &F) -> Result<S::Entity, SubmitError>
    where
        F: FormInput<Output = S::Draft>,
    {
        let result = match &self.modal {
            Modal::Create => self.submitter.create(&self.store, form).await,
            Modal::Edit(id) => self.submitter.update(&self.store, id, form).await,
            Modal::Closed | Modal::View(_) => Err(SubmitError::NoTarget),
        };

        match &result {
            Ok(_) => self.close_modal(),
            Err(e) => {
                if let Some(banner) = e.banner() {
                    self.banner = Some(banner);
                }
            }
        }
        result
    }

    /// Ask `confirm` first; no request is made unless it returns true.
    pub async fn delete<C>(&mut self, id: &str, confirm: C) -> Result<bool, StoreError>
    where
        C: FnOnce(Option<&S::Entity>) -> bool,
    {
        let entity = self.store.find(id).await;
        if !confirm(entity.as_ref()) {
            tracing::debug!(id, "Delete cancelled");
            return Ok(false);
        }

        self.store.delete(id).await?;

        let open_on_deleted = match &self.modal {
            Modal::Edit(open) | Modal::View(open) => open == id,
            _ => false,
        };
        if open_on_deleted {
            self.close_modal();
        }
        Ok(true)
    }

    /// The entity the open modal refers to, if it is in the list.
    pub async fn current(&self) -> Option<S::Entity> {
        match &self.modal {
            Modal::Edit(id) | Modal::View(id) => self.store.find(id).await,
            _ => None,
        }
    }

    pub fn is_open_on(&self, entity: &S::Entity) -> bool {
        matches!(&self.modal, Modal::Edit(id) | Modal::View(id) if id == entity.id())
    }
}
