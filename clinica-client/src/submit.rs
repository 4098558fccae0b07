//! Form submission through a store.

use clinica_core::{FieldErrors, FormInput};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::error::StoreError;
use crate::services::ResourceService;
use crate::store::ResourceStore;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid form: {0}")]
    Invalid(FieldErrors),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Nothing to submit to")]
    NoTarget,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// Banner text for server-side failures; field errors render inline.
    pub fn banner(&self) -> Option<String> {
        match self {
            SubmitError::Store(e) => Some(e.banner()),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Rejects a second submit while one is still running.
#[derive(Debug, Default)]
pub struct FormSubmitter {
    submitting: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl FormSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<InFlight<'_>, SubmitError> {
        self.submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| InFlight(&self.submitting))
            .map_err(|_| SubmitError::Busy)
    }

    /// Validate, then create. Invalid forms never reach the store.
    pub async fn create<S, F>(&self, store: &ResourceStore<S>, form: &F) -> Result<S::Entity, SubmitError>
    where
        S: ResourceService,
        F: FormInput<Output = S::Draft>,
    {
        let draft = form.validate().map_err(SubmitError::Invalid)?;
        let _in_flight = self.begin()?;
        Ok(store.create(&draft).await?)
    }

    pub async fn update<S, F>(
        &self,
        store: &ResourceStore<S>,
        id: &str,
        form: &F,
    ) -> Result<S::Entity, SubmitError>
    where
        S: ResourceService,
        F: FormInput<Output = S::Draft>,
    {
        let draft = form.validate().map_err(SubmitError::Invalid)?;
        let _in_flight = self.begin()?;
        Ok(store.update(id, &draft).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let submitter = FormSubmitter::new();
        {
            let _first = submitter.begin().unwrap();
            assert!(submitter.is_submitting());
            assert!(matches!(submitter.begin(), Err(SubmitError::Busy)));
        }
        assert!(!submitter.is_submitting());
        assert!(submitter.begin().is_ok());
    }
}
