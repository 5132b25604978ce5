use std::sync::Mutex;

use super::domain::{Lead, LeadId};

/// Storage seam for the lead collection. The engine itself only ever
/// reads a `&[Lead]`; this trait exists so the service and HTTP
/// packaging can be exercised against swappable backends.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError>;
    fn update(&self, lead: Lead) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
    /// All leads in insertion order. Ordering matters: score ties on
    /// the board are broken by this order.
    fn list(&self) -> Result<Vec<Lead>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lead already exists")]
    Conflict,
    #[error("lead not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Vec-backed store preserving insertion order, for the demo server and
/// tests.
#[derive(Default)]
pub struct InMemoryLeadRepository {
    leads: Mutex<Vec<Lead>>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            leads: Mutex::new(leads),
        }
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = self.leads.lock().expect("lead store mutex poisoned");
        if guard.iter().any(|existing| existing.id == lead.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(lead.clone());
        Ok(lead)
    }

    fn update(&self, lead: Lead) -> Result<(), RepositoryError> {
        let mut guard = self.leads.lock().expect("lead store mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == lead.id) {
            Some(slot) => {
                *slot = lead;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead store mutex poisoned");
        Ok(guard.iter().find(|lead| &lead.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead store mutex poisoned");
        Ok(guard.clone())
    }
}
