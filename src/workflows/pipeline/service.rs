use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use super::agenda;
use super::calendar::{derive_events, CalendarEvent};
use super::domain::{ActivityKind, Lead, LeadId, LeadValidationError, TaskId, TaskPriority};
use super::reducer::{self, LeadPatch};
use super::repository::{LeadRepository, RepositoryError};
use super::scoring::{rank_leads, score_lead, LeadScore};

/// Facade composing the repository, deriver, scorer, and reducers.
///
/// Every query takes `now` from the caller; the service never consults
/// an ambient clock, so a replayed request with the same store contents
/// produces the same answer.
pub struct PipelineService<R> {
    repository: Arc<R>,
}

/// One row of the prioritized board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardEntry {
    pub lead: Lead,
    pub score: LeadScore,
}

impl<R> PipelineService<R>
where
    R: LeadRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Intake a new lead after checking the structural invariants.
    pub fn add_lead(&self, lead: Lead) -> Result<Lead, PipelineServiceError> {
        lead.validate()?;
        let stored = self.repository.insert(lead)?;
        info!(lead = %stored.id.0, client = %stored.client_name, "lead added to pipeline");
        Ok(stored)
    }

    pub fn lead(&self, id: &LeadId) -> Result<Lead, PipelineServiceError> {
        let lead = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(lead)
    }

    pub fn lead_score(&self, id: &LeadId, now: NaiveDateTime) -> Result<LeadScore, PipelineServiceError> {
        let lead = self.lead(id)?;
        Ok(score_lead(&lead, now))
    }

    /// Leads ranked for the board, highest priority first.
    pub fn board(&self, now: NaiveDateTime) -> Result<Vec<BoardEntry>, PipelineServiceError> {
        let leads = self.repository.list()?;
        let entries = rank_leads(&leads, now)
            .into_iter()
            .map(|(lead, score)| BoardEntry {
                lead: lead.clone(),
                score,
            })
            .collect();
        Ok(entries)
    }

    /// Full derivation pass over the current lead collection.
    pub fn events(&self, now: NaiveDateTime) -> Result<Vec<CalendarEvent>, PipelineServiceError> {
        let leads = self.repository.list()?;
        Ok(derive_events(&leads, now))
    }

    pub fn agenda_for_day(
        &self,
        day: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, PipelineServiceError> {
        let events = self.events(now)?;
        Ok(agenda::events_on_day(&events, day)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn agenda_for_month(
        &self,
        year: i32,
        month: u32,
        now: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, PipelineServiceError> {
        let events = self.events(now)?;
        Ok(agenda::events_in_month(&events, year, month)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn upcoming(
        &self,
        now: NaiveDateTime,
        limit: usize,
    ) -> Result<Vec<CalendarEvent>, PipelineServiceError> {
        let events = self.events(now)?;
        Ok(agenda::upcoming(&events, now, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn schedule_follow_up(
        &self,
        id: &LeadId,
        due: NaiveDateTime,
        kind: ActivityKind,
        notes: &str,
        now: NaiveDateTime,
    ) -> Result<Lead, PipelineServiceError> {
        self.apply(id, |lead| reducer::schedule_follow_up(lead, due, kind, notes, now))
    }

    pub fn complete_task(
        &self,
        id: &LeadId,
        task_id: &TaskId,
        now: NaiveDateTime,
    ) -> Result<Lead, PipelineServiceError> {
        self.apply(id, |lead| reducer::mark_task_complete(lead, task_id, now))
    }

    pub fn log_activity(
        &self,
        id: &LeadId,
        content: &str,
        kind: ActivityKind,
        author: &str,
        now: NaiveDateTime,
    ) -> Result<Lead, PipelineServiceError> {
        self.apply(id, |lead| reducer::add_activity(lead, content, kind, author, now))
    }

    pub fn create_task(
        &self,
        id: &LeadId,
        description: &str,
        priority: TaskPriority,
        due: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<Lead, PipelineServiceError> {
        self.apply(id, |lead| reducer::add_task(lead, description, priority, due, now))
    }

    pub fn patch_lead(
        &self,
        id: &LeadId,
        patch: LeadPatch,
        now: NaiveDateTime,
    ) -> Result<Lead, PipelineServiceError> {
        self.apply(id, |lead| reducer::update_field(lead, patch, now))
    }

    /// Fetch-reduce-store cycle shared by every mutation endpoint. The
    /// reducer returns a fresh value; the previous one is discarded only
    /// after the store accepts the replacement.
    fn apply<F>(&self, id: &LeadId, reduce: F) -> Result<Lead, PipelineServiceError>
    where
        F: FnOnce(&Lead) -> Lead,
    {
        let current = self.lead(id)?;
        let next = reduce(&current);
        if next != current {
            self.repository.update(next.clone())?;
        }
        Ok(next)
    }
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error(transparent)]
    Invalid(#[from] LeadValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
