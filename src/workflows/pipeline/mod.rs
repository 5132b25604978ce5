//! Lead-to-calendar derivation and prioritization pipeline.
//!
//! The core is four pure pieces: the event deriver projects leads onto
//! the calendar, the scorer ranks them for the board, the agenda module
//! answers day/month/upcoming queries, and the reducers apply user
//! actions as copy-on-write updates. Everything takes `now` explicitly;
//! the service and router wrap the core for in-process and demo use.

pub mod agenda;
pub mod calendar;
pub mod domain;
pub mod import;
pub mod reducer;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use agenda::{events_in_month, events_on_day, upcoming};
pub use calendar::{derive_events, CalendarEvent, EventKind};
pub use domain::{
    ActivityEntry, ActivityKind, Lead, LeadId, LeadStatus, LeadValidationError, Payment,
    PaymentStatus, Task, TaskId, TaskPriority, Temperature, TravelDates,
};
pub use import::{LeadCsvImporter, LeadImportError};
pub use reducer::{
    add_activity, add_task, mark_task_complete, schedule_follow_up, update_field, LeadPatch,
};
pub use repository::{InMemoryLeadRepository, LeadRepository, RepositoryError};
pub use router::pipeline_router;
pub use scoring::{rank_leads, score_lead, LeadScore, ScoreComponent, ScoreFactor};
pub use service::{BoardEntry, PipelineService, PipelineServiceError};
