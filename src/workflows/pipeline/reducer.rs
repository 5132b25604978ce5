//! Pure update functions over [`Lead`] values.
//!
//! Every reducer takes the current lead by reference and returns a new
//! value for the caller to write back; nothing is mutated in place.
//! Invalid input (blank text, missing dates, unknown ids) results in an
//! unchanged copy rather than an error, matching the forgiving intake
//! forms that feed this pipeline.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDateTime;

use super::domain::{
    ActivityEntry, ActivityKind, Lead, LeadStatus, Payment, Task, TaskId, TaskPriority,
    Temperature, TravelDates,
};

static TASK_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ACTIVITY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    let id = TASK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TaskId(format!("task-{id:06}"))
}

fn next_activity_id() -> String {
    let id = ACTIVITY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("act-{id:06}")
}

/// Typed field update for the generic setter.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadPatch {
    Status(LeadStatus),
    Temperature(Temperature),
    ClientName(String),
    Contact(String),
    Destination(String),
    Travelers(u16),
    EstimatedValue(u32),
    Payment(Payment),
    TravelDates(TravelDates),
}

/// Schedule a follow-up touchpoint: a Medium-priority task due at
/// `due`, plus a follow-up entry in the activity log.
pub fn schedule_follow_up(
    lead: &Lead,
    due: NaiveDateTime,
    kind: ActivityKind,
    notes: &str,
    now: NaiveDateTime,
) -> Lead {
    let description = if notes.trim().is_empty() {
        kind.label().to_string()
    } else {
        format!("{}: {}", kind.label(), notes.trim())
    };

    let mut next = lead.clone();
    next.tasks.insert(
        0,
        Task {
            id: next_task_id(),
            description: description.clone(),
            due_date: due,
            is_completed: false,
            priority: TaskPriority::Medium,
        },
    );
    next.activity.insert(
        0,
        ActivityEntry {
            id: next_activity_id(),
            kind: ActivityKind::FollowUp,
            content: description,
            timestamp: now,
            author: "system".to_string(),
        },
    );
    next.updated_at = now;
    next
}

/// Mark a task complete. Completion is one-way; a task that is already
/// complete, or an unknown id, leaves the lead untouched (including
/// `updated_at`).
pub fn mark_task_complete(lead: &Lead, task_id: &TaskId, now: NaiveDateTime) -> Lead {
    let mut next = lead.clone();
    let transitioned = next
        .tasks
        .iter_mut()
        .find(|task| &task.id == task_id && !task.is_completed)
        .map(|task| task.is_completed = true)
        .is_some();

    if transitioned {
        next.updated_at = now;
    }
    next
}

/// Record an activity log entry. Blank content is a no-op.
pub fn add_activity(
    lead: &Lead,
    content: &str,
    kind: ActivityKind,
    author: &str,
    now: NaiveDateTime,
) -> Lead {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return lead.clone();
    }

    let mut next = lead.clone();
    next.activity.insert(
        0,
        ActivityEntry {
            id: next_activity_id(),
            kind,
            content: trimmed.to_string(),
            timestamp: now,
            author: author.to_string(),
        },
    );
    next.updated_at = now;
    next
}

/// Add a task to the front of the lead's task list. Blank descriptions
/// and missing due dates are no-ops.
pub fn add_task(
    lead: &Lead,
    description: &str,
    priority: TaskPriority,
    due: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Lead {
    let trimmed = description.trim();
    let Some(due_date) = due else {
        return lead.clone();
    };
    if trimmed.is_empty() {
        return lead.clone();
    }

    let mut next = lead.clone();
    next.tasks.insert(
        0,
        Task {
            id: next_task_id(),
            description: trimmed.to_string(),
            due_date,
            is_completed: false,
            priority,
        },
    );
    next.updated_at = now;
    next
}

/// Apply a typed field update. Always bumps `updated_at`.
pub fn update_field(lead: &Lead, patch: LeadPatch, now: NaiveDateTime) -> Lead {
    let mut next = lead.clone();
    match patch {
        LeadPatch::Status(status) => next.status = status,
        LeadPatch::Temperature(temperature) => next.temperature = temperature,
        LeadPatch::ClientName(name) => next.client_name = name,
        LeadPatch::Contact(contact) => next.contact = contact,
        LeadPatch::Destination(destination) => next.destination = destination,
        LeadPatch::Travelers(travelers) => next.travelers = travelers,
        LeadPatch::EstimatedValue(value) => next.estimated_value = value,
        LeadPatch::Payment(payment) => next.payment = payment,
        LeadPatch::TravelDates(dates) => next.travel_dates = dates,
    }
    next.updated_at = now;
    next
}
