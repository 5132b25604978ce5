use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::domain::{Lead, LeadId, TaskId, TaskPriority, Temperature};

/// Leads with no touch in this many days get a follow-up suggestion.
const FOLLOW_UP_AFTER_DAYS: i64 = 3;

/// Category of a derived calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Task,
    TravelDeparture,
    TravelReturn,
    FollowUp,
}

impl EventKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::TravelDeparture => "travel-departure",
            Self::TravelReturn => "travel-return",
            Self::FollowUp => "follow-up",
        }
    }
}

/// Read-only projection of a lead onto the calendar.
///
/// Events are ephemeral: they are recomputed from the lead collection on
/// every derivation pass and never persisted or mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub kind: EventKind,
    pub date: NaiveDateTime,
    pub priority: TaskPriority,
    pub is_overdue: bool,
    pub lead_id: LeadId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

/// Project every lead onto the calendar.
///
/// For each lead, in input order:
/// - one `task` event per open task, flagged overdue when the due date
///   (date component only) lies before `now`;
/// - `travel-departure` / `travel-return` events when the itinerary is
///   confirmed (Booked or Operations), at fixed High/Medium priority;
/// - one `follow-up` suggestion dated tomorrow when the lead is not yet
///   confirmed and its latest activity is more than three days old.
///
/// Output order is unspecified; callers sort through the agenda queries.
pub fn derive_events(leads: &[Lead], now: NaiveDateTime) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for lead in leads {
        for task in lead.open_tasks() {
            events.push(CalendarEvent {
                id: format!("task-{}", task.id.0),
                title: task.description.clone(),
                kind: EventKind::Task,
                date: task.due_date,
                priority: task.priority,
                is_overdue: task.due_date.date() < now.date(),
                lead_id: lead.id.clone(),
                task_id: Some(task.id.clone()),
            });
        }

        if lead.status.is_confirmed() {
            events.push(CalendarEvent {
                id: format!("travel-departure-{}", lead.id.0),
                title: format!("Departure: {} ({})", lead.client_name, lead.destination),
                kind: EventKind::TravelDeparture,
                date: lead.travel_dates.from.and_time(NaiveTime::MIN),
                priority: TaskPriority::High,
                is_overdue: false,
                lead_id: lead.id.clone(),
                task_id: None,
            });
            events.push(CalendarEvent {
                id: format!("travel-return-{}", lead.id.0),
                title: format!("Return: {}", lead.client_name),
                kind: EventKind::TravelReturn,
                date: lead.travel_dates.to.and_time(NaiveTime::MIN),
                priority: TaskPriority::Medium,
                is_overdue: false,
                lead_id: lead.id.clone(),
                task_id: None,
            });
        } else if let Some(entry) = lead.latest_activity() {
            if (now - entry.timestamp).num_days() > FOLLOW_UP_AFTER_DAYS {
                let priority = match lead.temperature {
                    Temperature::Hot => TaskPriority::High,
                    _ => TaskPriority::Medium,
                };
                events.push(CalendarEvent {
                    id: format!("follow-up-{}", lead.id.0),
                    title: format!("Follow up with {}", lead.client_name),
                    kind: EventKind::FollowUp,
                    date: now + Duration::days(1),
                    priority,
                    is_overdue: false,
                    lead_id: lead.id.clone(),
                    task_id: None,
                });
            }
        }
    }

    events
}
