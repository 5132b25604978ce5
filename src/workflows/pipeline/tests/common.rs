use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::workflows::pipeline::domain::{
    ActivityEntry, ActivityKind, Lead, LeadId, LeadStatus, Payment, PaymentStatus, Task, TaskId,
    TaskPriority, Temperature, TravelDates,
};
use crate::workflows::pipeline::repository::InMemoryLeadRepository;
use crate::workflows::pipeline::service::PipelineService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn ts(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day).and_time(NaiveTime::MIN)
}

pub(super) fn ts_at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

/// Reference evaluation instant used across the suite.
pub(super) fn now() -> NaiveDateTime {
    ts(2025, 12, 10)
}

pub(super) fn task(id: &str, due: NaiveDateTime, priority: TaskPriority, completed: bool) -> Task {
    Task {
        id: TaskId(id.to_string()),
        description: format!("Task {id}"),
        due_date: due,
        is_completed: completed,
        priority,
    }
}

pub(super) fn activity(id: &str, timestamp: NaiveDateTime) -> ActivityEntry {
    ActivityEntry {
        id: id.to_string(),
        kind: ActivityKind::Note,
        content: format!("note {id}"),
        timestamp,
        author: "agent".to_string(),
    }
}

/// Warm qualification-stage lead with no tasks or history; individual
/// tests override the fields they exercise.
pub(super) fn lead(id: &str) -> Lead {
    Lead {
        id: LeadId(id.to_string()),
        client_name: format!("Client {id}"),
        contact: format!("{id}@example.com"),
        destination: "Lisbon".to_string(),
        travelers: 2,
        estimated_value: 10_000,
        payment: Payment {
            total: 10_000,
            paid: 0,
            status: PaymentStatus::Pending,
        },
        status: LeadStatus::Qualification,
        temperature: Temperature::Warm,
        ai_score: 50,
        travel_dates: TravelDates {
            from: date(2026, 1, 10),
            to: date(2026, 1, 20),
        },
        created_at: ts(2025, 11, 1),
        updated_at: ts(2025, 12, 9),
        tasks: Vec::new(),
        activity: Vec::new(),
    }
}

/// Booked lead mirroring the classic "pay balance before departure"
/// scenario: one open High task due 2025-12-01, travel 12-15 to 12-20.
pub(super) fn booked_lead() -> Lead {
    let mut booked = lead("L1");
    booked.status = LeadStatus::Booked;
    booked.travel_dates = TravelDates {
        from: date(2025, 12, 15),
        to: date(2025, 12, 20),
    };
    booked.tasks = vec![Task {
        id: TaskId("T1".to_string()),
        description: "Pay balance".to_string(),
        due_date: ts(2025, 12, 1),
        is_completed: false,
        priority: TaskPriority::High,
    }];
    booked
}

pub(super) fn build_service() -> (
    PipelineService<InMemoryLeadRepository>,
    Arc<InMemoryLeadRepository>,
) {
    let repository = Arc::new(InMemoryLeadRepository::new());
    let service = PipelineService::new(repository.clone());
    (service, repository)
}
