use chrono::Duration;

use super::common::*;
use crate::workflows::pipeline::calendar::{derive_events, EventKind};
use crate::workflows::pipeline::domain::{LeadStatus, TaskPriority, Temperature};

#[test]
fn completed_tasks_produce_no_events() {
    let mut quiet = lead("L1");
    quiet.tasks = vec![
        task("T1", ts(2025, 12, 12), TaskPriority::High, true),
        task("T2", ts(2025, 12, 14), TaskPriority::Low, false),
    ];

    let events = derive_events(&[quiet], now());

    let task_ids: Vec<&str> = events
        .iter()
        .filter(|event| event.kind == EventKind::Task)
        .map(|event| event.id.as_str())
        .collect();
    assert_eq!(task_ids, vec!["task-T2"]);
}

#[test]
fn travel_events_require_a_confirmed_itinerary() {
    for status in [
        LeadStatus::New,
        LeadStatus::Qualification,
        LeadStatus::Quoting,
        LeadStatus::Negotiation,
        LeadStatus::Completed,
        LeadStatus::Lost,
    ] {
        let mut unconfirmed = lead("L1");
        unconfirmed.status = status;
        let events = derive_events(&[unconfirmed], now());
        assert!(
            events.iter().all(|event| !matches!(
                event.kind,
                EventKind::TravelDeparture | EventKind::TravelReturn
            )),
            "{status:?} should not emit travel events"
        );
    }

    let mut operations = lead("L2");
    operations.status = LeadStatus::Operations;
    let events = derive_events(&[operations], now());
    assert!(events.iter().any(|e| e.kind == EventKind::TravelDeparture));
    assert!(events.iter().any(|e| e.kind == EventKind::TravelReturn));
}

#[test]
fn overdue_flag_compares_dates_only() {
    let mut pending = lead("L1");
    pending.tasks = vec![
        task("past", now() - Duration::days(1), TaskPriority::Medium, false),
        task("future", now() + Duration::days(1), TaskPriority::Medium, false),
        // Same calendar day, later clock time: still not overdue.
        task("today", ts_at(2025, 12, 10, 23), TaskPriority::Medium, false),
    ];

    let events = derive_events(&[pending], now());

    let overdue_of = |id: &str| {
        events
            .iter()
            .find(|event| event.id == format!("task-{id}"))
            .expect("event present")
            .is_overdue
    };
    assert!(overdue_of("past"));
    assert!(!overdue_of("future"));
    assert!(!overdue_of("today"));
}

#[test]
fn booked_lead_yields_exactly_task_and_travel_events() {
    let events = derive_events(&[booked_lead()], now());

    assert_eq!(events.len(), 3);

    let task_event = events
        .iter()
        .find(|event| event.id == "task-T1")
        .expect("task event present");
    assert!(task_event.is_overdue);
    assert_eq!(task_event.priority, TaskPriority::High);

    let departure = events
        .iter()
        .find(|event| event.id == "travel-departure-L1")
        .expect("departure event present");
    assert_eq!(departure.date.date(), date(2025, 12, 15));
    assert_eq!(departure.priority, TaskPriority::High);

    let comeback = events
        .iter()
        .find(|event| event.id == "travel-return-L1")
        .expect("return event present");
    assert_eq!(comeback.date.date(), date(2025, 12, 20));
    assert_eq!(comeback.priority, TaskPriority::Medium);
}

#[test]
fn silent_unconfirmed_lead_yields_nothing() {
    let events = derive_events(&[lead("L1")], now());
    assert!(events.is_empty());
}

#[test]
fn stale_lead_gets_a_follow_up_suggestion() {
    let mut stale = lead("L1");
    stale.activity = vec![activity("a1", now() - Duration::days(5))];

    let events = derive_events(&[stale], now());

    assert_eq!(events.len(), 1);
    let follow_up = &events[0];
    assert_eq!(follow_up.kind, EventKind::FollowUp);
    assert_eq!(follow_up.id, "follow-up-L1");
    assert_eq!(follow_up.date, now() + Duration::days(1));
    assert_eq!(follow_up.priority, TaskPriority::Medium);
}

#[test]
fn hot_leads_follow_up_at_high_priority() {
    let mut stale = lead("L1");
    stale.temperature = Temperature::Hot;
    stale.activity = vec![activity("a1", now() - Duration::days(4))];

    let events = derive_events(&[stale], now());
    assert_eq!(events[0].priority, TaskPriority::High);
}

#[test]
fn three_day_old_activity_is_not_yet_stale() {
    let mut recent = lead("L1");
    recent.activity = vec![activity("a1", now() - Duration::days(3))];

    assert!(derive_events(&[recent], now()).is_empty());
}

#[test]
fn confirmed_leads_never_get_follow_ups() {
    let mut booked = booked_lead();
    booked.tasks.clear();
    booked.activity = vec![activity("a1", now() - Duration::days(30))];

    let events = derive_events(&[booked], now());
    assert!(events.iter().all(|event| event.kind != EventKind::FollowUp));
}

#[test]
fn recency_is_resolved_by_timestamp_not_position() {
    // Oldest entry sits at index 0; a positional "last activity" read
    // would wrongly trigger a follow-up here.
    let mut shuffled = lead("L1");
    shuffled.activity = vec![
        activity("old", now() - Duration::days(10)),
        activity("recent", now() - Duration::days(1)),
    ];

    assert!(derive_events(&[shuffled], now()).is_empty());
}

#[test]
fn leads_without_history_get_no_follow_up() {
    let mut fresh = lead("L1");
    fresh.activity.clear();
    assert!(derive_events(&[fresh], now()).is_empty());
}
