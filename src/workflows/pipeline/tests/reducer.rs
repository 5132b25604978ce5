use chrono::Duration;

use super::common::*;
use crate::workflows::pipeline::domain::{ActivityKind, LeadStatus, TaskId, TaskPriority};
use crate::workflows::pipeline::reducer::{
    add_activity, add_task, mark_task_complete, schedule_follow_up, update_field, LeadPatch,
};

#[test]
fn completing_a_task_leaves_the_original_untouched() {
    let mut original = lead("L1");
    original.tasks = vec![task("T1", ts(2025, 12, 12), TaskPriority::High, false)];

    let updated = mark_task_complete(&original, &TaskId("T1".to_string()), now());

    assert!(!original.tasks[0].is_completed, "input lead was mutated");
    let done = updated
        .task(&TaskId("T1".to_string()))
        .expect("task still present");
    assert!(done.is_completed);
    assert_eq!(updated.updated_at, now());
}

#[test]
fn completing_an_unknown_task_changes_nothing() {
    let mut original = lead("L1");
    original.tasks = vec![task("T1", ts(2025, 12, 12), TaskPriority::High, false)];

    let updated = mark_task_complete(&original, &TaskId("missing".to_string()), now());

    assert_eq!(updated, original);
}

#[test]
fn completion_is_monotonic_and_does_not_retouch_updated_at() {
    let mut original = lead("L1");
    original.tasks = vec![task("T1", ts(2025, 12, 12), TaskPriority::High, true)];
    let stamped = original.updated_at;

    let updated = mark_task_complete(&original, &TaskId("T1".to_string()), now());

    assert!(updated.tasks[0].is_completed);
    assert_eq!(updated.updated_at, stamped);
}

#[test]
fn scheduling_a_follow_up_prepends_task_and_log_entry() {
    let original = lead("L1");
    let due = now() + Duration::days(2);

    let updated = schedule_follow_up(&original, due, ActivityKind::Call, "confirm dates", now());

    let new_task = &updated.tasks[0];
    assert_eq!(new_task.description, "Call: confirm dates");
    assert_eq!(new_task.due_date, due);
    assert_eq!(new_task.priority, TaskPriority::Medium);
    assert!(!new_task.is_completed);

    let entry = &updated.activity[0];
    assert_eq!(entry.kind, ActivityKind::FollowUp);
    assert_eq!(entry.timestamp, now());
    assert_eq!(updated.updated_at, now());
    assert!(original.tasks.is_empty(), "input lead was mutated");
}

#[test]
fn follow_up_without_notes_uses_the_bare_kind_label() {
    let updated = schedule_follow_up(&lead("L1"), now(), ActivityKind::Meeting, "  ", now());
    assert_eq!(updated.tasks[0].description, "Meeting");
}

#[test]
fn blank_activity_content_is_a_no_op() {
    let original = lead("L1");
    let updated = add_activity(&original, "   ", ActivityKind::Note, "agent", now());
    assert_eq!(updated, original);
}

#[test]
fn activity_entries_are_prepended_with_the_given_clock() {
    let mut original = lead("L1");
    original.activity = vec![activity("older", ts(2025, 12, 1))];

    let updated = add_activity(&original, "Spoke with client", ActivityKind::Call, "maria", now());

    assert_eq!(updated.activity.len(), 2);
    assert_eq!(updated.activity[0].content, "Spoke with client");
    assert_eq!(updated.activity[0].author, "maria");
    assert_eq!(updated.activity[0].timestamp, now());
    assert_eq!(updated.updated_at, now());
}

#[test]
fn add_task_rejects_blank_descriptions_idempotently() {
    let original = lead("L1");

    let once = add_task(&original, "", TaskPriority::High, Some(now()), now());
    let twice = add_task(&once, "", TaskPriority::High, Some(now()), now());

    assert_eq!(once, original);
    assert_eq!(twice, original);
}

#[test]
fn add_task_requires_a_due_date() {
    let original = lead("L1");
    let updated = add_task(&original, "Send brochure", TaskPriority::Low, None, now());
    assert_eq!(updated, original);
}

#[test]
fn add_task_prepends_and_trims() {
    let mut original = lead("L1");
    original.tasks = vec![task("T1", ts(2025, 12, 20), TaskPriority::Low, false)];

    let updated = add_task(
        &original,
        "  Send brochure  ",
        TaskPriority::High,
        Some(ts(2025, 12, 14)),
        now(),
    );

    assert_eq!(updated.tasks.len(), 2);
    assert_eq!(updated.tasks[0].description, "Send brochure");
    assert_eq!(updated.tasks[1].id, TaskId("T1".to_string()));
    assert_eq!(updated.updated_at, now());
}

#[test]
fn field_updates_always_touch_updated_at() {
    let original = lead("L1");

    let updated = update_field(&original, LeadPatch::Status(LeadStatus::Booked), now());
    assert_eq!(updated.status, LeadStatus::Booked);
    assert_eq!(updated.updated_at, now());

    let renamed = update_field(
        &updated,
        LeadPatch::Destination("Marrakesh".to_string()),
        now() + Duration::hours(1),
    );
    assert_eq!(renamed.destination, "Marrakesh");
    assert_eq!(renamed.updated_at, now() + Duration::hours(1));
}
