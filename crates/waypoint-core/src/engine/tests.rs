//! Tests for the workflow engine.

use jiff::{SignedDuration, Timestamp};

use super::{editing, *};
use crate::{
    error::ErrorKind,
    models::{
        Evidence, Process, ProcessStatus, StepRequirements, StepStatus, MAX_RELATIVE_DUE_HOURS,
    },
    params::{AddStep, CreateProcess, RelativeDueDateDraft, StepDraft, UpdateProcess},
};

const ADMIN: &str = "admin";

fn t0() -> Timestamp {
    "2025-03-10T09:00:00Z".parse().expect("valid timestamp")
}

fn at(hours: i64) -> Timestamp {
    t0() + SignedDuration::from_hours(hours)
}

fn ctx(now: Timestamp) -> EngineContext<'static> {
    EngineContext::new(now, ADMIN)
}

fn step(id: &str, deps: &[&str]) -> StepDraft {
    StepDraft {
        id: Some(id.to_string()),
        title: format!("Step {}", id.to_uppercase()),
        assignee: format!("{id}-owner"),
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
        ..Default::default()
    }
}

/// A (no deps), B (depends on A, due 24h after A), C (depends on B).
fn abc(requires_admin_approval: bool) -> Process {
    let mut b = step("b", &["a"]);
    b.relative_due_date = Some(RelativeDueDateDraft {
        step_id: "a".into(),
        hours: 24,
    });

    let mut process = editing::new_process(
        CreateProcess {
            name: "Employee Onboarding".into(),
            description: Some("New hire checklist".into()),
            department: "HR".into(),
            created_by: "creator".into(),
            requires_admin_approval,
            steps: vec![step("a", &[]), b, step("c", &["b"])],
        },
        t0(),
    )
    .expect("valid process");
    process.id = 7;
    process
}

fn active_abc(requires_admin_approval: bool) -> Process {
    let mut process = abc(requires_admin_approval);
    activate(&mut process, ctx(t0())).expect("activation succeeds");
    process
}

fn status_of(process: &Process, id: &str) -> StepStatus {
    process.step(id).expect("step exists").status
}

#[test]
fn test_scenario_without_approval() {
    let mut process = active_abc(false);

    let sent = complete_step(&mut process, "a", "ana", &[], ctx(at(1))).expect("complete a");
    assert_eq!(status_of(&process, "b"), StepStatus::InProgress);
    assert_eq!(process.step("b").and_then(|s| s.due_date), Some(at(25)));
    assert_eq!(status_of(&process, "c"), StepStatus::Pending);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].recipient, ADMIN);
    assert_eq!(sent[0].subject, "Step Completed: Step A");
    assert_eq!(sent[1].recipient, "b-owner");
    assert_eq!(sent[1].subject, "New Task: Step B");

    complete_step(&mut process, "b", "ben", &[], ctx(at(2))).expect("complete b");
    assert_eq!(status_of(&process, "c"), StepStatus::InProgress);
    assert_eq!(process.step("c").and_then(|s| s.due_date), None);
    assert_eq!(process.status, ProcessStatus::Active);

    let sent = complete_step(&mut process, "c", "cai", &[], ctx(at(3))).expect("complete c");
    assert_eq!(process.status, ProcessStatus::Completed);
    assert_eq!(process.progress(), 100);
    assert_eq!(process.updated_at, at(3));
    assert_eq!(sent.len(), 1, "auto-completion sends no extra notification");
}

#[test]
fn test_scenario_with_approval() {
    let mut process = active_abc(true);

    for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
        complete_step(&mut process, id, "worker", &[], ctx(at(i as i64))).expect("complete");
    }
    assert_eq!(process.status, ProcessStatus::Active);
    assert!(process.all_steps_completed());
    assert!(!process.is_approved());

    let sent = approve(&mut process, "boss", ctx(at(5))).expect("approve");
    assert_eq!(process.status, ProcessStatus::Completed);
    assert_eq!(process.approved_by.as_deref(), Some("boss"));
    assert_eq!(process.approved_at, Some(at(5)));
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "creator");
    assert_eq!(sent[0].subject, "Process Completed: Employee Onboarding");
}

#[test]
fn test_ready_for_approval_notifies_admin() {
    let mut process = active_abc(true);
    complete_step(&mut process, "a", "w", &[], ctx(at(0))).expect("a");
    complete_step(&mut process, "b", "w", &[], ctx(at(0))).expect("b");
    let sent = complete_step(&mut process, "c", "w", &[], ctx(at(0))).expect("c");

    let last = sent.last().expect("notification");
    assert_eq!(last.recipient, ADMIN);
    assert_eq!(last.subject, "Process Ready for Approval: Employee Onboarding");
}

#[test]
fn test_second_completion_is_rejected_without_reactivation() {
    let mut process = active_abc(false);
    complete_step(&mut process, "a", "ana", &[], ctx(at(1))).expect("first completion");
    let snapshot = process.clone();

    let err = complete_step(&mut process, "a", "ana", &[], ctx(at(2))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(process, snapshot, "failed completion must not mutate");
    assert_eq!(process.step("b").and_then(|s| s.due_date), Some(at(25)));
}

#[test]
fn test_activation_is_single_pass_and_only_from_pending() {
    let mut process = editing::new_process(
        CreateProcess {
            name: "Fan out".into(),
            department: "Ops".into(),
            created_by: "ops".into(),
            steps: vec![step("a", &[]), step("b", &["a"]), step("c", &["a", "b"])],
            ..Default::default()
        },
        t0(),
    )
    .expect("valid");
    activate(&mut process, ctx(t0())).expect("activate");

    // c is completed out of order first; it must not be reactivated.
    complete_step(&mut process, "c", "ops", &[], ctx(at(1))).expect("complete c");
    complete_step(&mut process, "a", "ops", &[], ctx(at(2))).expect("complete a");

    assert_eq!(status_of(&process, "b"), StepStatus::InProgress);
    assert_eq!(status_of(&process, "c"), StepStatus::Completed);
}

#[test]
fn test_any_dependency_activates_dependent() {
    let mut process = editing::new_process(
        CreateProcess {
            name: "Join".into(),
            department: "Ops".into(),
            created_by: "ops".into(),
            steps: vec![step("a", &[]), step("b", &[]), step("c", &["a", "b"])],
            ..Default::default()
        },
        t0(),
    )
    .expect("valid");
    activate(&mut process, ctx(t0())).expect("activate");

    complete_step(&mut process, "a", "ops", &[], ctx(at(1))).expect("complete a");
    assert_eq!(status_of(&process, "c"), StepStatus::InProgress);
}

#[test]
fn test_progress_is_monotonic_and_bounded() {
    let mut process = active_abc(false);
    let mut last = process.progress();
    assert_eq!(last, 0);

    for id in ["a", "b", "c"] {
        complete_step(&mut process, id, "w", &[], ctx(at(1))).expect("complete");
        let progress = process.progress();
        assert!(progress >= last);
        assert!(progress <= 100);
        assert_eq!(progress == 100, process.all_steps_completed());
        last = progress;
    }
    assert_eq!(last, 100);
}

#[test]
fn test_relative_due_date_is_exact() {
    let mut process = active_abc(false);
    let completed_at: Timestamp = "2025-03-30T00:30:00Z".parse().expect("timestamp");

    complete_step(&mut process, "a", "ana", &[], ctx(completed_at)).expect("complete a");

    let b = process.step("b").expect("b");
    assert_eq!(b.status, StepStatus::InProgress);
    assert_eq!(b.due_date, Some(completed_at + SignedDuration::from_hours(24)));
}

fn with_due_hours(hours: i64) -> crate::error::Result<Process> {
    let mut b = step("b", &["a"]);
    b.relative_due_date = Some(RelativeDueDateDraft {
        step_id: "a".into(),
        hours,
    });
    editing::new_process(
        CreateProcess {
            name: "Long Lease".into(),
            department: "Facilities".into(),
            created_by: "creator".into(),
            steps: vec![step("a", &[]), b],
            ..Default::default()
        },
        t0(),
    )
}

#[test]
fn test_relative_due_hours_are_bounded_at_input() {
    let err = with_due_hours(4_000_000_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let mut process = with_due_hours(i64::from(MAX_RELATIVE_DUE_HOURS)).expect("largest allowed");
    activate(&mut process, ctx(t0())).expect("activate");
    complete_step(&mut process, "a", "ana", &[], ctx(at(1))).expect("complete a");

    let b = process.step("b").expect("b");
    assert_eq!(b.status, StepStatus::InProgress);
    assert_eq!(
        b.due_date,
        Some(at(1) + SignedDuration::from_hours(i64::from(MAX_RELATIVE_DUE_HOURS)))
    );
}

#[test]
fn test_overdue_sweep_is_idempotent() {
    let mut process = active_abc(false);
    complete_step(&mut process, "a", "ana", &[], ctx(at(0))).expect("complete a");

    let sent = sweep_overdue(&mut process, ctx(at(24)));
    assert!(sent.is_empty(), "due date itself is not overdue");

    let sent = sweep_overdue(&mut process, ctx(at(25)));
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Overdue Step: Step B");
    assert_eq!(status_of(&process, "b"), StepStatus::Overdue);
    let after_first = process.clone();

    let sent = sweep_overdue(&mut process, ctx(at(26)));
    assert!(sent.is_empty());
    assert_eq!(process, after_first);
}

#[test]
fn test_overdue_step_can_still_be_completed() {
    let mut process = active_abc(false);
    complete_step(&mut process, "a", "ana", &[], ctx(at(0))).expect("complete a");
    sweep_overdue(&mut process, ctx(at(48)));
    assert_eq!(status_of(&process, "b"), StepStatus::Overdue);

    complete_step(&mut process, "b", "ben", &[], ctx(at(49))).expect("complete overdue b");
    assert_eq!(status_of(&process, "b"), StepStatus::Completed);
    assert_eq!(status_of(&process, "c"), StepStatus::InProgress);
}

#[test]
fn test_sweep_ignores_pending_and_inactive() {
    let mut process = abc(false);
    process.steps[0].due_date = Some(at(-1));
    process.steps[0].status = StepStatus::InProgress;
    assert!(sweep_overdue(&mut process, ctx(at(1))).is_empty(), "draft is ignored");

    let mut process = active_abc(false);
    process.steps[0].due_date = Some(at(-1));
    assert!(
        sweep_overdue(&mut process, ctx(at(1))).is_empty(),
        "pending steps are not flagged"
    );
}

#[test]
fn test_complete_requires_active_process() {
    let mut process = abc(false);
    let err = complete_step(&mut process, "a", "ana", &[], ctx(at(0))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let mut process = active_abc(false);
    let err = complete_step(&mut process, "zzz", "ana", &[], ctx(at(0))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = complete_step(&mut process, "a", "  ", &[], ctx(at(0))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_evidence_is_checked_before_mutation() {
    let mut process = abc(false);
    process.steps[0].requirements = StepRequirements {
        upload: true,
        checkbox: true,
        text_confirmation: false,
    };
    activate(&mut process, ctx(t0())).expect("activate");
    let snapshot = process.clone();

    let err = complete_step(
        &mut process,
        "a",
        "ana",
        &[Evidence::CheckboxConfirmation { confirmed: true }],
        ctx(at(1)),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(process, snapshot);

    complete_step(
        &mut process,
        "a",
        "ana",
        &[
            Evidence::UploadProof {
                attachments: vec!["contract.pdf".into()],
            },
            Evidence::CheckboxConfirmation { confirmed: true },
            Evidence::TextConfirmation {
                notes: "signed in person".into(),
            },
        ],
        ctx(at(1)),
    )
    .expect("evidence satisfies requirements");

    let completion = process.steps[0].completion.as_ref().expect("completion");
    assert_eq!(completion.completed_by, "ana");
    assert_eq!(completion.completed_at, at(1));
    assert_eq!(completion.attachments, ["contract.pdf"]);
    assert_eq!(completion.notes.as_deref(), Some("signed in person"));
    assert!(completion.confirmed);
}

#[test]
fn test_approval_gating() {
    let mut process = active_abc(true);
    let err = approve(&mut process, "boss", ctx(at(1))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState, "incomplete process");

    let mut no_approval = active_abc(false);
    let err = approve(&mut no_approval, "boss", ctx(at(1))).unwrap_err();
    assert!(err.to_string().contains("does not require approval"));

    let mut draft = abc(true);
    let err = approve(&mut draft, "boss", ctx(at(1))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    for id in ["a", "b", "c"] {
        complete_step(&mut process, id, "w", &[], ctx(at(1))).expect("complete");
    }
    approve(&mut process, "boss", ctx(at(2))).expect("approve");
    let err = approve(&mut process, "boss", ctx(at(3))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState, "already completed");
}

#[test]
fn test_activation_rules() {
    let mut empty = editing::new_process(
        CreateProcess {
            name: "Empty".into(),
            department: "Ops".into(),
            created_by: "ops".into(),
            ..Default::default()
        },
        t0(),
    )
    .expect("empty drafts are allowed");
    let err = activate(&mut empty, ctx(t0())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(empty.status, ProcessStatus::Draft);

    let mut cyclic = abc(false);
    cyclic.steps[0].depends_on = vec!["c".into()];
    let err = activate(&mut cyclic, ctx(t0())).unwrap_err();
    assert!(err.to_string().contains("dependency cycle"));

    let mut process = active_abc(false);
    assert!(process.steps.iter().all(|s| s.status == StepStatus::Pending));
    let err = activate(&mut process, ctx(t0())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_archive_rules() {
    let mut draft = abc(false);
    assert_eq!(
        archive(&mut draft, ctx(t0())).unwrap_err().kind(),
        ErrorKind::InvalidState
    );

    let mut process = active_abc(false);
    archive(&mut process, ctx(at(1))).expect("archive active");
    assert_eq!(process.status, ProcessStatus::Archived);
    assert_eq!(
        archive(&mut process, ctx(at(2))).unwrap_err().kind(),
        ErrorKind::InvalidState
    );
    assert_eq!(
        complete_step(&mut process, "a", "w", &[], ctx(at(2)))
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidState
    );
}

#[test]
fn test_draft_editing() {
    let mut process = abc(false);
    let process_id = process.id;

    let changed = editing::update_process(
        &mut process,
        UpdateProcess {
            id: process_id,
            name: Some("Onboarding v2".into()),
            requires_admin_approval: Some(true),
            ..Default::default()
        },
        at(1),
    )
    .expect("update");
    assert_eq!(changed, ["name", "requires_admin_approval"]);
    assert_eq!(process.updated_at, at(1));

    let id = editing::add_step(
        &mut process,
        AddStep {
            process_id,
            position: Some(0),
            step: StepDraft {
                title: "Prepare desk".into(),
                assignee: "Facilities".into(),
                ..Default::default()
            },
        },
        at(2),
    )
    .expect("add step");
    assert_eq!(id, "step-1");
    assert_eq!(process.steps[0].id, "step-1");

    let err = editing::remove_step(&mut process, "a", at(3)).unwrap_err();
    assert!(err.to_string().contains("step 'b' depends on it"));

    editing::swap_steps(&mut process, "step-1", "c", at(3)).expect("swap");
    assert_eq!(process.steps[0].id, "c");
    assert_eq!(process.steps[3].id, "step-1");

    editing::remove_step(&mut process, "step-1", at(4)).expect("remove");
    assert_eq!(process.steps.len(), 3);

    let before = process.clone();
    let err = editing::update_process(
        &mut process,
        UpdateProcess {
            id: process_id,
            name: Some("Renamed".into()),
            steps: Some(vec![step("x", &["y"])]),
            ..Default::default()
        },
        at(5),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(process, before, "rejected update leaves the draft untouched");

    activate(&mut process, ctx(at(6))).expect("activate");
    let err = editing::remove_step(&mut process, "c", at(7)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}
