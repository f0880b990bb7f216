mod common;

use jiff::{SignedDuration, Timestamp};
use waypoint_core::{
    params::{
        ApproveProcess, CompleteStep, CreateFromTemplate, Id, ListProcesses, ListTasks,
        StepDraft,
    },
    ErrorKind, ProcessStatus, StepStatus, TrackerBuilder,
};

use common::{create_test_tracker, step, vendor_onboarding};

fn complete(process_id: u64, step_id: &str) -> CompleteStep {
    CompleteStep {
        process_id,
        step_id: step_id.to_string(),
        actor: "lee".to_string(),
        evidence: vec![],
    }
}

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_vendor_onboarding_with_approval() {
    let (_temp_dir, tracker, notifier) = create_test_tracker().await;

    let process = tracker
        .create_process(&vendor_onboarding(true))
        .await
        .expect("Failed to create process");
    assert_eq!(process.status, ProcessStatus::Draft);
    assert!(process.steps.iter().all(|s| s.status == StepStatus::Pending));

    tracker
        .activate_process(&Id { id: process.id })
        .await
        .expect("Failed to activate process");

    let before = Timestamp::now();
    let process = tracker
        .complete_step(&complete(process.id, "request"))
        .await
        .expect("Failed to complete request");
    let after = Timestamp::now();

    // Both branches open at once; only the legal review carries a deadline
    let legal = process.step("legal").expect("legal step");
    let finance = process.step("finance").expect("finance step");
    assert_eq!(legal.status, StepStatus::InProgress);
    assert_eq!(finance.status, StepStatus::InProgress);
    assert!(finance.due_date.is_none());
    let due = legal.due_date.expect("legal due date");
    assert!(due >= before + SignedDuration::from_hours(48));
    assert!(due <= after + SignedDuration::from_hours(48));

    let subjects: Vec<String> = notifier.take().into_iter().map(|n| n.subject).collect();
    assert_eq!(
        subjects,
        vec![
            "Step Completed: Submit vendor request".to_string(),
            "New Task: Legal review".to_string(),
        ]
    );

    // Either dependency is enough to open the final step
    let process = tracker
        .complete_step(&complete(process.id, "legal"))
        .await
        .expect("Failed to complete legal");
    assert_eq!(
        process.step("enable").map(|s| s.status),
        Some(StepStatus::InProgress)
    );

    tracker
        .complete_step(&complete(process.id, "finance"))
        .await
        .expect("Failed to complete finance");
    let process = tracker
        .complete_step(&complete(process.id, "enable"))
        .await
        .expect("Failed to complete enable");
    assert_eq!(process.progress(), 100);
    assert_eq!(process.status, ProcessStatus::Active);
    assert!(notifier
        .sent()
        .iter()
        .any(|n| n.subject == "Process Ready for Approval: Vendor Onboarding"));

    let approved = tracker
        .approve_process(&ApproveProcess {
            id: process.id,
            approver: "boss".to_string(),
        })
        .await
        .expect("Failed to approve");
    assert_eq!(approved.status, ProcessStatus::Completed);
    assert_eq!(approved.approved_by.as_deref(), Some("boss"));

    let last = notifier.sent().pop().expect("completion notification");
    assert_eq!(last.recipient, "ana");
    assert_eq!(last.subject, "Process Completed: Vendor Onboarding");

    let archived = tracker
        .archive_process(&Id { id: process.id })
        .await
        .expect("Failed to archive");
    assert_eq!(archived.status, ProcessStatus::Archived);

    let err = tracker
        .complete_step(&complete(process.id, "enable"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_concurrent_completions_are_serialized() {
    let (_temp_dir, tracker, _notifier) = create_test_tracker().await;

    let process = tracker
        .create_process(&vendor_onboarding(false))
        .await
        .unwrap();
    tracker.activate_process(&Id { id: process.id }).await.unwrap();
    tracker
        .complete_step(&complete(process.id, "request"))
        .await
        .unwrap();

    let legal = complete(process.id, "legal");
    let finance = complete(process.id, "finance");
    let (a, b) = tokio::join!(
        tracker.complete_step(&legal),
        tracker.complete_step(&finance)
    );
    a.expect("legal completion");
    b.expect("finance completion");

    let stored = tracker.get_process(&Id { id: process.id }).await.unwrap();
    assert_eq!(stored.completed_steps(), 3);
    assert_eq!(
        stored.step("enable").map(|s| s.status),
        Some(StepStatus::InProgress)
    );

    // Racing completions of the same step: exactly one wins
    let enable = complete(process.id, "enable");
    let (a, b) = tokio::join!(
        tracker.complete_step(&enable),
        tracker.complete_step(&enable)
    );
    assert!(a.is_ok() != b.is_ok());

    let stored = tracker.get_process(&Id { id: process.id }).await.unwrap();
    assert_eq!(stored.status, ProcessStatus::Completed);
}

#[tokio::test]
async fn test_past_due_step_flagged_once() {
    let (_temp_dir, tracker, notifier) = create_test_tracker().await;

    let mut process = vendor_onboarding(false);
    process.steps[2] = StepDraft {
        due_date: Some("2020-01-01T00:00:00Z".to_string()),
        ..step("finance", "Finance setup", &["request"])
    };
    let process = tracker.create_process(&process).await.unwrap();
    tracker.activate_process(&Id { id: process.id }).await.unwrap();

    // Pending steps are never flagged, even past their due date
    assert_eq!(tracker.check_overdue_steps().await.unwrap(), 0);

    tracker
        .complete_step(&complete(process.id, "request"))
        .await
        .unwrap();
    notifier.take();

    assert_eq!(tracker.check_overdue_steps().await.unwrap(), 1);
    assert_eq!(tracker.check_overdue_steps().await.unwrap(), 0);

    let sent = notifier.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Overdue Step: Finance setup");

    let overdue = tracker
        .list_tasks(&ListTasks {
            status: Some("overdue".to_string()),
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].step.id, "finance");

    // An overdue step can still be completed
    let process = tracker
        .complete_step(&complete(process.id, "finance"))
        .await
        .unwrap();
    assert_eq!(
        process.step("finance").map(|s| s.status),
        Some(StepStatus::Completed)
    );
    assert_eq!(tracker.dashboard().await.unwrap().overdue_steps, 0);
}

#[tokio::test]
async fn test_state_survives_reopening() {
    let (temp_dir, tracker, _notifier) = create_test_tracker().await;

    let process = tracker
        .create_process(&vendor_onboarding(false))
        .await
        .unwrap();
    tracker.activate_process(&Id { id: process.id }).await.unwrap();
    tracker
        .complete_step(&complete(process.id, "request"))
        .await
        .unwrap();
    let template = tracker
        .save_as_template(&Id { id: process.id })
        .await
        .unwrap();
    drop(tracker);

    let reopened = TrackerBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .expect("Failed to reopen tracker");

    let stored = reopened.get_process(&Id { id: process.id }).await.unwrap();
    assert_eq!(stored.status, ProcessStatus::Active);
    assert_eq!(stored.completed_steps(), 1);
    let completion = stored
        .step("request")
        .and_then(|s| s.completion.clone())
        .expect("completion metadata");
    assert_eq!(completion.completed_by, "lee");
    assert!(stored.step("legal").and_then(|s| s.due_date).is_some());

    let copy = reopened
        .create_from_template(&CreateFromTemplate {
            template_id: template.id,
            name: None,
            created_by: "kim".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(copy.name, "Vendor Onboarding");
    assert_eq!(copy.status, ProcessStatus::Draft);
    assert!(copy.steps.iter().all(|s| s.status == StepStatus::Pending
        && s.completion.is_none()
        && s.due_date.is_none()));

    let active = reopened
        .list_processes(&ListProcesses {
            status: Some("active".to_string()),
            department: None,
        })
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, process.id);
}
