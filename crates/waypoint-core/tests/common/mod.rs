use std::sync::Arc;

use tempfile::TempDir;
use waypoint_core::{
    params::{CreateProcess, RelativeDueDateDraft, StepDraft},
    MemoryNotifier, Tracker, TrackerBuilder,
};

/// Helper function to create a test tracker that records notifications
pub async fn create_test_tracker() -> (TempDir, Tracker, MemoryNotifier) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let notifier = MemoryNotifier::new();
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_notifier(Arc::new(notifier.clone()))
        .build()
        .await
        .expect("Failed to create tracker");
    (temp_dir, tracker, notifier)
}

/// A step definition with an explicit id and dependencies
pub fn step(id: &str, title: &str, deps: &[&str]) -> StepDraft {
    StepDraft {
        id: Some(id.to_string()),
        title: title.to_string(),
        assignee: format!("{id}-owner"),
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
        ..Default::default()
    }
}

/// Vendor onboarding: request -> (legal review, finance setup) -> activation
pub fn vendor_onboarding(requires_admin_approval: bool) -> CreateProcess {
    let mut legal = step("legal", "Legal review", &["request"]);
    legal.relative_due_date = Some(RelativeDueDateDraft {
        step_id: "request".to_string(),
        hours: 48,
    });
    let finance = step("finance", "Finance setup", &["request"]);

    CreateProcess {
        name: "Vendor Onboarding".to_string(),
        description: Some("Bring a new supplier on board".to_string()),
        department: "Procurement".to_string(),
        created_by: "ana".to_string(),
        requires_admin_approval,
        steps: vec![
            step("request", "Submit vendor request", &[]),
            legal,
            finance,
            step("enable", "Enable vendor in ERP", &["legal", "finance"]),
        ],
    }
}
