use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a plain-output Command bound to a database and
/// an actor
fn wp_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wp").expect("Failed to find wp binary");
    cmd.env_remove("WAYPOINT_ACTOR")
        .env_remove("WAYPOINT_ADMIN")
        .arg("--no-color")
        .arg("--database-file")
        .arg(db_path)
        .arg("--actor")
        .arg("ana");
    cmd
}

/// Writes a three-step onboarding definition: offer -> paperwork -> laptop,
/// with paperwork due 24h after the offer is signed.
fn write_steps_file(dir: &Path) -> String {
    let path = dir.join("steps.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "offer", "title": "Sign offer letter", "assignee": "HR Manager",
             "requirements": {"upload": true}},
            {"id": "paperwork", "title": "Complete paperwork", "assignee": "New Hire",
             "depends_on": ["offer"],
             "relative_due_date": {"step_id": "offer", "hours": 24}},
            {"id": "laptop", "title": "Hand over laptop", "assignee": "IT",
             "depends_on": ["paperwork"]}
        ]"#,
    )
    .expect("Failed to write steps file");
    path.to_str().unwrap().to_string()
}

fn create_onboarding(db_path: &Path, steps_file: &str) -> String {
    let output = wp_cmd(db_path)
        .args([
            "process",
            "create",
            "Employee Onboarding",
            "--department",
            "HR",
            "--steps",
            steps_file,
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    extract_id_from_output(&String::from_utf8(output).expect("Invalid UTF-8"))
}

#[test]
fn test_cli_create_process_with_steps() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let steps_file = write_steps_file(temp_dir.path());

    wp_cmd(&db_path)
        .args([
            "process",
            "create",
            "Employee Onboarding",
            "--department",
            "HR",
            "--description",
            "Checklist for new hires",
            "--steps",
            &steps_file,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created process with ID: 1"))
        .stdout(predicate::str::contains("# 1. Employee Onboarding"))
        .stdout(predicate::str::contains("- Status: draft"))
        .stdout(predicate::str::contains("Checklist for new hires"))
        .stdout(predicate::str::contains("### paperwork. Complete paperwork"))
        .stdout(predicate::str::contains("- Due 24h after 'offer' completes"));
}

#[test]
fn test_cli_create_requires_actor() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    Command::cargo_bin("wp")
        .expect("Failed to find wp binary")
        .env_remove("WAYPOINT_ACTOR")
        .args(["--no-color", "--database-file"])
        .arg(&db_path)
        .args(["process", "create", "Audit", "--department", "Finance"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--actor"));
}

#[test]
fn test_cli_actor_from_environment() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    Command::cargo_bin("wp")
        .expect("Failed to find wp binary")
        .env("WAYPOINT_ACTOR", "lee")
        .args(["--no-color", "--database-file"])
        .arg(&db_path)
        .args(["process", "create", "Audit", "--department", "Finance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Created by: lee"));
}

#[test]
fn test_cli_rejects_dependency_cycle() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let steps = temp_dir.path().join("cycle.json");
    std::fs::write(
        &steps,
        r#"[{"id": "a", "title": "A", "assignee": "x", "depends_on": ["b"]},
            {"id": "b", "title": "B", "assignee": "x", "depends_on": ["a"]}]"#,
    )
    .unwrap();

    wp_cmd(&db_path)
        .args(["process", "create", "Loop", "--department", "Ops", "--steps"])
        .arg(&steps)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency cycle"));
}

#[test]
fn test_cli_list_empty_processes() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["process", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No processes found."));
}

#[test]
fn test_cli_list_rejects_unknown_status() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["process", "list", "--status", "finished"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid process status"));
}

#[test]
#[allow(clippy::too_many_lines)]
fn test_cli_complete_workflow() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let steps_file = write_steps_file(temp_dir.path());
    let id = create_onboarding(&db_path, &steps_file);

    // Completing a step of a draft is refused
    wp_cmd(&db_path)
        .args(["step", "complete", &id, "offer", "--attach", "offer.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not active"));

    wp_cmd(&db_path)
        .args(["process", "activate", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activated process"));

    // Bare invocation lists active processes
    wp_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Processes (active)"))
        .stdout(predicate::str::contains("Employee Onboarding (ID: 1) [active] 0%"));

    // The offer step requires an upload
    wp_cmd(&db_path)
        .args(["step", "complete", &id, "offer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("uploaded attachment"));

    wp_cmd(&db_path)
        .args(["step", "complete", &id, "offer", "--attach", "offer.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed step 'offer'"))
        .stdout(predicate::str::contains("33% done"))
        .stdout(predicate::str::contains("- Attachments: offer.pdf"));

    wp_cmd(&db_path)
        .args(["tasks", "--status", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Complete paperwork (➤ In Progress)"))
        .stdout(predicate::str::contains("- **Due**:"))
        .stdout(predicate::str::contains("Hand over laptop").not());

    // Second completion of the same step is refused
    wp_cmd(&db_path)
        .args(["step", "complete", &id, "offer", "--attach", "again.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already completed"));

    for step in ["paperwork", "laptop"] {
        wp_cmd(&db_path)
            .args(["step", "complete", &id, step])
            .assert()
            .success();
    }

    wp_cmd(&db_path)
        .args(["process", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Status: completed"))
        .stdout(predicate::str::contains("- Progress: 100% (3/3 steps)"));

    wp_cmd(&db_path)
        .args(["process", "archive", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived process 1"));

    wp_cmd(&db_path)
        .args(["process", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No processes found."));

    wp_cmd(&db_path)
        .args(["process", "list", "--status", "archived"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Employee Onboarding"));
}

#[test]
fn test_cli_approval_flow() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args([
            "process",
            "create",
            "Vendor Payment",
            "--department",
            "Finance",
            "--requires-approval",
        ])
        .assert()
        .success();
    wp_cmd(&db_path)
        .args(["step", "add", "1", "Verify invoice", "--assignee", "Clerk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added step 'step-1'"));
    wp_cmd(&db_path)
        .args(["process", "activate", "1"])
        .assert()
        .success();

    wp_cmd(&db_path)
        .args(["process", "approve", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0 of 1 steps are completed"));

    wp_cmd(&db_path)
        .args(["step", "complete", "1", "step-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: active"));

    wp_cmd(&db_path)
        .args(["process", "approve", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("it is now completed"));

    wp_cmd(&db_path)
        .args(["process", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Approved by ana"));
}

#[test]
fn test_cli_edit_draft_steps() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["process", "create", "Audit", "--department", "Finance"])
        .assert()
        .success();
    wp_cmd(&db_path)
        .args(["step", "add", "1", "Collect receipts", "--assignee", "Clerk", "--id", "collect"])
        .assert()
        .success();
    wp_cmd(&db_path)
        .args([
            "step",
            "add",
            "1",
            "Review receipts",
            "--assignee",
            "Auditor",
            "--id",
            "review",
            "--depends-on",
            "collect",
            "--due-after",
            "collect:48",
            "--requires-text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Due 48h after 'collect' completes"))
        .stdout(predicate::str::contains("- Requires: text confirmation"));

    // A relative due date must point at a dependency
    wp_cmd(&db_path)
        .args(["step", "add", "1", "Sign off", "--assignee", "CFO", "--due-after", "review:0"])
        .assert()
        .failure();

    wp_cmd(&db_path)
        .args(["step", "remove", "1", "collect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depends on it"));

    wp_cmd(&db_path)
        .args(["step", "swap", "1", "collect", "review"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)### review\..*### collect\.").unwrap());

    wp_cmd(&db_path)
        .args(["process", "update", "1", "--name", "Annual Audit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes made:"))
        .stdout(predicate::str::contains("- name"))
        .stdout(predicate::str::contains("# 1. Annual Audit"));
}

#[test]
fn test_cli_templates() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let steps_file = write_steps_file(temp_dir.path());
    let id = create_onboarding(&db_path, &steps_file);

    wp_cmd(&db_path)
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found."));

    wp_cmd(&db_path)
        .args(["process", "template", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved template with ID: 1"))
        .stdout(predicate::str::contains("Employee Onboarding Template"));

    wp_cmd(&db_path)
        .args(["template", "use", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created process with ID: 2"))
        .stdout(predicate::str::contains("# 2. Employee Onboarding"));

    wp_cmd(&db_path)
        .args(["template", "use", "1", "--name", "Contractor Onboarding"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# 3. Contractor Onboarding"));

    wp_cmd(&db_path)
        .args(["template", "show", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template with ID 9 not found"));
}

#[test]
fn test_cli_dashboard_and_sweep() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("No overdue steps found."));

    let steps_file = write_steps_file(temp_dir.path());
    let id = create_onboarding(&db_path, &steps_file);
    wp_cmd(&db_path)
        .args(["process", "activate", &id])
        .assert()
        .success();

    wp_cmd(&db_path)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("| Active | Completed | Templates | Overdue steps |"))
        .stdout(predicate::str::contains("| 1 | 0 | 0 | 0 |"));
}

#[test]
fn test_cli_show_missing_process() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["process", "show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Process with ID 42 not found"));
}

#[test]
fn test_cli_rejects_zero_sweep_interval() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["watch", "--sweep-interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sweep interval"));
}

/// Extracts the numeric ID from a "# <id>. <name>" heading
fn extract_id_from_output(output: &str) -> String {
    for line in output.lines() {
        if let Some(stripped) = line.strip_prefix("# ") {
            if let Some((id, _)) = stripped.split_once('.') {
                if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
                    return id.to_string();
                }
            }
        }
    }
    panic!("No ID found in output: {output}");
}
