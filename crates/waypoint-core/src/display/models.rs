//! Display implementations for domain models.
//!
//! All output is markdown: the terminal renderer styles it, MCP clients get
//! it verbatim.

use std::fmt;

use super::datetime::{DueLabel, LocalDateTime};
use crate::{
    models::{
        DashboardStats, Process, ProcessStatus, ProcessSummary, Step, StepStatus, TaskEntry,
        Template,
    },
    notify::Notification,
};

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Department: {}", self.department)?;
        writeln!(f, "- Created by: {}", self.created_by)?;
        writeln!(
            f,
            "- Progress: {}% ({}/{} steps)",
            self.progress(),
            self.completed_steps(),
            self.steps.len()
        )?;
        if self.requires_admin_approval {
            match (&self.approved_by, &self.approved_at) {
                (Some(by), Some(at)) => {
                    writeln!(f, "- Approved by {by} on {}", LocalDateTime(at))?
                }
                _ => writeln!(f, "- Requires admin approval")?,
            }
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this process.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            let current = self.current_step().map(|s| s.id.as_str());
            for step in &self.steps {
                if current == Some(step.id.as_str()) && self.status == ProcessStatus::Active {
                    writeln!(f, "> current step")?;
                    writeln!(f)?;
                }
                write!(f, "{step}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.id,
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        writeln!(f, "- Assignee: {}", self.assignee)?;
        if !self.depends_on.is_empty() {
            writeln!(f, "- Depends on: {}", self.depends_on.join(", "))?;
        }
        if let Some(rule) = &self.relative_due_date {
            writeln!(f, "- Due {}h after '{}' completes", rule.hours, rule.step_id)?;
        }
        if let Some(due) = &self.due_date {
            if self.status.is_open() {
                writeln!(f, "- Due: {}", DueLabel::now(due))?;
            } else {
                writeln!(f, "- Due: {}", LocalDateTime(due))?;
            }
        }
        if !self.requirements.is_empty() {
            writeln!(f, "- Requires: {}", self.requirements.labels().join(", "))?;
        }

        if let Some(completion) = &self.completion {
            writeln!(
                f,
                "- Completed by {} on {}",
                completion.completed_by,
                LocalDateTime(&completion.completed_at)
            )?;
            if !completion.attachments.is_empty() {
                writeln!(f, "- Attachments: {}", completion.attachments.join(", "))?;
            }
            if let Some(notes) = &completion.notes {
                writeln!(f)?;
                writeln!(f, "#### Notes")?;
                writeln!(f)?;
                writeln!(f, "{notes}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for ProcessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} (ID: {}) [{}] {}%",
            self.name, self.id, self.status, self.progress
        )?;
        writeln!(f)?;
        writeln!(f, "- **Department**: {}", self.department)?;
        writeln!(
            f,
            "- **Steps**: {}/{} completed",
            self.completed_steps, self.total_steps
        )?;
        if self.overdue_steps > 0 {
            writeln!(f, "- **Overdue**: {}", self.overdue_steps)?;
        }
        if self.requires_admin_approval {
            writeln!(f, "- **Approval**: required")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Template {}. {}", self.id, self.name)?;
        writeln!(f)?;
        writeln!(f, "- Department: {}", self.department)?;
        writeln!(f, "- Saved by: {}", self.created_by)?;
        if self.requires_admin_approval {
            writeln!(f, "- Requires admin approval")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TaskEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} ({})",
            self.step.title,
            self.step.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Process**: {} (ID: {}, step '{}')",
            self.process_name, self.process_id, self.step.id
        )?;
        writeln!(f, "- **Assignee**: {}", self.step.assignee)?;
        if let Some(due) = &self.step.due_date {
            if self.step.status.is_open() {
                writeln!(f, "- **Due**: {}", DueLabel::now(due))?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Dashboard")?;
        writeln!(f)?;
        writeln!(f, "| Active | Completed | Templates | Overdue steps |")?;
        writeln!(f, "|---|---|---|---|")?;
        writeln!(
            f,
            "| {} | {} | {} | {} |",
            self.active_processes, self.completed_processes, self.templates, self.overdue_steps
        )
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.recipient, self.subject, self.body)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::models::{RelativeDueDate, StepCompletion, StepRequirements};

    use super::*;

    #[test]
    fn test_step_display_lists_rules_and_completion() {
        let mut step = Step::new("review", "Review contract", "Legal");
        step.depends_on = vec!["draft".into()];
        step.relative_due_date = Some(RelativeDueDate {
            step_id: "draft".into(),
            hours: 48,
        });
        step.requirements = StepRequirements {
            upload: true,
            checkbox: false,
            text_confirmation: true,
        };
        step.status = StepStatus::Completed;
        step.completion = Some(StepCompletion {
            completed_at: Timestamp::UNIX_EPOCH,
            completed_by: "lee".into(),
            attachments: vec!["signed.pdf".into()],
            notes: Some("Signed by both parties".into()),
            confirmed: false,
        });

        let output = step.to_string();
        assert!(output.contains("### review. Review contract (✓ Completed)"));
        assert!(output.contains("- Depends on: draft"));
        assert!(output.contains("- Due 48h after 'draft' completes"));
        assert!(output.contains("- Requires: upload, text confirmation"));
        assert!(output.contains("- Completed by lee"));
        assert!(output.contains("- Attachments: signed.pdf"));
        assert!(output.contains("Signed by both parties"));
    }

    #[test]
    fn test_dashboard_display() {
        let stats = DashboardStats {
            active_processes: 2,
            completed_processes: 5,
            templates: 1,
            overdue_steps: 3,
        };
        assert!(stats.to_string().contains("| 2 | 5 | 1 | 3 |"));
    }
}
