//! One-line status messages for operations without a resource to show.

use std::fmt;

/// A success or failure message, e.g. the outcome of an overdue sweep.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// Summarizes an overdue sweep.
    pub fn overdue_sweep(flagged: usize) -> Self {
        match flagged {
            0 => Self::success("No overdue steps found."),
            1 => Self::success("Flagged 1 step as overdue."),
            n => Self::success(format!("Flagged {n} steps as overdue.")),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}
