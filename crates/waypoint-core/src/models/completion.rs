//! Evidence supplied when completing a step.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::StepRequirements;
use crate::error::{Result, TrackerError};

/// One piece of evidence accompanying a step completion.
///
/// Serialized with an internal `kind` tag, e.g.
/// `{"kind": "checkbox_confirmation", "confirmed": true}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    /// Files proving the work was done
    UploadProof { attachments: Vec<String> },
    /// The completion checkbox
    CheckboxConfirmation { confirmed: bool },
    /// A written account of how the step was completed
    TextConfirmation { notes: String },
    /// No evidence
    None,
}

/// Evidence collapsed into the fields stored on a completed step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionEvidence {
    pub attachments: Vec<String>,
    pub notes: Option<String>,
    pub confirmed: bool,
}

impl CompletionEvidence {
    /// Validates `evidence` against `requirements` and merges it.
    ///
    /// Evidence beyond what is required is accepted and recorded.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Validation` naming the first missing
    /// requirement.
    pub fn collect(requirements: &StepRequirements, evidence: &[Evidence]) -> Result<Self> {
        let mut merged = Self::default();

        for item in evidence {
            match item {
                Evidence::UploadProof { attachments } => merged.attachments.extend(
                    attachments
                        .iter()
                        .map(|a| a.trim())
                        .filter(|a| !a.is_empty())
                        .map(String::from),
                ),
                Evidence::CheckboxConfirmation { confirmed } => {
                    merged.confirmed |= *confirmed;
                }
                Evidence::TextConfirmation { notes } => {
                    let notes = notes.trim();
                    if !notes.is_empty() {
                        merged.notes = Some(match merged.notes.take() {
                            Some(existing) => format!("{existing}\n{notes}"),
                            None => notes.to_string(),
                        });
                    }
                }
                Evidence::None => {}
            }
        }

        if requirements.upload && merged.attachments.is_empty() {
            return Err(TrackerError::validation("evidence")
                .with_reason("this step requires at least one uploaded attachment"));
        }
        if requirements.checkbox && !merged.confirmed {
            return Err(TrackerError::validation("evidence")
                .with_reason("this step requires the completion checkbox to be confirmed"));
        }
        if requirements.text_confirmation && merged.notes.is_none() {
            return Err(TrackerError::validation("evidence")
                .with_reason("this step requires a written confirmation"));
        }

        Ok(merged)
    }
}
