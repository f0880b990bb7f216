//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper prints its items one after another, or a fixed message when
//! empty.

use std::{fmt, ops::Index};

use crate::models::{ProcessSummary, TaskEntry, Template};

macro_rules! collection {
    ($(#[$meta:meta])* $name:ident($item:ty), $empty:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub Vec<$item>);

        impl $name {
            /// Check if the collection is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Number of items in the collection.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    return writeln!(f, $empty);
                }
                for item in &self.0 {
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    };
}

collection!(
    /// Process summaries as shown by `process list`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jiff::Timestamp;
    /// use waypoint_core::{
    ///     display::ProcessSummaries,
    ///     models::{ProcessStatus, ProcessSummary},
    /// };
    ///
    /// let summary = ProcessSummary {
    ///     id: 3,
    ///     name: "Vendor Onboarding".to_string(),
    ///     department: "Procurement".to_string(),
    ///     status: ProcessStatus::Active,
    ///     requires_admin_approval: false,
    ///     created_at: Timestamp::now(),
    ///     total_steps: 4,
    ///     completed_steps: 1,
    ///     overdue_steps: 0,
    ///     progress: 25,
    /// };
    ///
    /// let output = ProcessSummaries(vec![summary]).to_string();
    /// assert!(output.contains("Vendor Onboarding (ID: 3) [active] 25%"));
    /// assert_eq!(ProcessSummaries(vec![]).to_string(), "No processes found.\n");
    /// ```
    ProcessSummaries(ProcessSummary),
    "No processes found."
);

collection!(
    /// Steps of active processes as shown on the task board.
    Tasks(TaskEntry),
    "No tasks found."
);

collection!(
    /// Saved templates.
    Templates(Template),
    "No templates found."
);
