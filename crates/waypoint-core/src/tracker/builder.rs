//! Builder for creating and configuring Tracker instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use tokio::task;

use super::Tracker;
use crate::{
    db::Database,
    engine::DEFAULT_ADMIN_RECIPIENT,
    error::{Result, TrackerError},
    notify::{LogNotifier, Notifier},
};

/// Default period of the background overdue sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Builder for creating and configuring Tracker instances.
#[derive(Clone)]
pub struct TrackerBuilder {
    database_path: Option<PathBuf>,
    notifier: Option<Arc<dyn Notifier>>,
    admin_recipient: Option<String>,
    sweep_interval: Duration,
}

impl TrackerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            notifier: None,
            admin_recipient: None,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/waypoint/waypoint.db` or
    /// `~/.local/share/waypoint/waypoint.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the notification sink. Defaults to [`LogNotifier`].
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets who receives administrative notifications. Defaults to
    /// `admin`.
    pub fn with_admin_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.admin_recipient = Some(recipient.into());
        self
    }

    /// Sets the period of the background overdue sweep.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Builds the configured tracker instance.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::FileSystem` if the database path is invalid
    /// Returns `TrackerError::Database` if database initialization fails
    /// Returns `TrackerError::Configuration` for a zero sweep interval or a
    /// blank admin recipient
    pub async fn build(self) -> Result<Tracker> {
        if self.sweep_interval.is_zero() {
            return Err(TrackerError::Configuration {
                message: "sweep interval must be greater than zero".to_string(),
            });
        }

        let admin_recipient = self
            .admin_recipient
            .unwrap_or_else(|| DEFAULT_ADMIN_RECIPIENT.to_string());
        if admin_recipient.trim().is_empty() {
            return Err(TrackerError::Configuration {
                message: "admin recipient must not be empty".to_string(),
            });
        }

        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TrackerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), TrackerError>(())
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        log::debug!("tracker database at {}", db_path.display());

        Ok(Tracker::new(
            db_path,
            self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            Arc::from(admin_recipient.trim()),
            self.sweep_interval,
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("waypoint")
            .place_data_file("waypoint.db")
            .map_err(|e| TrackerError::XdgDirectory(e.to_string()))
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
