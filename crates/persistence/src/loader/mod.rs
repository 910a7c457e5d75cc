//! Schema data loader.
//!
//! Restores the catalog from a directory of exported table scripts, one file
//! per table, executed in dependency order. A file that is missing or cannot
//! be read is skipped with a warning; a file whose SQL fails aborts the run,
//! leaving the files before it applied.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "postgres")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use medisae_persistence::backends::postgres::PostgresBackend;
//! use medisae_persistence::loader::DataLoader;
//!
//! let backend = PostgresBackend::from_env().await?;
//! let report = DataLoader::new("./exported_tables").run(&backend).await?;
//! println!("{} executed, {} skipped", report.executed.len(), report.skipped.len());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{LoadError, StorageResult};

/// Table scripts in foreign-key dependency order.
pub const DEFAULT_EXECUTION_ORDER: [&str; 8] = [
    "active_ingredient.sql",
    "conditions.sql",
    "cyptochrome.sql",
    "manufacturer.sql",
    "pharmaceutic_form.sql",
    "subforms.sql",
    "effets_indesirables.sql",
    "medicaments.sql",
];

/// Executes the contents of one script file.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Runs every statement in `sql`.
    async fn execute_script(&self, sql: &str) -> StorageResult<()>;
}

/// Why a file was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file does not exist.
    NotFound,
    /// The file exists but could not be read.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "file not found"),
            SkipReason::Unreadable(e) => write!(f, "failed to read file: {e}"),
        }
    }
}

/// A skipped file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// File name as listed in the execution order.
    pub file: String,
    /// Reason.
    pub reason: SkipReason,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Files executed, in order.
    pub executed: Vec<String>,
    /// Files skipped, in order.
    pub skipped: Vec<SkippedFile>,
}

/// Runs table scripts from a directory.
#[derive(Debug, Clone)]
pub struct DataLoader {
    dir: PathBuf,
    order: Vec<String>,
}

impl DataLoader {
    /// Creates a loader over `dir` with the default execution order.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            order: DEFAULT_EXECUTION_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replaces the execution order.
    pub fn with_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the execution order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Runs every script in order.
    pub async fn run<E>(&self, executor: &E) -> StorageResult<LoadReport>
    where
        E: ScriptExecutor + ?Sized,
    {
        if let Ok(false) = tokio::fs::try_exists(&self.dir).await {
            warn!(
                dir = %self.dir.display(),
                "Data directory not found, every script will be skipped"
            );
        }

        let mut report = LoadReport::default();

        for file in &self.order {
            let path = self.dir.join(file);

            let sql = match tokio::fs::read_to_string(&path).await {
                Ok(sql) => sql,
                Err(e) => {
                    let reason = if e.kind() == std::io::ErrorKind::NotFound {
                        SkipReason::NotFound
                    } else {
                        SkipReason::Unreadable(e.to_string())
                    };
                    warn!(file = %file, reason = %reason, "Skipping table script");
                    report.skipped.push(SkippedFile {
                        file: file.clone(),
                        reason,
                    });
                    continue;
                }
            };

            executor
                .execute_script(&sql)
                .await
                .map_err(|e| LoadError::Execution {
                    file: file.clone(),
                    message: e.to_string(),
                })?;

            info!(file = %file, "Successfully executed");
            report.executed.push(file.clone());
        }

        info!(
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            "Data load finished"
        );

        Ok(report)
    }
}
