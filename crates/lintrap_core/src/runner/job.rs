//! Jobs and failure-isolated job execution.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, bounded};
use thiserror::Error;
use tracing::{debug, warn};

use crate::document::Document;
use crate::formatters::Formatter;
use crate::lint::{Lint, LintException};
use crate::linter::{BoxError, LinterInstance};
use crate::location::SourceRange;
use crate::severity::Severity;

/// One linter run against one file, as reported to formatters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    path: PathBuf,
    linter: String,
}

impl Job {
    pub fn new(path: impl Into<PathBuf>, linter: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            linter: linter.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical name of the linter.
    pub fn linter(&self) -> &str {
        &self.linter
    }
}

/// A job together with the linter instance that executes it.
///
/// Owned so it can be moved onto a worker thread.
pub(crate) struct ScheduledJob {
    pub(crate) job: Job,
    pub(crate) instance: LinterInstance,
}

/// Why a job produced no regular result.
#[derive(Debug, Error)]
pub enum JobFailure {
    #[error("{0}")]
    Failed(BoxError),

    #[error("linter panicked: {0}")]
    Panicked(String),

    #[error("timed out after {} seconds", .0.as_secs_f64())]
    TimedOut(Duration),

    #[error("worker thread exited without reporting a result")]
    Disconnected,
}

/// Settings that apply to every job of a run.
#[derive(Debug, Clone)]
pub(crate) struct JobSettings {
    pub(crate) exception_severity: Severity,
    pub(crate) timeout: Option<Duration>,
}

/// Runs `scheduled` against `document`, turning any failure into a single
/// lint at 1:1. Formatter callbacks wrap the job either way.
pub(crate) fn execute(
    scheduled: ScheduledJob,
    document: &Arc<Document>,
    settings: &JobSettings,
    formatter: &dyn Formatter,
) -> Vec<Lint> {
    let ScheduledJob { job, instance } = scheduled;
    formatter.job_started(&job);
    debug!("Running {} on {}", job.linter(), job.path().display());

    let lints = match run_instance(instance, document, settings.timeout) {
        Ok(lints) => lints,
        Err(failure) => {
            warn!(
                "Linter {} failed on {}: {}",
                job.linter(),
                job.path().display(),
                failure
            );
            vec![failure_lint(&job, failure, settings)]
        }
    };

    formatter.job_finished(&job, &lints);
    lints
}

fn run_instance(
    mut instance: LinterInstance,
    document: &Arc<Document>,
    timeout: Option<Duration>,
) -> Result<Vec<Lint>, JobFailure> {
    let Some(timeout) = timeout else {
        return run_guarded(&mut instance, document);
    };

    let (sender, receiver) = bounded(1);
    let document = Arc::clone(document);
    thread::spawn(move || {
        let result = run_guarded(&mut instance, &document);
        // The receiver is gone when the job already timed out.
        let _ = sender.send(result);
    });

    match receiver.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(JobFailure::TimedOut(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(JobFailure::Disconnected),
    }
}

fn run_guarded(instance: &mut LinterInstance, document: &Document) -> Result<Vec<Lint>, JobFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| instance.run(document))) {
        Ok(Ok(lints)) => Ok(lints),
        Ok(Err(err)) => Err(JobFailure::Failed(err)),
        Err(payload) => Err(JobFailure::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn failure_lint(job: &Job, failure: JobFailure, settings: &JobSettings) -> Lint {
    let message = format!(
        "Error occurred while linting {}: {}",
        job.path().display(),
        failure
    );
    let exception: LintException = match failure {
        JobFailure::Failed(err) => Arc::from(err),
        other => Arc::new(other),
    };

    Lint::new(
        job.path(),
        SourceRange::at(1, 1),
        message,
        settings.exception_severity.clone(),
    )
    .with_linter(job.linter())
    .with_exception(exception)
}
