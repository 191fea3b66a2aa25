//! Lint runs.
//!
//! A run loads the documents, pairs each document with the linters that apply
//! to it, executes those jobs (sequentially or on a worker pool) and collects
//! everything into a [`Report`].

mod job;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::Application;
use crate::config::Configuration;
use crate::document::Document;
use crate::document_loader::DocumentLoader;
use crate::error::LintrapError;
use crate::formatters::Formatter;
use crate::lint::Lint;
use crate::options::{Concurrency, RunOptions};
use crate::report::{Report, SeverityTable};
use crate::selector::LinterSelector;
use crate::severity::Severity;

pub use job::{Job, JobFailure};
use job::{JobSettings, ScheduledJob, execute};

/// Read-only documents shared by all jobs of a run, keyed by path.
type DocumentStore = HashMap<PathBuf, Arc<Document>>;

/// Runs the enabled linters against the selected files.
pub struct Runner<'a> {
    application: &'a Application,
    config: &'a Configuration,
    formatter: &'a dyn Formatter,
}

impl<'a> Runner<'a> {
    pub fn new(
        application: &'a Application,
        config: &'a Configuration,
        formatter: &'a dyn Formatter,
    ) -> Self {
        Self {
            application,
            config,
            formatter,
        }
    }

    /// Executes a run and returns its report.
    ///
    /// Configuration and usage problems abort the run before any file is
    /// scanned. Linters that fail and files that cannot be parsed are
    /// reported as lints instead.
    pub fn run(&self, options: &RunOptions) -> Result<Report, LintrapError> {
        let selector = LinterSelector::new(self.application.linters(), self.config, options)?;
        let settings = JobSettings {
            exception_severity: self
                .config
                .severity("linter_exception_severity", Severity::Error),
            timeout: linter_timeout(self.config)?,
        };

        let loaded = DocumentLoader::new(self.application, self.config, self.formatter)
            .load(options)?;

        let mut store = DocumentStore::new();
        let mut inspected = Vec::with_capacity(loaded.documents.len());
        for document in &loaded.documents {
            let path = document.path().map(Path::to_path_buf).unwrap_or_default();
            inspected.push(path.clone());
            store.insert(path, Arc::clone(document));
        }

        let jobs = determine_jobs(&selector, &inspected)?;
        info!(
            "Running {} jobs on {} documents",
            jobs.len(),
            inspected.len()
        );

        let mut lints = match options.concurrency {
            Some(concurrency) => self.run_parallel(jobs, &store, &settings, concurrency)?,
            None => jobs
                .into_iter()
                .flat_map(|job| run_job(job, &store, &settings, self.formatter))
                .collect(),
        };
        lints.extend(loaded.parse_lints);

        let report = Report::new(lints, inspected, SeverityTable::from_config(self.config));
        self.formatter.finished(&report);
        Ok(report)
    }

    fn run_parallel(
        &self,
        jobs: Vec<ScheduledJob>,
        store: &DocumentStore,
        settings: &JobSettings,
        concurrency: Concurrency,
    ) -> Result<Vec<Lint>, LintrapError> {
        let workers = concurrency.worker_count();
        debug!("Starting {} workers", workers);

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("lintrap-worker-{}", index))
            .build()
            .map_err(|e| LintrapError::internal(format!("Failed to start worker pool: {}", e)))?;

        let formatter = self.formatter;
        let lints = pool.install(|| {
            jobs.into_par_iter()
                .flat_map_iter(|job| run_job(job, store, settings, formatter))
                .collect()
        });
        Ok(lints)
    }
}

fn determine_jobs(
    selector: &LinterSelector,
    paths: &[PathBuf],
) -> Result<Vec<ScheduledJob>, LintrapError> {
    let mut jobs = Vec::new();
    for path in paths {
        for instance in selector.linters_for_file(path)? {
            jobs.push(ScheduledJob {
                job: Job::new(path.clone(), instance.name()),
                instance,
            });
        }
    }
    Ok(jobs)
}

fn run_job(
    job: ScheduledJob,
    store: &DocumentStore,
    settings: &JobSettings,
    formatter: &dyn Formatter,
) -> Vec<Lint> {
    match store.get(job.job.path()) {
        Some(document) => execute(job, document, settings, formatter),
        None => {
            warn!("No document loaded for {}", job.job.path().display());
            Vec::new()
        }
    }
}

/// Reads the optional `linter_timeout` (seconds).
fn linter_timeout(config: &Configuration) -> Result<Option<Duration>, LintrapError> {
    match config.get("linter_timeout") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
            .map(|seconds| Some(Duration::from_secs_f64(seconds)))
            .ok_or_else(|| {
                LintrapError::linter_config(format!(
                    "`linter_timeout` must be a positive number of seconds, but was {}",
                    value
                ))
            }),
    }
}
