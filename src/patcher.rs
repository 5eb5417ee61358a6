use crate::buffer::TextBuffer;
use crate::error::{PatchError, Result};
use crate::fixes::FixSet;
use crate::rule::{Rule, RuleOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One target file and the rules to run against it.
#[derive(Debug, Clone)]
pub struct PatchJob {
    pub path: PathBuf,
    pub fix_sets: Vec<String>,
    pub rules: Vec<Rule>,
    pub notes: Vec<String>,
}

impl PatchJob {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            fix_sets: Vec::new(),
            rules: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_fix_set(mut self, fix_set: &FixSet) -> Self {
        self.push_fix_set(fix_set);
        self
    }

    pub fn push_fix_set(&mut self, fix_set: &FixSet) {
        self.fix_sets.push(fix_set.name().to_string());
        self.rules.extend(fix_set.rules().iter().cloned());
        self.notes.extend(fix_set.notes().iter().cloned());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReport {
    pub path: String,
    pub fix_sets: Vec<String>,
    pub rules: Vec<RuleOutcome>,
    pub notes: Vec<String>,
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub modified: bool,
    pub written: bool,
    pub dry_run: bool,
    pub duration: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl PatchReport {
    pub fn total_replacements(&self) -> usize {
        self.rules.iter().map(|r| r.replacements).sum()
    }

    /// Rules that found nothing to replace.
    pub fn unmatched_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.rules.iter().filter(|r| !r.matched())
    }
}

#[derive(Debug, Clone)]
pub struct PatchProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub files_modified: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl PatchProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            files_modified: 0,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String, modified: bool) {
        self.files_processed += 1;
        if modified {
            self.files_modified += 1;
        }
        self.current_file = Some(filename);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.files_processed += 1;
        self.errors.push(error.into());
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchSummary {
    pub reports: Vec<PatchReport>,
    pub errors: Vec<String>,
    pub files_modified: usize,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl PatchSummary {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Patcher {
    dry_run: bool,
    atomic: bool,
    skip_unchanged: bool,
    capture_diff: bool,
}

impl Patcher {
    pub fn new() -> Self {
        Self {
            dry_run: false,
            atomic: false,
            skip_unchanged: true,
            capture_diff: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_atomic_write(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn with_skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }

    pub fn with_diff(mut self, capture: bool) -> Self {
        self.capture_diff = capture;
        self
    }

    /// Read `path`, run `rules` in order and write the result back.
    pub fn patch_file(&self, path: &Path, rules: &[Rule]) -> Result<PatchReport> {
        let start = Instant::now();
        let mut buffer = TextBuffer::read(path)?;
        let outcomes = buffer.apply(rules);
        let modified = buffer.is_modified();

        let should_write = !self.dry_run && (modified || !self.skip_unchanged);
        if should_write {
            if self.atomic {
                buffer.write_atomic()?;
            } else {
                buffer.write()?;
            }
        }

        let diff = if self.capture_diff && modified {
            Some(buffer.unified_diff())
        } else {
            None
        };

        Ok(PatchReport {
            path: path.display().to_string(),
            fix_sets: Vec::new(),
            rules: outcomes,
            notes: Vec::new(),
            bytes_before: buffer.original().len() as u64,
            bytes_after: buffer.content().len() as u64,
            modified,
            written: should_write,
            dry_run: self.dry_run,
            duration: start.elapsed(),
            diff,
        })
    }

    pub fn run_job(&self, job: &PatchJob) -> Result<PatchReport> {
        let mut report = self.patch_file(&job.path, &job.rules)?;
        report.fix_sets = job.fix_sets.clone();
        report.notes = job.notes.clone();
        Ok(report)
    }

    /// Run every job, continuing past failures and collecting them.
    pub fn run_jobs<F>(&self, jobs: &[PatchJob], mut on_report: F) -> PatchSummary
    where
        F: FnMut(&PatchJob, &PatchProgress, std::result::Result<&PatchReport, &PatchError>),
    {
        let started_at = Utc::now();
        let mut progress = PatchProgress::new(jobs.len());
        let mut reports = Vec::with_capacity(jobs.len());

        for job in jobs {
            match self.run_job(job) {
                Ok(report) => {
                    progress.update_file(report.path.clone(), report.modified);
                    on_report(job, &progress, Ok(&report));
                    reports.push(report);
                }
                Err(e) => {
                    progress.add_error(format!("{}: {}", job.path.display(), e));
                    on_report(job, &progress, Err(&e));
                }
            }
        }

        PatchSummary {
            reports,
            errors: progress.errors.clone(),
            files_modified: progress.files_modified,
            started_at,
            duration: progress.elapsed(),
        }
    }
}

impl Default for Patcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Patch one file with the given fix set.
pub fn patch_file_with<P: AsRef<Path>>(path: P, fix_set: &FixSet) -> Result<PatchReport> {
    let job = PatchJob::new(path.as_ref()).with_fix_set(fix_set);
    Patcher::new().run_job(&job)
}
