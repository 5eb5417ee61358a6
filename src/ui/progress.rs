use crate::patcher::PatchProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} files {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Patching files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Run `f` with progress bars hidden so its output is not overdrawn.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_file_progress(pb: &ProgressBar, progress: &PatchProgress) {
    pb.set_position(progress.files_processed as u64);

    if let Some(ref current_file) = progress.current_file {
        let display_name = if current_file.len() > 40 {
            let mut start = current_file.len() - 37;
            while !current_file.is_char_boundary(start) {
                start += 1;
            }
            format!("...{}", &current_file[start..])
        } else {
            current_file.clone()
        };

        pb.set_message(format!("{} ({} modified)", display_name, progress.files_modified));
    }
}

pub fn finish_progress(pb: &ProgressBar, progress: &PatchProgress) {
    pb.finish_with_message(format!(
        "Processed {} files, {} modified, {} failed",
        progress.files_processed,
        progress.files_modified,
        progress.errors.len()
    ));
}
