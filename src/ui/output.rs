use crate::error::{PatchError, UserFriendlyError};
use crate::fixes::FixSet;
use crate::patcher::{PatchReport, PatchSummary};
use console::{style, Emoji, Term};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static WRENCH: Emoji = Emoji("🔧 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn verbose_level(&self) -> u8 {
        self.verbose_level
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", WRENCH, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &PatchError) {
        let user_message = error.user_message();
        self.error(&user_message);
        self.print_suggestion(error);
    }

    /// Failure line for one target, in the scripts' `Error processing` form.
    pub fn print_patch_failure(&self, path: &Path, error: &PatchError) {
        self.error(&format!(
            "Error processing {}: {}",
            path.display(),
            error.user_message()
        ));
        self.print_suggestion(error);
    }

    fn print_suggestion(&self, error: &PatchError) {
        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Reporting
    pub fn print_patch_report(&self, report: &PatchReport) {
        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => {
                let mut value = serde_json::to_value(report).unwrap_or_default();
                if let Some(object) = value.as_object_mut() {
                    object.insert("type".to_string(), serde_json::json!("report"));
                }
                self.print_json_object(&value);
            }
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    pub fn print_summary(&self, summary: &PatchSummary) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                self.print_separator();
                let headline = format!(
                    "Patched {} of {} files in {}",
                    summary.files_modified,
                    summary.reports.len() + summary.errors.len(),
                    format_duration(summary.duration)
                );
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(headline).bold());
                } else {
                    println!("{}", headline);
                }
                for error in &summary.errors {
                    println!("  - {}", error);
                }
                self.print_separator();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "summary",
                    "files": summary.reports.len() + summary.errors.len(),
                    "files_modified": summary.files_modified,
                    "errors": summary.errors,
                    "started_at": summary.started_at.to_rfc3339(),
                    "duration_ms": summary.duration.as_millis(),
                }));
            }
            OutputMode::Plain => {
                println!("COMPLETED: {} files modified", summary.files_modified);
                if !summary.errors.is_empty() {
                    println!("Errors: {}", summary.errors.len());
                }
            }
        }
    }

    pub fn print_fix_set_list<F>(&self, fix_sets: &[FixSet], resolve_target: F)
    where
        F: Fn(&Path) -> std::path::PathBuf,
    {
        match self.mode {
            OutputMode::Json => {
                let entries: Vec<serde_json::Value> = fix_sets
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "name": f.name(),
                            "summary": f.summary(),
                            "default_target": f.default_target().map(|t| resolve_target(t).display().to_string()),
                            "rules": f.rules().len(),
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "fix_sets",
                    "fix_sets": entries
                }));
            }
            _ => {
                self.print_header("Available fix sets");
                for fix_set in fix_sets {
                    if self.use_colors {
                        println!("  {}", style(fix_set.name()).green().bold());
                    } else {
                        println!("  {}", fix_set.name());
                    }
                    println!("      {}", fix_set.summary());
                    if let Some(target) = fix_set.default_target() {
                        println!("      target: {}", resolve_target(target).display());
                    }
                    println!("      rules:  {}", fix_set.rules().len());
                }
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &PatchReport) {
        if self.quiet {
            return;
        }

        if !report.notes.is_empty() {
            println!("Applied fixes:");
            for note in &report.notes {
                println!("- {}", note);
            }
        }

        if self.should_show_message(1) {
            for rule in &report.rules {
                let line = format!("  {:>3}x {}", rule.replacements, rule.description);
                if self.use_colors && !rule.matched() {
                    println!("{}", style(line).dim());
                } else {
                    println!("{}", line);
                }
            }

            let unmatched = report.unmatched_rules().count();
            if unmatched > 0 {
                self.warning(&format!(
                    "{} of {} rules matched nothing in {}",
                    unmatched,
                    report.rules.len(),
                    report.path
                ));
            }

            if let Some(ref diff) = report.diff {
                self.print_diff(diff);
            }
        }

        self.debug(&format!(
            "{} -> {} bytes in {}",
            report.bytes_before,
            report.bytes_after,
            format_duration(report.duration)
        ));

        if report.dry_run {
            if report.modified {
                self.success(&format!("Would update {} (dry run)", report.path));
            } else {
                self.success(&format!("No changes needed for {} (dry run)", report.path));
            }
        } else if report.written {
            self.success(&format!("Successfully updated {}", report.path));
        } else {
            self.success(&format!("No changes needed for {}", report.path));
        }
    }

    fn print_plain_report(&self, report: &PatchReport) {
        if self.quiet {
            return;
        }

        println!("REPORT: {}", report.path);
        println!("Fix sets: {}", report.fix_sets.join(","));
        for note in &report.notes {
            println!("Applied: {}", note);
        }
        println!("Replacements: {}", report.total_replacements());
        println!("Modified: {}", report.modified);
        println!("Written: {}", report.written);
        if self.should_show_message(1) {
            if let Some(ref diff) = report.diff {
                print!("{}", diff);
            }
        }
    }

    fn print_diff(&self, diff: &str) {
        for line in diff.lines() {
            if !self.use_colors {
                println!("{}", line);
            } else if line.starts_with("+++") || line.starts_with("---") {
                println!("{}", style(line).bold());
            } else if line.starts_with('+') {
                println!("{}", style(line).green());
            } else if line.starts_with('-') {
                println!("{}", style(line).red());
            } else if line.starts_with("@@") {
                println!("{}", style(line).cyan());
            } else {
                println!("{}", line);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
