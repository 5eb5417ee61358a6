use crate::error::{PatchError, Result};
use crate::rule::{Rule, RuleOutcome};
use similar::TextDiff;
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The full contents of one file while it is being patched.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    path: PathBuf,
    original: String,
    content: String,
}

impl TextBuffer {
    /// Read `path` as UTF-8 text with `\r\n` and lone `\r` turned into `\n`,
    /// so line-anchored rules see the same text on every platform. A
    /// modified buffer is written back with `\n` endings. Nothing is written
    /// if reading fails.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.is_dir() {
            return Err(PatchError::Read {
                path: path.display().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "target is a directory",
                ),
            });
        }

        let bytes = fs::read(path).map_err(|e| PatchError::from_read(path, e))?;
        let content = String::from_utf8(bytes).map_err(|_| PatchError::Encoding {
            path: path.display().to_string(),
        })?;

        Ok(Self::from_string(path, normalize_line_endings(content)))
    }

    pub fn from_string<P: Into<PathBuf>, S: Into<String>>(path: P, content: S) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            original: content.clone(),
            content,
        }
    }

    pub fn apply_rule(&mut self, rule: &Rule) -> RuleOutcome {
        let (output, replacements) = rule.apply(&self.content);
        let replaced = match output {
            Cow::Owned(text) => Some(text),
            Cow::Borrowed(_) => None,
        };

        if let Some(text) = replaced {
            self.content = text;
        }

        RuleOutcome {
            description: rule.description().to_string(),
            replacements,
        }
    }

    /// Apply rules in order, each one seeing the previous rule's output.
    pub fn apply(&mut self, rules: &[Rule]) -> Vec<RuleOutcome> {
        rules.iter().map(|rule| self.apply_rule(rule)).collect()
    }

    pub fn is_modified(&self) -> bool {
        self.content != self.original
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Unified diff between the text as read and the current content.
    pub fn unified_diff(&self) -> String {
        let label = self.path.display().to_string();
        TextDiff::from_lines(&self.original, &self.content)
            .unified_diff()
            .context_radius(3)
            .header(&label, &label)
            .to_string()
    }

    /// Overwrite the file in place with the current content.
    pub fn write(&self) -> Result<u64> {
        fs::write(&self.path, self.content.as_bytes())
            .map_err(|e| PatchError::from_write(&self.path, e))?;
        Ok(self.content.len() as u64)
    }

    /// Write to a temporary file beside the target, then rename it over the target.
    pub fn write_atomic(&self) -> Result<u64> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp_file = tempfile::NamedTempFile::new_in(&parent)
            .map_err(|e| PatchError::from_write(&self.path, e))?;
        temp_file
            .write_all(self.content.as_bytes())
            .and_then(|_| temp_file.flush())
            .map_err(|e| PatchError::from_write(&self.path, e))?;

        // The temp file is created 0600; keep the target's mode across the rename.
        if let Ok(metadata) = fs::metadata(&self.path) {
            fs::set_permissions(temp_file.path(), metadata.permissions())
                .map_err(|e| PatchError::from_write(&self.path, e))?;
        }

        temp_file
            .persist(&self.path)
            .map_err(|e| PatchError::from_write(&self.path, e.error))?;

        Ok(self.content.len() as u64)
    }
}

fn normalize_line_endings(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
