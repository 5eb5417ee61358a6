use crate::error::{PatchError, Result};
use crate::fixes::FixSet;
use crate::rule::{dot_all, Rule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Root that built-in default targets are resolved against.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,
    #[serde(default)]
    pub write: WriteConfig,
    #[serde(default)]
    pub fix_sets: Vec<FixSetSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WriteConfig {
    /// Write through a temporary file and rename it over the target.
    pub atomic: bool,
    /// Leave files whose content did not change untouched.
    pub skip_unchanged: bool,
}

/// A user-defined fix set from the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixSetSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    #[serde(default)]
    pub notes: Vec<String>,
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleSpecKind {
    Literal,
    Regex,
    InsertAfterLast,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleSpec {
    pub kind: RuleSpecKind,
    /// Literal search text, or a regex for the other kinds.
    pub find: String,
    /// Replacement text; the inserted text for `insert-after-last`.
    #[serde(default)]
    pub replace: String,
    /// Expand `${N}` capture references in `replace` (regex rules only).
    #[serde(default)]
    pub expand: bool,
    /// Let `.` match line breaks.
    #[serde(default)]
    pub dot_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_project_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            write: WriteConfig::default(),
            fix_sets: Vec::new(),
        }
    }
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            atomic: false,
            skip_unchanged: true,
        }
    }
}

impl RuleSpec {
    pub fn literal<F: Into<String>, R: Into<String>>(find: F, replace: R) -> Self {
        Self {
            kind: RuleSpecKind::Literal,
            find: find.into(),
            replace: replace.into(),
            expand: false,
            dot_all: false,
            description: None,
        }
    }

    pub fn compile(&self) -> Result<Rule> {
        let pattern = if self.dot_all {
            dot_all(&self.find)
        } else {
            self.find.clone()
        };

        let rule = match self.kind {
            RuleSpecKind::Literal => {
                if self.expand || self.dot_all {
                    return Err(PatchError::invalid_rule(
                        &self.find,
                        "'expand' and 'dot_all' only apply to regex rules",
                    ));
                }
                Rule::literal(self.find.as_str(), self.replace.as_str())?
            }
            RuleSpecKind::Regex if self.expand => Rule::template(&pattern, self.replace.as_str())?,
            RuleSpecKind::Regex => Rule::regex(&pattern, self.replace.as_str())?,
            RuleSpecKind::InsertAfterLast => {
                Rule::insert_after_last(&pattern, self.replace.as_str())?
            }
        };

        Ok(match &self.description {
            Some(description) => rule.with_description(description.as_str()),
            None => rule,
        })
    }
}

impl FixSetSpec {
    pub fn compile(&self) -> Result<FixSet> {
        if self.name.trim().is_empty() {
            return Err(PatchError::Config {
                message: "Fix set names cannot be empty".to_string(),
            });
        }

        if self.rules.is_empty() {
            return Err(PatchError::Config {
                message: format!("Fix set '{}' has no rules", self.name),
            });
        }

        let summary = self
            .summary
            .clone()
            .unwrap_or_else(|| format!("User-defined fix set ({} rules)", self.rules.len()));
        let mut fix_set = FixSet::new(self.name.trim(), summary);

        if let Some(ref target) = self.target {
            fix_set = fix_set.with_default_target(target.clone());
        }

        for rule in &self.rules {
            fix_set = fix_set.with_rule(rule.compile()?);
        }

        for note in &self.notes {
            fix_set = fix_set.with_note(note.as_str());
        }

        Ok(fix_set)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PatchError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| PatchError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| PatchError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["mockpatch.toml", ".mockpatch.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref project_root) = cli_args.project_root {
            self.project_root = project_root.clone();
        }

        if let Some(atomic) = cli_args.atomic {
            self.write.atomic = atomic;
        }
    }

    /// Compile every user-defined fix set so bad patterns fail before any file is read.
    pub fn validate(&self) -> Result<()> {
        for spec in &self.fix_sets {
            spec.compile()?;
        }

        Ok(())
    }

    /// Default targets live under `project_root`, so it must be a directory
    /// whenever they are resolved. Explicit file arguments never consult it.
    pub fn validate_project_root(&self) -> Result<()> {
        if !self.project_root.is_dir() {
            return Err(PatchError::Config {
                message: format!(
                    "Project root is not a directory: {}",
                    self.project_root.display()
                ),
            });
        }

        Ok(())
    }

    /// Resolve a fix set's default target against the project root.
    pub fn resolve_target(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.project_root.join(relative)
        }
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self {
            project_root: PathBuf::from("."),
            write: WriteConfig::default(),
            fix_sets: vec![FixSetSpec {
                name: "wrap-client-mocks".to_string(),
                summary: Some("Route client.request mocks through vi.mocked()".to_string()),
                target: Some(PathBuf::from("tests/tools/get-price-history.test.ts")),
                rules: vec![
                    RuleSpec {
                        kind: RuleSpecKind::Regex,
                        find: r"\bclient\.request\.mock".to_string(),
                        replace: "vi.mocked(client).request.mock".to_string(),
                        expand: false,
                        dot_all: false,
                        description: Some("wrap client mocks".to_string()),
                    },
                    RuleSpec::literal("as anyData", "as any"),
                ],
                notes: vec!["Wrapped client.request mocks with vi.mocked()".to_string()],
            }],
        };
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub project_root: Option<PathBuf>,
    pub atomic: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_root(mut self, project_root: Option<PathBuf>) -> Self {
        self.project_root = project_root;
        self
    }

    pub fn with_atomic(mut self, atomic: Option<bool>) -> Self {
        self.atomic = atomic;
        self
    }
}
