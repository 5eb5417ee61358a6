use crate::error::{PatchError, Result};
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Replacement callback for computed regex rules.
pub type ComputeFn = Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

/// What a regex rule puts in place of each match.
#[derive(Clone)]
pub enum Replacement {
    /// Inserted verbatim, `$` has no special meaning.
    Literal(String),
    /// Expanded per match, `${1}` / `$name` refer to capture groups.
    Template(String),
    /// Built from the captures of each match.
    Computed(ComputeFn),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Replacement::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    Literal { find: String, replace: String },
    Regex { regex: Regex, replacement: Replacement },
    InsertAfterLast { regex: Regex, text: String },
}

/// A single find/replace directive applied to a text buffer.
///
/// Every non-overlapping match is replaced, scanning left to right. A rule
/// that finds nothing leaves the text untouched and reports zero
/// replacements; it is never an error.
#[derive(Debug, Clone)]
pub struct Rule {
    description: String,
    kind: RuleKind,
}

/// Result of applying one rule to a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub description: String,
    pub replacements: usize,
}

impl RuleOutcome {
    pub fn matched(&self) -> bool {
        self.replacements > 0
    }
}

impl Rule {
    pub fn literal<F: Into<String>, R: Into<String>>(find: F, replace: R) -> Result<Self> {
        let find = find.into();
        if find.is_empty() {
            return Err(PatchError::invalid_rule(
                "<literal>",
                "literal rules need non-empty search text",
            ));
        }

        Ok(Self {
            description: format!("replace '{}'", find),
            kind: RuleKind::Literal {
                find,
                replace: replace.into(),
            },
        })
    }

    /// Regex rule whose replacement text is inserted as-is.
    pub fn regex<R: Into<String>>(pattern: &str, replace: R) -> Result<Self> {
        Self::with_replacement(pattern, Replacement::Literal(replace.into()))
    }

    /// Regex rule whose replacement expands capture groups (`${1}`).
    pub fn template<T: Into<String>>(pattern: &str, template: T) -> Result<Self> {
        Self::with_replacement(pattern, Replacement::Template(template.into()))
    }

    pub fn computed<F>(pattern: &str, compute: F) -> Result<Self>
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self::with_replacement(pattern, Replacement::Computed(Arc::new(compute)))
    }

    /// Insert `text` right after the final match of `pattern`. No match, no change.
    pub fn insert_after_last<T: Into<String>>(pattern: &str, text: T) -> Result<Self> {
        Ok(Self {
            description: format!("insert after last match of /{}/", pattern),
            kind: RuleKind::InsertAfterLast {
                regex: compile_pattern(pattern)?,
                text: text.into(),
            },
        })
    }

    fn with_replacement(pattern: &str, replacement: Replacement) -> Result<Self> {
        Ok(Self {
            description: format!("rewrite /{}/", pattern),
            kind: RuleKind::Regex {
                regex: compile_pattern(pattern)?,
                replacement,
            },
        })
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            RuleKind::Literal { .. } => "literal",
            RuleKind::Regex { .. } => "regex",
            RuleKind::InsertAfterLast { .. } => "insert-after-last",
        }
    }

    /// Apply the rule to `text`, returning the new text and the number of
    /// replacements made. Borrowed output means nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        match &self.kind {
            RuleKind::Literal { find, replace } => {
                let count = text.matches(find.as_str()).count();
                if count == 0 {
                    (Cow::Borrowed(text), 0)
                } else {
                    (Cow::Owned(text.replace(find.as_str(), replace)), count)
                }
            }
            RuleKind::Regex { regex, replacement } => {
                let mut count = 0;
                let output = match replacement {
                    Replacement::Literal(replace) => regex.replace_all(text, |_: &Captures<'_>| {
                        count += 1;
                        replace.clone()
                    }),
                    Replacement::Template(template) => {
                        regex.replace_all(text, |caps: &Captures<'_>| {
                            count += 1;
                            let mut expanded = String::new();
                            caps.expand(template, &mut expanded);
                            expanded
                        })
                    }
                    Replacement::Computed(compute) => {
                        regex.replace_all(text, |caps: &Captures<'_>| {
                            count += 1;
                            compute(caps)
                        })
                    }
                };
                (output, count)
            }
            RuleKind::InsertAfterLast { regex, text: insert } => {
                match regex.find_iter(text).last() {
                    Some(last) => {
                        let mut output = String::with_capacity(text.len() + insert.len());
                        output.push_str(&text[..last.end()]);
                        output.push_str(insert);
                        output.push_str(&text[last.end()..]);
                        (Cow::Owned(output), 1)
                    }
                    None => (Cow::Borrowed(text), 0),
                }
            }
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .build()
        .map_err(|e| PatchError::invalid_rule(pattern, e))
}

/// Prefix a pattern so `.` also matches line breaks.
pub fn dot_all(pattern: &str) -> String {
    format!("(?s){}", pattern)
}
