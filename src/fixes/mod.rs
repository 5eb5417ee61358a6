//! Named, ordered fix sets for the vault simulation test suite.
//!
//! The built-in sets were written one after another against the same test
//! files and partly undo each other (`simulation-results` adds `feesAccrued`
//! fields that `simulate-vault` removes). None of them is a final state; they
//! can be run alone or chained in any order.

pub mod graphql_mocks;
pub mod simulate_complete;
pub mod simulate_final;
pub mod simulate_vault;
pub mod simulation_mocks;
pub mod simulation_results;

use crate::config::FixSetSpec;
use crate::error::{PatchError, Result};
use crate::rule::Rule;
use std::path::{Path, PathBuf};

pub(crate) const SIMULATE_VAULT_TEST: &str = "src/tools/__tests__/simulate-vault.test.ts";

#[derive(Debug, Clone)]
pub struct FixSet {
    name: String,
    summary: String,
    default_target: Option<PathBuf>,
    rules: Vec<Rule>,
    notes: Vec<String>,
}

impl FixSet {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, summary: S) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            default_target: None,
            rules: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Target used when no file is given, relative to the project root.
    pub fn with_default_target<P: Into<PathBuf>>(mut self, target: P) -> Self {
        self.default_target = Some(target.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn default_target(&self) -> Option<&Path> {
        self.default_target.as_deref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

/// The six built-in fix sets, in the order they were written.
pub fn builtin_fix_sets() -> Result<Vec<FixSet>> {
    Ok(vec![
        graphql_mocks::fix_set()?,
        simulate_complete::fix_set()?,
        simulate_final::fix_set()?,
        simulate_vault::fix_set()?,
        simulation_mocks::fix_set()?,
        simulation_results::fix_set()?,
    ])
}

pub struct FixSetRegistry {
    fix_sets: Vec<FixSet>,
}

impl FixSetRegistry {
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            fix_sets: builtin_fix_sets()?,
        })
    }

    /// Built-in sets followed by user-defined ones. Names must stay unique.
    pub fn with_custom(specs: &[FixSetSpec]) -> Result<Self> {
        let mut registry = Self::builtin()?;
        for spec in specs {
            registry.register(spec.compile()?)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, fix_set: FixSet) -> Result<()> {
        if self.get(fix_set.name()).is_some() {
            return Err(PatchError::Config {
                message: format!("Fix set '{}' is defined more than once", fix_set.name()),
            });
        }
        self.fix_sets.push(fix_set);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FixSet> {
        self.fix_sets.iter().find(|f| f.name() == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.fix_sets.iter().map(|f| f.name().to_string()).collect()
    }

    pub fn all(&self) -> &[FixSet] {
        &self.fix_sets
    }

    /// Resolve a comma-separated chain such as `simulate-complete,simulate-final`.
    pub fn resolve(&self, chain: &str) -> Result<Vec<&FixSet>> {
        let names: Vec<&str> = chain
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        if names.is_empty() {
            return Err(PatchError::UnknownFixSet {
                name: chain.to_string(),
                available: self.names(),
            });
        }

        names
            .into_iter()
            .map(|name| {
                self.get(name).ok_or_else(|| PatchError::UnknownFixSet {
                    name: name.to_string(),
                    available: self.names(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use crate::config::{RuleSpec, RuleSpecKind};

    #[test]
    fn test_builtin_fix_sets_compile() {
        let fix_sets = builtin_fix_sets().unwrap();
        let names: Vec<&str> = fix_sets.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "graphql-mocks",
                "simulate-complete",
                "simulate-final",
                "simulate-vault",
                "simulation-mocks",
                "simulation-results",
            ]
        );

        for fix_set in &fix_sets {
            assert!(!fix_set.rules().is_empty(), "{} has no rules", fix_set.name());
            assert!(!fix_set.notes().is_empty(), "{} has no notes", fix_set.name());
            assert!(fix_set.default_target().is_some());
        }
    }

    #[test]
    fn test_resolve_chain_in_order() {
        let registry = FixSetRegistry::builtin().unwrap();
        let chain = registry.resolve("simulation-results, simulate-vault").unwrap();
        assert_eq!(chain[0].name(), "simulation-results");
        assert_eq!(chain[1].name(), "simulate-vault");
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = FixSetRegistry::builtin().unwrap();
        match registry.resolve("graphql-mocks,nope") {
            Err(PatchError::UnknownFixSet { name, available }) => {
                assert_eq!(name, "nope");
                assert_eq!(available.len(), 6);
            }
            other => panic!("unexpected result: {:?}", other.map(|c| c.len())),
        }
        assert!(registry.resolve(" , ").is_err());
    }

    #[test]
    fn test_custom_fix_set_name_clash() {
        let spec = FixSetSpec {
            name: "graphql-mocks".to_string(),
            summary: None,
            target: None,
            rules: vec![RuleSpec::literal("a", "b")],
            notes: Vec::new(),
        };
        assert!(matches!(
            FixSetRegistry::with_custom(&[spec]),
            Err(PatchError::Config { .. })
        ));
    }

    #[test]
    fn test_custom_fix_set_is_registered() {
        let spec = FixSetSpec {
            name: "rename-client".to_string(),
            summary: Some("Rename the client".to_string()),
            target: Some(PathBuf::from("src/a.ts")),
            rules: vec![RuleSpec {
                kind: RuleSpecKind::Regex,
                find: r"old(\w+)".to_string(),
                replace: "new${1}".to_string(),
                expand: true,
                dot_all: false,
                description: None,
            }],
            notes: vec!["Renamed client".to_string()],
        };
        let registry = FixSetRegistry::with_custom(&[spec]).unwrap();
        let fix_set = registry.get("rename-client").unwrap();

        let mut buffer = TextBuffer::from_string("a.ts", "oldClient");
        buffer.apply(fix_set.rules());
        assert_eq!(buffer.content(), "newClient");
        assert_eq!(registry.all().len(), 7);
    }

    #[test]
    fn test_fees_accrued_chain_does_not_converge() {
        let registry = FixSetRegistry::builtin().unwrap();
        let input = "  const newVaultResult: SimulationResult = {\n    totalSupply: 1n,\n  };\n";

        let mut added = TextBuffer::from_string("t.ts", input);
        for fix_set in registry.resolve("simulation-results").unwrap() {
            added.apply(fix_set.rules());
        }
        assert!(added.content().contains("feesAccrued: BigInt('0'),"));

        let mut removed = TextBuffer::from_string("t.ts", added.content());
        for fix_set in registry.resolve("simulate-vault").unwrap() {
            removed.apply(fix_set.rules());
        }
        assert!(!removed.content().contains("feesAccrued"));
        assert_ne!(removed.content(), added.content());
    }
}
