use super::FixSet;
use crate::error::Result;
use crate::rule::Rule;

pub const NAME: &str = "simulation-mocks";

pub fn fix_set() -> Result<FixSet> {
    Ok(FixSet::new(
        NAME,
        "Replace simulateVaultManagement mocks with the mockSimulateVaultManagement helper",
    )
    .with_default_target(super::SIMULATE_VAULT_TEST)
    .with_rule(
        Rule::template(
            r"vi\.mocked\(simulateVaultManagement\)\.mockReturnValue\((\w+) as any\);",
            "mockSimulateVaultManagement(${1});",
        )?
        .with_description("mockReturnValue(X as any) -> mockSimulateVaultManagement(X)"),
    )
    .with_note("Replaced all simulateVaultManagement mocks with helper function"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    #[test]
    fn test_uses_helper() {
        let fixes = fix_set().unwrap();
        let mut buffer = TextBuffer::from_string(
            "simulate-vault.test.ts",
            "    vi.mocked(simulateVaultManagement).mockReturnValue(withdrawalResult as any);\n",
        );
        let outcomes = buffer.apply(fixes.rules());

        assert_eq!(outcomes[0].replacements, 1);
        assert_eq!(
            buffer.content(),
            "    mockSimulateVaultManagement(withdrawalResult);\n"
        );
    }

    #[test]
    fn test_requires_plain_identifier() {
        let fixes = fix_set().unwrap();
        let input = "vi.mocked(simulateVaultManagement).mockReturnValue({ ...base } as any);";
        let mut buffer = TextBuffer::from_string("simulate-vault.test.ts", input);
        buffer.apply(fixes.rules());
        assert_eq!(buffer.content(), input);
    }
}
