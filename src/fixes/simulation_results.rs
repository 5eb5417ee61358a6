use super::FixSet;
use crate::error::Result;
use crate::rule::{dot_all, Rule};

pub const NAME: &str = "simulation-results";

const MOCK_SIMULATION_RESULT: &str = "const mockSimulationResult: SimulationResult = {
    totalSupply: BigInt('2000000000000000000'),
    totalAssets: BigInt('2000000000'),
    feesAccrued: BigInt('10000000'),
    pricePerShare: BigInt('1050000000000000000'),
  };";

const WITHDRAWAL_RESULT: &str = "const withdrawalResult: SimulationResult = {
    totalSupply: BigInt('1500000000000000000'),
    totalAssets: BigInt('1500000000'),
    feesAccrued: BigInt('5000000'),
    pricePerShare: BigInt('1000000000000000000'),
  };";

const APPRECIATED_RESULT: &str = "const appreciatedResult: SimulationResult = {
    totalSupply: BigInt('2000000000000000000'),
    totalAssets: BigInt('2100000000'),
    feesAccrued: BigInt('10000000'),
    pricePerShare: BigInt('1100000000000000000'),
  };";

const NEW_VAULT_RESULT: &str = "const newVaultResult: SimulationResult = {
    totalSupply: BigInt('1000000000000000000'),
    totalAssets: BigInt('1000000000'),
    feesAccrued: BigInt('0'),
    pricePerShare: BigInt('1000000000000000000'),
  };";

pub fn fix_set() -> Result<FixSet> {
    let mut fixes = FixSet::new(
        NAME,
        "Rewrite the named SimulationResult fixtures to the four-field SDK shape",
    )
    .with_default_target(super::SIMULATE_VAULT_TEST);

    let objects = [
        ("mockSimulationResult", MOCK_SIMULATION_RESULT),
        ("withdrawalResult", WITHDRAWAL_RESULT),
        ("appreciatedResult", APPRECIATED_RESULT),
        ("newVaultResult", NEW_VAULT_RESULT),
    ];

    for (variable, replacement) in objects {
        let pattern = format!(r"const {}: SimulationResult = \{{[^}}]+\}};", variable);
        fixes = fixes.with_rule(
            Rule::regex(&dot_all(&pattern), replacement)?
                .with_description(format!("rewrite {} fixture", variable)),
        );
    }

    Ok(fixes
        .with_rule(Rule::regex(r"as anyData", "as any")?.with_description("as anyData -> as any"))
        .with_note("Corrected all SimulationResult objects to match Lagoon SDK interface")
        .with_note("Fixed anyData typo"))
}
