use super::FixSet;
use crate::error::Result;
use crate::rule::{dot_all, Rule};

pub const NAME: &str = "simulate-vault";

const VAULT_DATA_MOCK: &str = r"const mockVault: VaultData = \{[^}]+\{[^}]+\} as const,[^}]+\{[^}]+\{[^}]+\} as const,[^}]+\{[^}]+\} as const,[^}]+\} as const,[^}]+\} as VaultData;";

const FULL_VAULT_MOCK: &str = "  const mockVault: Vault = {
    id: 'vault-test',
    address: '0x1234567890123456789012345678901234567890',
    name: 'Test Vault',
    symbol: 'TEST',
    decimals: 18,
    description: 'Test vault for simulation',
    shortDescription: 'Test vault',
    isVisible: true,
    inception: 1700000000,
    maxCapacity: '10000000000000000000000',
    logoUrl: 'https://example.com/test.png',
    asset: {
      id: 'asset-usdc',
      address: '0xabcdef1234567890abcdef1234567890abcdef12',
      symbol: 'USDC',
      name: 'USD Coin',
      decimals: 6,
      network: 'Arbitrum',
      logoUrl: 'https://example.com/usdc.png',
    },
    chain: {
      id: '42161',
      name: 'Arbitrum',
      nativeToken: 'ETH',
      factory: '0xfactory123',
      isVisible: true,
      logoUrl: 'https://example.com/arbitrum.png',
    },
    state: {
      totalSupply: '1000000000000000000',
      totalAssets: '1000000000',
      totalAssetsUsd: 1000.0,
      totalSharesIssued: '1000000000000000000',
      highWaterMark: '1000000000',
      lastFeeTime: '1700000000',
      managementFee: '200',
      performanceFee: '1000',
      version: 'v1',
      safeAssetBalance: '500000000',
      pendingSiloBalances: {
        assets: '100000000',
        shares: '100000000000000000',
      },
      pendingSettlement: {
        assets: '50000000',
        shares: '50000000000000000',
      },
    },
    airdrops: [],
    incentives: [],
    nativeYields: [],
    curators: [
      {
        id: 'curator-test',
        name: 'Test Curator',
        description: 'Test curator for simulation',
        logoUrl: 'https://example.com/curator.png',
      },
    ],
  } as Vault;";

pub fn fix_set() -> Result<FixSet> {
    Ok(FixSet::new(
        NAME,
        "Swap the VaultData mock for a full Vault and drop feesAccrued fields",
    )
    .with_default_target(super::SIMULATE_VAULT_TEST)
    .with_rule(
        Rule::regex(&dot_all(VAULT_DATA_MOCK), FULL_VAULT_MOCK)?
            .with_description("replace VaultData mock with complete Vault mock"),
    )
    .with_rule(
        // \s+ is leftmost, so it also swallows the line break before the field.
        Rule::regex(r#"(\s+)feesAccrued: BigInt\(['"][0-9]+['"]\),?\n"#, "")?
            .with_description("remove feesAccrued properties"),
    )
    .with_rule(
        Rule::regex(
            r"const content = JSON\.parse\(result\.content\[0\]\.text\) as Record<string, unknown>;",
            "const content = JSON.parse(result.content[0].text as string) as Record<string, unknown>;",
        )?
        .with_description("cast JSON.parse input to string"),
    )
    .with_note("Updated mockVault to proper Vault type with all required fields")
    .with_note("Removed feesAccrued properties from SimulationResult objects")
    .with_note("Fixed JSON.parse type assertions"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn run(input: &str) -> String {
        let fixes = fix_set().unwrap();
        let mut buffer = TextBuffer::from_string("simulate-vault.test.ts", input);
        buffer.apply(fixes.rules());
        buffer.into_content()
    }

    const VAULT_DATA_FIXTURE: &str = "const mockVault: VaultData = {
    address: '0x1',
    asset: {
      symbol: 'USDC',
    } as const,
    state: {
      pendingSiloBalances: {
        assets: '1',
      } as const,
      pendingSettlement: {
        assets: '2',
      } as const,
    } as const,
    name: 'Vault',
  } as VaultData;";

    #[test]
    fn test_replaces_vault_data_mock() {
        let output = run(VAULT_DATA_FIXTURE);
        assert_eq!(output, FULL_VAULT_MOCK);
    }

    #[test]
    fn test_removes_fees_accrued_and_joins_lines() {
        let input = "  const r = {\n    totalSupply: BigInt('1'),\n    feesAccrued: BigInt('10000000'),\n    pricePerShare: BigInt('2'),\n  };\n";
        let expected = "  const r = {\n    totalSupply: BigInt('1'),    pricePerShare: BigInt('2'),\n  };\n";
        assert_eq!(run(input), expected);
    }

    #[test]
    fn test_casts_json_parse_input() {
        let input = "    const content = JSON.parse(result.content[0].text) as Record<string, unknown>;\n";
        let expected = "    const content = JSON.parse(result.content[0].text as string) as Record<string, unknown>;\n";
        assert_eq!(run(input), expected);
        assert_eq!(run(expected), expected);
    }

    #[test]
    fn test_leaves_unrelated_text() {
        let input = "describe('simulate', () => {});\n";
        assert_eq!(run(input), input);
    }
}
