use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn mockpatch(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mockpatch").unwrap();
    cmd.current_dir(dir).env_remove("MOCKPATCH_PROJECT_ROOT");
    cmd
}

fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

const PRICE_HISTORY: &str = "\
it('fetches', async () => {
  graphqlClient.request.mockResolvedValueOnce(data);
  expect(graphqlClient.request).toHaveBeenCalled();
});
";

const PRICE_HISTORY_PATCHED: &str = "\
it('fetches', async () => {
  vi.mocked(graphqlClient).request.mockResolvedValueOnce(data);
  expect(graphqlClient.request).toHaveBeenCalled();
});
";

#[test]
fn patches_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "price.test.ts", PRICE_HISTORY);

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "price.test.ts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully updated"))
        .stdout(predicate::str::contains("Applied fixes:"));

    assert_eq!(fs::read_to_string(path).unwrap(), PRICE_HISTORY_PATCHED);
}

#[test]
fn missing_file_fails_without_creating_it() {
    let temp_dir = TempDir::new().unwrap();

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "missing.test.ts"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error processing missing.test.ts"))
        .stdout(predicate::str::contains("Processing").not());

    assert!(!temp_dir.path().join("missing.test.ts").exists());
}

#[test]
fn explicit_files_ignore_missing_project_root() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "price.test.ts", PRICE_HISTORY);

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "price.test.ts", "-C", "no-such-dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing price.test.ts..."));

    assert_eq!(fs::read_to_string(path).unwrap(), PRICE_HISTORY_PATCHED);

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "-C", "no-such-dir"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project root is not a directory"));
}

#[test]
fn crlf_file_is_patched_and_written_with_lf() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        temp_dir.path(),
        "vault.test.ts",
        "import { a } from 'a';\r\nrun();\r\n",
    );

    mockpatch(temp_dir.path())
        .args(["simulate-complete", "vault.test.ts"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "import { a } from 'a';\n\
         import type { Vault, SimulationResult } from '../../types/generated.js';\n\
         run();\n"
    );
}

#[test]
fn lists_builtin_fix_sets() {
    let temp_dir = TempDir::new().unwrap();

    mockpatch(temp_dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("graphql-mocks"))
        .stdout(predicate::str::contains("simulate-complete"))
        .stdout(predicate::str::contains("simulate-final"))
        .stdout(predicate::str::contains("simulate-vault"))
        .stdout(predicate::str::contains("simulation-mocks"))
        .stdout(predicate::str::contains("simulation-results"));
}

#[test]
fn unknown_fix_set_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "price.test.ts", PRICE_HISTORY);

    mockpatch(temp_dir.path())
        .args(["graphql-mocks,not-a-fix", "price.test.ts"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No fix set named 'not-a-fix'"));

    // Resolution happens before anything is touched
    assert_eq!(fs::read_to_string(path).unwrap(), PRICE_HISTORY);
}

#[test]
fn dry_run_leaves_file_alone() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "price.test.ts", PRICE_HISTORY);

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "price.test.ts", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would update"));

    assert_eq!(fs::read_to_string(path).unwrap(), PRICE_HISTORY);
}

#[test]
fn project_root_resolves_default_target() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("lagoon-mcp");
    let target = write_file(
        &project,
        "tests/tools/get-price-history.test.ts",
        PRICE_HISTORY,
    );

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "-C"])
        .arg(&project)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(target).unwrap(), PRICE_HISTORY_PATCHED);
}

#[test]
fn project_root_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let target = write_file(
        temp_dir.path(),
        "tests/tools/get-price-history.test.ts",
        PRICE_HISTORY,
    );
    let elsewhere = TempDir::new().unwrap();

    mockpatch(elsewhere.path())
        .env("MOCKPATCH_PROJECT_ROOT", temp_dir.path())
        .arg("graphql-mocks")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(target).unwrap(), PRICE_HISTORY_PATCHED);
}

#[test]
fn json_output_is_one_object_per_line() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "price.test.ts", PRICE_HISTORY);

    let output = mockpatch(temp_dir.path())
        .args(["graphql-mocks", "price.test.ts", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let values: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let report = values
        .iter()
        .find(|value| value["type"] == "report")
        .expect("report line");
    assert_eq!(report["modified"], true);
    assert_eq!(report["fix_sets"][0], "graphql-mocks");
}

#[test]
fn chained_fix_sets_run_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        temp_dir.path(),
        "vault.test.ts",
        "const a = result as anyData;\nmockVault.feesAccrued = 5;\n",
    );

    mockpatch(temp_dir.path())
        .args(["simulation-results,graphql-mocks", "vault.test.ts", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "const a = result as any;\nmockVault.feesAccrued = 5;\n"
    );
}

#[test]
fn file_without_matches_is_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let content = "describe('nothing', () => {});\n";
    let path = write_file(temp_dir.path(), "plain.test.ts", content);

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "plain.test.ts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes needed"));

    assert_eq!(fs::read_to_string(path).unwrap(), content);
}

#[test]
fn one_failure_fails_the_run_but_other_files_are_patched() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "price.test.ts", PRICE_HISTORY);

    mockpatch(temp_dir.path())
        .args(["graphql-mocks", "missing.test.ts", "price.test.ts"])
        .assert()
        .code(1);

    assert_eq!(fs::read_to_string(path).unwrap(), PRICE_HISTORY_PATCHED);
}

#[test]
fn custom_fix_set_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        "mockpatch.toml",
        r#"
[write]
atomic = true

[[fix_sets]]
name = "rename-client"
target = "src/client.test.ts"
notes = ["Renamed the client mock"]

[[fix_sets.rules]]
kind = "regex"
find = '\boldClient\b'
replace = "newClient"
"#,
    );
    let target = write_file(
        temp_dir.path(),
        "src/client.test.ts",
        "oldClient.request(); oldClientX();\n",
    );

    mockpatch(temp_dir.path())
        .arg("rename-client")
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed the client mock"));

    assert_eq!(
        fs::read_to_string(target).unwrap(),
        "newClient.request(); oldClientX();\n"
    );
}

#[test]
fn invalid_config_rule_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_file(
        temp_dir.path(),
        "broken.toml",
        r#"
[[fix_sets]]
name = "broken"

[[fix_sets.rules]]
kind = "regex"
find = "(unclosed"
"#,
    );

    mockpatch(temp_dir.path())
        .args(["broken", "a.test.ts", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("(unclosed"));
}

#[test]
fn generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();

    mockpatch(temp_dir.path())
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("mockpatch.toml"));

    let content = fs::read_to_string(temp_dir.path().join("mockpatch.toml")).unwrap();
    assert!(content.contains("[[fix_sets]]"));
}
