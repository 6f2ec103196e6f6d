use std::fmt::Debug;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_json_diff::{CompareMode, Config, assert_json_matches_no_panic};
use serde::{Serialize, de::DeserializeOwned};
use webhookgen::manifest::read_configurations;

#[allow(dead_code)]
pub fn setup_command(path: &Path) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("webhookgen");
    cmd.current_dir(path);
    cmd
}

#[allow(dead_code)]
pub fn test_data(path: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(path)
        .to_string_lossy()
        .to_string()
}

/// Compares the manifest found at `actual_path` with the golden one.
#[allow(dead_code)]
pub fn check_output<M, V>(actual_path: &Path, expected_path: &Path)
where
    M: DeserializeOwned + Serialize + PartialEq + Debug,
    V: DeserializeOwned + Serialize + PartialEq + Debug,
{
    let actual = fs::read_to_string(actual_path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", actual_path.display()));
    check_manifest::<M, V>(&actual, expected_path);
}

#[allow(dead_code)]
pub fn check_manifest<M, V>(actual: &str, expected_path: &Path)
where
    M: DeserializeOwned + Serialize + PartialEq + Debug,
    V: DeserializeOwned + Serialize + PartialEq + Debug,
{
    let (actual_mutating, actual_validating): (M, V) = read_configurations(actual)
        .unwrap_or_else(|e| panic!("cannot load the generated manifest: {e}"));

    let expected = fs::read_to_string(expected_path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", expected_path.display()));
    let (expected_mutating, expected_validating): (M, V) = read_configurations(&expected)
        .unwrap_or_else(|e| panic!("cannot load {}: {e}", expected_path.display()));

    assert_same(&actual_mutating, &expected_mutating);
    assert_same(&actual_validating, &expected_validating);
}

#[allow(dead_code)]
pub fn assert_same<T>(actual: &T, expected: &T)
where
    T: Serialize + PartialEq + Debug,
{
    if actual == expected {
        return;
    }
    let diff = assert_json_matches_no_panic(actual, expected, Config::new(CompareMode::Strict))
        .err()
        .unwrap_or_else(|| format!("{actual:#?}\n\n!=\n\n{expected:#?}"));
    panic!(
        "type not as expected, check tests/data/README.md for more details.\n\nDiff:\n\n{diff}"
    );
}
