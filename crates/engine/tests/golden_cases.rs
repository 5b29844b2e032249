use std::fs;
use std::path::{Path, PathBuf};

use docplace_engine::apply::apply_resolution;
use docplace_engine::{resolve, EditOperation, ResolverConfig, Selection, Strategy};
use serde::Deserialize;

#[derive(Debug)]
struct GoldenCase {
    name: String,
    before: String,
    /// `None` when the operation must stay unplaced.
    after: Option<String>,
    spec: CaseSpec,
}

#[derive(Debug, Deserialize)]
struct CaseSpec {
    operation: EditOperation,
    #[serde(default)]
    selection: Option<Selection>,
    #[serde(default)]
    cursor: Option<usize>,
    #[serde(default)]
    strategy: Option<Strategy>,
    #[serde(default)]
    min_confidence: Option<f64>,
}

#[test]
fn resolution_golden_cases() {
    let cases_dir = golden_cases_dir();
    let cases = load_cases(&cases_dir);

    assert!(!cases.is_empty(), "no golden cases found in {}", cases_dir.display());

    let mut failures = Vec::new();
    for case in cases {
        if let Err(message) = run_case(&case) {
            failures.push(message);
        }
    }

    if !failures.is_empty() {
        panic!("{} golden case(s) failed:\n\n{}", failures.len(), failures.join("\n\n"));
    }
}

fn golden_cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/golden/cases")
}

fn load_cases(cases_dir: &Path) -> Vec<GoldenCase> {
    let mut case_dirs: Vec<PathBuf> = fs::read_dir(cases_dir)
        .unwrap_or_else(|error| panic!("failed to read {}: {error}", cases_dir.display()))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if path.is_dir() {
                Some(path)
            } else {
                None
            }
        })
        .collect();
    case_dirs.sort();
    case_dirs.into_iter().map(load_case).collect()
}

fn load_case(case_dir: PathBuf) -> GoldenCase {
    let name = case_dir
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("<unnamed-case>")
        .to_owned();

    let read = |file: &str| fs::read_to_string(case_dir.join(file));
    let before = read("before.md")
        .unwrap_or_else(|error| panic!("{name}: failed to read before.md: {error}"));
    let after = read("after.md").ok();
    let spec_raw = read("case.json")
        .unwrap_or_else(|error| panic!("{name}: failed to read case.json: {error}"));
    let spec: CaseSpec = serde_json::from_str(&spec_raw)
        .unwrap_or_else(|error| panic!("{name}: invalid case.json: {error}"));

    GoldenCase { name, before, after, spec }
}

fn run_case(case: &GoldenCase) -> Result<(), String> {
    let result = resolve(
        &case.before,
        &case.spec.operation,
        case.spec.selection,
        case.spec.cursor,
        &ResolverConfig::default(),
    );

    if result.strategy != case.spec.strategy {
        return Err(format!(
            "case `{}`: expected strategy {:?}, got {:?} ({result:?})",
            case.name, case.spec.strategy, result.strategy
        ));
    }
    if let Some(min) = case.spec.min_confidence {
        if result.confidence < min {
            return Err(format!(
                "case `{}`: confidence {} below {min}",
                case.name, result.confidence
            ));
        }
    }

    match (&case.after, result.is_failure()) {
        (None, true) => Ok(()),
        (None, false) => Err(format!("case `{}`: expected unplaced, got {result:?}", case.name)),
        (Some(_), true) => Err(format!("case `{}`: operation was not placed", case.name)),
        (Some(expected), false) => {
            let actual = apply_resolution(&case.before, &result)
                .map_err(|error| format!("case `{}`: apply failed: {error}", case.name))?;
            if &actual == expected {
                Ok(())
            } else {
                Err(format!(
                    "case `{}`: output mismatch\n--- expected\n{expected}\n--- actual\n{actual}",
                    case.name
                ))
            }
        }
    }
}
