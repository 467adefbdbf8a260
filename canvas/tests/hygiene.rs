//! Source hygiene for the canvas client.
//!
//! The reconciler runs inside a participant's event loop; a panic there drops
//! the participant off the board. Each pattern below has a budget of zero and
//! is counted over `src/`, skipping `*_test.rs` files.

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    reason: &'static str,
}

const BUDGETS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, reason: "panics on None/Err" },
    Budget { pattern: ".expect(", max: 0, reason: "panics on None/Err" },
    Budget { pattern: "panic!(", max: 0, reason: "aborts the event loop" },
    Budget { pattern: "unreachable!(", max: 0, reason: "aborts the event loop" },
    Budget { pattern: "todo!(", max: 0, reason: "unfinished path" },
    Budget { pattern: "unimplemented!(", max: 0, reason: "unfinished path" },
    Budget { pattern: "let _ =", max: 0, reason: "discards a result unseen" },
    Budget { pattern: ".ok()", max: 0, reason: "discards an error unseen" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, reason: "hides unused code" },
];

fn production_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            production_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            out.push(path);
        }
    }
}

fn sources() -> Vec<(String, String)> {
    let mut paths = Vec::new();
    production_files(Path::new(env!("CARGO_MANIFEST_DIR")).join("src").as_path(), &mut paths);
    paths
        .into_iter()
        .filter_map(|p| Some((p.display().to_string(), fs::read_to_string(&p).ok()?)))
        .collect()
}

#[test]
fn source_tree_is_found() {
    assert!(sources().iter().any(|(path, _)| path.ends_with("reconciler.rs")));
}

#[test]
fn panic_and_discard_budgets_hold() {
    let files = sources();
    let mut failures = Vec::new();

    for budget in BUDGETS {
        let hits: Vec<String> = files
            .iter()
            .filter_map(|(path, text)| {
                let n = text.lines().filter(|l| l.contains(budget.pattern)).count();
                (n > 0).then(|| format!("  {path}: {n}"))
            })
            .collect();
        let count: usize = files
            .iter()
            .map(|(_, text)| text.lines().filter(|l| l.contains(budget.pattern)).count())
            .sum();
        if count > budget.max {
            failures.push(format!(
                "`{}` ({}): found {count}, max {}\n{}",
                budget.pattern,
                budget.reason,
                budget.max,
                hits.join("\n")
            ));
        }
    }

    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn surface_objects_carry_no_origin_flag() {
    // Echo suppression goes through `Origin` parameters only.
    let files = sources();
    let flagged: Vec<&str> = files
        .iter()
        .filter(|(_, text)| text.contains("remote: bool") || text.contains("is_remote"))
        .map(|(path, _)| path.as_str())
        .collect();
    assert!(flagged.is_empty(), "origin flag stored on objects in: {flagged:?}");
}
