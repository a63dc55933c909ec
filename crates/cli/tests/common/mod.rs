//! Helpers shared by the integration tests.

use std::path::Path;

pub const BIN: &str = env!("CARGO_BIN_EXE_taskwork");

/// Sorted names of the tasks that logged a completion line.
pub fn completed(log: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(log).unwrap_or_default();
    let mut names: Vec<String> = content
        .lines()
        .filter(|line| line.contains(" - Complete: "))
        .filter_map(|line| line.split("] ").nth(1))
        .filter_map(|rest| rest.split(" - ").next())
        .map(str::to_string)
        .collect();
    names.sort();
    names
}
