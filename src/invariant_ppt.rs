use std::collections::HashSet;
use std::sync::Mutex;
use lazy_static::lazy_static;
use log::error;

lazy_static! {
    /// Invariant descriptions that have been asserted and held at least once.
    static ref CHECKED_INVARIANTS: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

pub const INV_NO_BACKSLASH: &str = "ImportCall argument list contains no backslash";
pub const INV_REPO_UNPROBED: &str = "Repo mode is selected without filesystem checks";

/// Asserts that a launcher invariant holds.
///
/// A violation panics in debug/test builds and is logged in release builds.
/// A pass is recorded so contract tests can prove the check actually ran.
///
/// # Arguments
/// * `condition` - The boolean result of the check.
/// * `description` - Human-readable invariant, e.g. [`INV_NO_BACKSLASH`].
/// * `component` - Optional component tag (e.g., "Command", "Discovery").
pub fn assert_invariant(condition: bool, description: &str, component: Option<&str>) {
    if !condition {
        let msg = format!(
            "CRITICAL INVARIANT VIOLATION [{}]: {}",
            component.unwrap_or("Launcher"),
            description
        );
        error!("{}", msg);
        if cfg!(debug_assertions) || cfg!(test) {
            panic!("{}", msg);
        }
    } else if let Ok(mut set) = CHECKED_INVARIANTS.lock() {
        set.insert(description.to_string());
    }
}

/// Panics unless every listed invariant has been asserted since start-up.
#[allow(dead_code)]
pub fn contract_test(context: &str, required_invariants: &[&str]) {
    let checked = CHECKED_INVARIANTS.lock().unwrap();
    let missing: Vec<&str> = required_invariants
        .iter()
        .copied()
        .filter(|req| !checked.contains(*req))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Contract Test Failed for '{}'. The following invariants were NOT checked:\n{:#?}",
            context, missing
        );
    }
}
