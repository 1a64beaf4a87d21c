//! Developer Tooling: scene inspector for the debug panel and the CLI.
//!
//! # Invariants
//! - Inspection is read-only.

mod inspector;

pub use inspector::{EntityInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "donutspace-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
