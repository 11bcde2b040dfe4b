//! Property-based tests for session persistence.
//!
//! Whatever history and profit are saved must come back exactly: same values,
//! same order, bit-for-bit.

use core_types::{Outcome, SessionState};
use proptest::prelude::*;
use store::{JsonFileRepository, SessionRepository};
use tempfile::tempdir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Save followed by load reproduces history and profit exactly
    #[test]
    fn save_then_load_is_exact(
        values in prop::collection::vec(0.01f64..10_000.0f64, 0..200),
        profit in -1.0e6f64..1.0e6f64,
    ) {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("crash_data.json"));

        let history: Vec<Outcome> = values.iter().map(|v| Outcome::new(*v).unwrap()).collect();
        let state = SessionState::new(history, profit);

        repo.save(&state).unwrap();
        let loaded = repo.load();

        prop_assert_eq!(loaded.values(), values);
        prop_assert_eq!(loaded.profit.to_bits(), profit.to_bits());
    }
}

#[test]
fn scenario_corrupted_store_is_treated_as_fresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crash_data.json");
    std::fs::write(&path, b"\x00\x01garbage").unwrap();

    let repo = JsonFileRepository::new(&path);
    let state = repo.load();
    assert!(state.is_empty());
    assert_eq!(state.profit, 0.0);

    // The next save replaces the corrupt file with a valid one.
    let mut state = state;
    state.record(Outcome::new(1.8).unwrap(), 10.0);
    repo.save(&state).unwrap();
    assert_eq!(repo.load().values(), vec![1.8]);
}
