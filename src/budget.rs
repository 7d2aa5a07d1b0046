use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;

// Budget used for a move when the game was never registered (or the store
// entry was already cleared).
pub const FALLBACK_BUDGET_MS: u64 = 450;

const MIN_BUDGET_MS: u64 = 25;
const MIN_RESERVE_MS: u64 = 50;
const RESERVE_PERCENT: u64 = 15;

// Derives the search budget from the engine-reported timeout: keep a reserve
// of at least 50 ms (or 15% of the timeout, whichever is larger) for network
// and serialization, and never search for less than 25 ms.
pub fn compute_budget(timeout_ms: u64) -> u64 {
    let reserve = (timeout_ms * RESERVE_PERCENT / 100).max(MIN_RESERVE_MS);
    timeout_ms.saturating_sub(reserve).max(MIN_BUDGET_MS)
}

// Per-game search budgets, keyed by game id. Written once on "start", read on
// every move, erased on "end". Games run their moves sequentially, so the
// lock is uncontended.
#[derive(Default)]
pub struct BudgetStore {
    budgets: Mutex<HashMap<String, u64>>,
}

impl BudgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, game_id: &str, timeout_ms: u64) {
        let budget = compute_budget(timeout_ms);
        debug!("Game {}: budget set to {}ms (timeout {}ms)", game_id, budget, timeout_ms);
        if let Ok(mut budgets) = self.budgets.lock() {
            budgets.insert(game_id.to_string(), budget);
        }
    }

    // A read without a prior write yields the fallback, never an error.
    pub fn lookup(&self, game_id: &str) -> u64 {
        self.budgets
            .lock()
            .ok()
            .and_then(|budgets| budgets.get(game_id).copied())
            .unwrap_or(FALLBACK_BUDGET_MS)
    }

    pub fn clear(&self, game_id: &str) {
        if let Ok(mut budgets) = self.budgets.lock() {
            budgets.remove(game_id);
        }
    }
}
