//! Pairs teams onto the project structures they asked for.
//!
//! Teams list the structures they would like to work on. Teams that share a
//! structure can be paired under it, and each team is paired at most once.
//! A greedy pass pairs teams for one ordering of the input; the optimizer
//! repeats that pass over many random orderings and keeps the assignment that
//! covers the most teams, then the most structures.
//!
//! ```rust
//! use project_pairing::{parse_preferences, render, Optimizer, PairingConfig};
//!
//! let prefs = parse_preferences("A x y\nB x\nC y\n");
//! let report = Optimizer::new(PairingConfig::default().with_seed(7)).optimize(&prefs);
//!
//! assert_eq!(render(&report.best), "2 teams assigned to 1 data structures\nx\tA\tB\n");
//! ```

pub mod index;
pub mod loader;
pub mod optimizer;
pub mod pairing;
pub mod report;
pub mod types;

pub use index::invert;
pub use loader::{load_preferences, parse_preferences, LoadError};
pub use optimizer::{optimize, run_trial, Optimizer};
pub use pairing::{assign_pairs, run_pass, PairingPass};
pub use report::{render, render_unpaired, summary_line, to_json};
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed pairing session: load preferences, run, read results
#[wasm_bindgen]
pub struct PairingSession {
    optimizer: Optimizer,
    preferences: PreferenceMap,
    report: OptimizationReport,
}

#[wasm_bindgen]
impl PairingSession {
    /// Create a session with default trials and a fixed seed
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> PairingSession {
        Self::from_config(PairingConfig::default().with_seed(seed))
    }

    /// Create with custom config
    pub fn new_with_config(config_json: &str) -> Result<PairingSession, JsValue> {
        let config = PairingConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_config(config))
    }

    /// Replace the loaded preferences. Clears any previous result.
    /// Returns the number of teams loaded.
    pub fn load_preferences(&mut self, text: &str) -> usize {
        self.preferences = parse_preferences(text);
        self.report = OptimizationReport::default();
        self.preferences.len()
    }

    pub fn get_team_count(&self) -> usize {
        self.preferences.len()
    }

    /// Run the optimizer over the loaded preferences
    pub fn run(&mut self) {
        self.report = self.optimizer.optimize(&self.preferences);
    }

    /// Best score as JSON
    pub fn get_score(&self) -> String {
        serde_json::to_string(&self.report.best.score).unwrap_or_default()
    }

    /// Full result (score, pairs, stats, unpaired teams) as JSON
    pub fn get_result(&self) -> String {
        let unpaired = self.report.best.unpaired_teams(&self.preferences);
        to_json(&self.report, Some(&unpaired)).unwrap_or_default()
    }

    /// Result in the plain-text report format
    pub fn render(&self) -> String {
        render(&self.report.best)
    }

    /// Teams without a partner, as a JSON array
    pub fn get_unpaired(&self) -> String {
        serde_json::to_string(&self.report.best.unpaired_teams(&self.preferences))
            .unwrap_or_default()
    }

    /// Get current config as JSON
    pub fn get_config(&self) -> String {
        serde_json::to_string(self.optimizer.config()).unwrap_or_default()
    }

    /// Get default config as JSON
    pub fn get_default_config() -> String {
        serde_json::to_string(&PairingConfig::default()).unwrap_or_default()
    }
}

impl PairingSession {
    fn from_config(config: PairingConfig) -> Self {
        Self {
            optimizer: Optimizer::new(config),
            preferences: PreferenceMap::new(),
            report: OptimizationReport::default(),
        }
    }
}

/// One-shot: parse `text`, optimize, and return the text report
#[wasm_bindgen]
pub fn assign_teams(text: &str, trials: usize, seed: u64) -> String {
    let config = PairingConfig::default().with_trials(trials).with_seed(seed);
    let report = optimize(&parse_preferences(text), &config);
    render(&report.best)
}
