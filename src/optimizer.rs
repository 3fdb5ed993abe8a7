use crate::index::invert_entries;
use crate::pairing::assign_pairs;
use crate::types::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Randomized keep-best search over team orderings
pub struct Optimizer {
    config: PairingConfig,
}

impl Optimizer {
    pub fn new(config: PairingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    /// Run the configured number of trials and return the best assignment found.
    ///
    /// Seeded configs are reproducible; without a seed the permutation source
    /// is drawn from OS entropy.
    pub fn optimize(&self, preferences: &PreferenceMap) -> OptimizationReport {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.optimize_with_rng(preferences, &mut rng)
    }

    /// Same as [`Optimizer::optimize`] with a caller-supplied permutation source.
    ///
    /// Trial 0 evaluates `preferences` in its own order. Every later trial
    /// shuffles the previous trial's ordering before pairing.
    pub fn optimize_with_rng(
        &self,
        preferences: &PreferenceMap,
        rng: &mut impl Rng,
    ) -> OptimizationReport {
        let mut best = BestResult::default();
        let mut stats = OptimizationStats::default();
        let mut order: Vec<usize> = (0..preferences.len()).collect();

        for trial in 0..self.config.trials {
            if trial > 0 {
                order.shuffle(rng);
            }

            let assignment = run_trial(preferences, &order);
            let score = assignment.score();
            stats.trials_run += 1;

            // Strictly greater only: ties keep the earlier result
            if score > best.score {
                debug!(
                    trial,
                    teams = score.teams_covered,
                    structures = score.structures_covered,
                    "new best assignment"
                );
                best = BestResult { assignment, score };
                stats.improvements += 1;
                stats.best_trial = Some(trial);
                stats.history.push(Improvement { trial, score });
            }
        }

        info!(
            trials = stats.trials_run,
            teams = best.score.teams_covered,
            structures = best.score.structures_covered,
            "optimization finished"
        );

        OptimizationReport { best, stats }
    }
}

/// Pair teams once with the map's entries visited in `order`.
///
/// `order` holds positions into `preferences`. Positions past the end are skipped.
pub fn run_trial(preferences: &PreferenceMap, order: &[usize]) -> Assignment {
    let entries = preferences.as_slice();
    let index = invert_entries(order.iter().filter_map(|&i| entries.get(i)));
    assign_pairs(&index)
}

/// Optimize with `config`, as a one-shot call
pub fn optimize(preferences: &PreferenceMap, config: &PairingConfig) -> OptimizationReport {
    Optimizer::new(config.clone()).optimize(preferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::invert;

    fn prefs(rows: &[(&str, &[&str])]) -> PreferenceMap {
        rows.iter()
            .map(|(team, structures)| (*team, structures.to_vec()))
            .collect()
    }

    fn seeded(trials: usize, seed: u64) -> Optimizer {
        Optimizer::new(PairingConfig::default().with_trials(trials).with_seed(seed))
    }

    #[test]
    fn test_shared_team_scenario() {
        let map = prefs(&[("A", &["x", "y"]), ("B", &["x"]), ("C", &["y"])]);
        let report = seeded(5000, 1).optimize(&map);

        assert_eq!(report.best.score, Score::new(2, 1));
        assert_eq!(report.stats.trials_run, 5000);
    }

    #[test]
    fn test_single_structure_forms_two_pairs() {
        let map = prefs(&[("A", &["x"]), ("B", &["x"]), ("C", &["x"]), ("D", &["x"])]);
        let report = seeded(5000, 2).optimize(&map);

        assert_eq!(report.best.score, Score::new(4, 1));
        assert_eq!(report.best.assignment.get("x").map(|p| p.len()), Some(2));
    }

    #[test]
    fn test_empty_preferences() {
        let report = seeded(100, 3).optimize(&PreferenceMap::new());

        assert_eq!(report.best, BestResult::default());
        assert_eq!(report.stats.trials_run, 100);
        assert_eq!(report.stats.improvements, 0);
        assert_eq!(report.stats.best_trial, None);
    }

    #[test]
    fn test_zero_trials_keeps_initial_state() {
        let map = prefs(&[("A", &["x"]), ("B", &["x"])]);
        let report = seeded(0, 4).optimize(&map);

        assert_eq!(report.best.score, Score::default());
        assert!(report.best.assignment.is_empty());
        assert_eq!(report.stats, OptimizationStats::default());
    }

    #[test]
    fn test_single_trial_matches_direct_pairing() {
        let map = prefs(&[
            ("A", &["x", "y"]),
            ("B", &["x"]),
            ("C", &["y", "z"]),
            ("D", &["z", "x"]),
            ("E", &["y"]),
        ]);
        let direct = assign_pairs(&invert(&map));
        let report = seeded(1, 5).optimize(&map);

        assert_eq!(report.best.assignment, direct);
        assert_eq!(report.best.score, direct.score());
    }

    #[test]
    fn test_shuffling_finds_better_ordering() {
        let map = prefs(&[("A", &["x", "y"]), ("B", &["x"]), ("C", &["y"]), ("D", &["x"])]);

        // Given order: x is seen first and takes A, leaving C with nobody
        assert_eq!(assign_pairs(&invert(&map)).score(), Score::new(2, 1));

        let report = seeded(200, 6).optimize(&map);
        assert_eq!(report.best.score, Score::new(4, 2));
        assert_eq!(report.stats.history[0], Improvement { trial: 0, score: Score::new(2, 1) });
        assert!(report.stats.best_trial.unwrap() > 0);
    }

    #[test]
    fn test_history_is_monotonic() {
        let map = prefs(&[
            ("A", &["x", "y"]),
            ("B", &["y", "z"]),
            ("C", &["z", "w"]),
            ("D", &["w", "x"]),
            ("E", &["x", "z"]),
            ("F", &["y", "w"]),
            ("G", &["v"]),
            ("H", &["v", "x"]),
        ]);
        let report = seeded(500, 7).optimize(&map);
        let history = &report.stats.history;

        assert!(!history.is_empty());
        for window in history.windows(2) {
            assert!(window[1].score > window[0].score);
            assert!(window[1].trial > window[0].trial);
        }
        let last = history.last().unwrap();
        assert_eq!(last.score, report.best.score);
        assert_eq!(Some(last.trial), report.stats.best_trial);
        assert_eq!(report.stats.improvements, history.len());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let map = prefs(&[
            ("A", &["x", "y"]),
            ("B", &["y"]),
            ("C", &["x", "z"]),
            ("D", &["z"]),
            ("E", &["y", "z"]),
            ("F", &["x"]),
        ]);
        let first = seeded(300, 99).optimize(&map);
        let second = seeded(300, 99).optimize(&map);

        assert_eq!(first, second);
    }

    #[test]
    fn test_run_trial_respects_order() {
        let map = prefs(&[("A", &["x", "y"]), ("B", &["x"]), ("C", &["y"])]);

        let given = run_trial(&map, &[0, 1, 2]);
        assert_eq!(given.get("x"), Some(&[Pair::new("A", "B")][..]));

        let reordered = run_trial(&map, &[2, 0, 1]);
        assert_eq!(reordered.get("y"), Some(&[Pair::new("C", "A")][..]));
        assert_eq!(reordered.get("x"), None);
    }

    #[test]
    fn test_run_trial_skips_positions_past_end() {
        let map = prefs(&[("A", &["x"]), ("B", &["x"])]);

        let assignment = run_trial(&map, &[0, 5, 1, 2]);
        assert_eq!(assignment.get("x"), Some(&[Pair::new("A", "B")][..]));

        let lone = prefs(&[("A", &["x"])]);
        assert!(run_trial(&lone, &[0, 5]).is_empty());
    }
}
