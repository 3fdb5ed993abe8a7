use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub type TeamId = String;
pub type StructureId = String;

/// Number of randomized trials when nothing else is configured
pub const DEFAULT_TRIALS: usize = 5000;

/// One team and the structures it listed, in the order listed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPreferences {
    pub team: TeamId,
    pub structures: Vec<StructureId>,
}

/// Team -> preferred structures.
///
/// Iteration order is insertion order and is part of the contract: it decides
/// the order teams appear in each structure's candidate list after inversion.
/// Re-inserting an existing team replaces its structures in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferenceMap {
    entries: Vec<TeamPreferences>,
    positions: HashMap<TeamId, usize>,
}

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a team's structures, returning the previous list if the team
    /// was already present. The team keeps its original position.
    pub fn insert(
        &mut self,
        team: impl Into<TeamId>,
        structures: Vec<StructureId>,
    ) -> Option<Vec<StructureId>> {
        let team = team.into();
        match self.positions.get(&team) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].structures, structures)),
            None => {
                self.positions.insert(team.clone(), self.entries.len());
                self.entries.push(TeamPreferences { team, structures });
                None
            }
        }
    }

    pub fn get(&self, team: &str) -> Option<&[StructureId]> {
        self.positions
            .get(team)
            .map(|&pos| self.entries[pos].structures.as_slice())
    }

    pub fn contains_team(&self, team: &str) -> bool {
        self.positions.contains_key(team)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TeamPreferences> {
        self.entries.iter()
    }

    /// Team identifiers in iteration order
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.team.as_str())
    }

    pub fn as_slice(&self) -> &[TeamPreferences] {
        &self.entries
    }
}

impl<T, S> FromIterator<(T, Vec<S>)> for PreferenceMap
where
    T: Into<TeamId>,
    S: Into<StructureId>,
{
    fn from_iter<I: IntoIterator<Item = (T, Vec<S>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (team, structures) in iter {
            map.insert(team, structures.into_iter().map(Into::into).collect());
        }
        map
    }
}

impl<'a> IntoIterator for &'a PreferenceMap {
    type Item = &'a TeamPreferences;
    type IntoIter = std::slice::Iter<'a, TeamPreferences>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Structure -> teams that listed it, borrowed from a `PreferenceMap`.
///
/// Structures iterate in first-seen order. Team lists keep insertion order
/// and are never deduplicated or sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceIndex<'a> {
    entries: Vec<(&'a str, Vec<&'a str>)>,
    positions: HashMap<&'a str, usize>,
}

impl<'a> ResourceIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a team to a structure's candidate list, creating the entry if absent
    pub fn push(&mut self, structure: &'a str, team: &'a str) {
        match self.positions.get(structure) {
            Some(&pos) => self.entries[pos].1.push(team),
            None => {
                self.positions.insert(structure, self.entries.len());
                self.entries.push((structure, vec![team]));
            }
        }
    }

    pub fn get(&self, structure: &str) -> Option<&[&'a str]> {
        self.positions
            .get(structure)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a str])> + '_ {
        self.entries.iter().map(|(s, teams)| (*s, teams.as_slice()))
    }
}

/// Two distinct teams joined under one structure
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub first: TeamId,
    pub second: TeamId,
}

impl Pair {
    pub fn new(first: impl Into<TeamId>, second: impl Into<TeamId>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Pairs formed in one trial, keyed by structure.
///
/// Structures iterate in the order their first pair was recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    entries: Vec<(StructureId, Vec<Pair>)>,
    positions: HashMap<StructureId, usize>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, structure: &str, pair: Pair) {
        match self.positions.get(structure) {
            Some(&pos) => self.entries[pos].1.push(pair),
            None => {
                self.positions.insert(structure.to_string(), self.entries.len());
                self.entries.push((structure.to_string(), vec![pair]));
            }
        }
    }

    pub fn get(&self, structure: &str) -> Option<&[Pair]> {
        self.positions
            .get(structure)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Structures with their pairs, in recording order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Pair])> {
        self.entries.iter().map(|(s, pairs)| (s.as_str(), pairs.as_slice()))
    }

    /// Every pair with its structure, one item per output row
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Pair)> {
        self.entries
            .iter()
            .flat_map(|(s, pairs)| pairs.iter().map(move |p| (s.as_str(), p)))
    }

    pub fn pair_count(&self) -> usize {
        self.entries.iter().map(|(_, pairs)| pairs.len()).sum()
    }

    /// Every team that appears in some pair
    pub fn paired_teams(&self) -> HashSet<&str> {
        self.rows()
            .flat_map(|(_, p)| [p.first.as_str(), p.second.as_str()])
            .collect()
    }

    pub fn score(&self) -> Score {
        Score {
            teams_covered: 2 * self.pair_count(),
            structures_covered: self.entries.iter().filter(|(_, p)| !p.is_empty()).count(),
        }
    }
}

/// Optimization objective.
///
/// Field order matters: the derived `Ord` compares teams covered first and
/// only falls back to structures covered on a tie.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Score {
    pub teams_covered: usize,
    pub structures_covered: usize,
}

impl Score {
    pub fn new(teams_covered: usize, structures_covered: usize) -> Self {
        Self {
            teams_covered,
            structures_covered,
        }
    }
}

/// Best assignment seen so far and its score
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BestResult {
    pub assignment: Assignment,
    pub score: Score,
}

impl BestResult {
    /// Teams from `preferences`, in map order, that are not in any pair
    pub fn unpaired_teams<'a>(&self, preferences: &'a PreferenceMap) -> Vec<&'a str> {
        let paired = self.assignment.paired_teams();
        preferences
            .teams()
            .filter(|team| !paired.contains(team))
            .collect()
    }
}

/// One accepted improvement during optimization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    pub trial: usize,
    pub score: Score,
}

/// Bookkeeping for a finished optimization run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationStats {
    pub trials_run: usize,
    pub improvements: usize,
    /// Trial that produced the final best, if any trial improved on (0,0)
    pub best_trial: Option<usize>,
    pub history: Vec<Improvement>,
}

/// Result of `Optimizer::optimize`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptimizationReport {
    pub best: BestResult,
    pub stats: OptimizationStats,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Optimization parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Number of randomized trials to run
    pub trials: usize,
    /// Seed for the permutation source; `None` draws one from OS entropy
    pub seed: Option<u64>,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

impl PairingConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }
}

/// Random preference map for property tests: `teams` teams, each listing up
/// to four structures drawn (with repeats) from `structures` names.
#[cfg(test)]
pub(crate) fn random_preferences(
    rng: &mut impl rand::Rng,
    teams: usize,
    structures: usize,
) -> PreferenceMap {
    (0..teams)
        .map(|t| {
            let listed: Vec<String> = (0..rng.gen_range(0..=4))
                .map(|_| format!("s{}", rng.gen_range(0..structures.max(1))))
                .collect();
            (format!("T{t}"), listed)
        })
        .collect()
}
