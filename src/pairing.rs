use crate::types::{Assignment, Pair, ResourceIndex};
use std::collections::HashSet;
use tracing::trace;

/// Outcome of one greedy pass over a resource index
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairingPass {
    pub assignment: Assignment,
    /// Rounds that formed at least one pair. The closing empty round is not counted.
    pub rounds: usize,
}

/// Pair teams under the structures of `index`, greedily, to a fixed point.
pub fn assign_pairs(index: &ResourceIndex<'_>) -> Assignment {
    run_pass(index).assignment
}

/// Greedy round-based pairing.
///
/// Each round visits structures in index order and takes at most one new pair
/// per structure: the first 2-combination of its candidate list (in list
/// order) where neither team is paired yet. Rounds repeat until one forms
/// nothing. A team is paired at most once across all structures.
pub fn run_pass(index: &ResourceIndex<'_>) -> PairingPass {
    let mut assignment = Assignment::new();
    let mut paired: HashSet<&str> = HashSet::new();
    let mut rounds = 0;

    loop {
        let mut formed = 0;

        for (structure, teams) in index.iter() {
            // Can't make a pair with 1 team
            if teams.len() < 2 {
                continue;
            }

            if let Some((first, second)) = first_open_pair(teams, &paired) {
                paired.insert(first);
                paired.insert(second);
                assignment.record(structure, Pair::new(first, second));
                formed += 1;
            }
        }

        if formed == 0 {
            break;
        }
        rounds += 1;
        trace!(round = rounds, formed, paired = paired.len(), "pairing round");
    }

    PairingPass { assignment, rounds }
}

/// First combination `(teams[i], teams[j])`, `i < j`, of two distinct unpaired teams.
///
/// A team listed twice under one structure yields a combination with itself;
/// those are skipped.
fn first_open_pair<'a>(teams: &[&'a str], paired: &HashSet<&str>) -> Option<(&'a str, &'a str)> {
    for (i, &first) in teams.iter().enumerate() {
        if paired.contains(first) {
            continue;
        }
        for &second in &teams[i + 1..] {
            if second != first && !paired.contains(second) {
                return Some((first, second));
            }
        }
    }
    None
}
