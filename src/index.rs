use crate::types::{PreferenceMap, ResourceIndex, TeamPreferences};

/// Invert team -> structures into structure -> teams.
///
/// Teams are appended team-major in the map's iteration order, so every
/// structure's candidate list reflects the order of `preferences`. A team
/// that lists a structure twice appears twice under it.
pub fn invert(preferences: &PreferenceMap) -> ResourceIndex<'_> {
    invert_entries(preferences)
}

/// Same as [`invert`] over entries in whatever order the caller yields them.
pub fn invert_entries<'a, I>(entries: I) -> ResourceIndex<'a>
where
    I: IntoIterator<Item = &'a TeamPreferences>,
{
    let mut index = ResourceIndex::new();
    for entry in entries {
        for structure in &entry.structures {
            index.push(structure, &entry.team);
        }
    }
    index
}
