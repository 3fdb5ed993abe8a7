//! Output formatting for finished optimizations.
//!
//! Text output is a summary line followed by one tab-separated row per pair:
//!
//! ```text
//! 4 teams assigned to 2 data structures
//! x	B	D
//! y	C	A
//! ```

use crate::types::{BestResult, OptimizationReport, OptimizationStats, Score};
use serde::Serialize;

/// One output row
#[derive(Debug, Serialize)]
pub struct PairRow<'a> {
    pub structure: &'a str,
    pub first: &'a str,
    pub second: &'a str,
}

/// JSON shape of a finished optimization
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub score: Score,
    pub summary: String,
    pub pairs: Vec<PairRow<'a>>,
    pub stats: &'a OptimizationStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpaired: Option<&'a [&'a str]>,
}

pub fn summary_line(score: Score) -> String {
    format!(
        "{} teams assigned to {} data structures",
        score.teams_covered, score.structures_covered
    )
}

pub fn pair_rows(best: &BestResult) -> Vec<PairRow<'_>> {
    best.assignment
        .rows()
        .map(|(structure, pair)| PairRow {
            structure,
            first: &pair.first,
            second: &pair.second,
        })
        .collect()
}

/// Summary line plus one `structure\tteam\tteam` line per pair
pub fn render(best: &BestResult) -> String {
    let mut out = summary_line(best.score);
    out.push('\n');
    for row in pair_rows(best) {
        out.push_str(&format!("{}\t{}\t{}\n", row.structure, row.first, row.second));
    }
    out
}

/// Trailer listing teams that ended up without a partner
pub fn render_unpaired(unpaired: &[&str]) -> String {
    if unpaired.is_empty() {
        "# unpaired: (none)\n".to_string()
    } else {
        format!("# unpaired: {}\n", unpaired.join(" "))
    }
}

pub fn to_json(
    report: &OptimizationReport,
    unpaired: Option<&[&str]>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        score: report.best.score,
        summary: summary_line(report.best.score),
        pairs: pair_rows(&report.best),
        stats: &report.stats,
        unpaired,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assignment, Pair};

    fn best_of(rows: &[(&str, &str, &str)]) -> BestResult {
        let mut assignment = Assignment::new();
        for (structure, a, b) in rows {
            assignment.record(structure, Pair::new(*a, *b));
        }
        BestResult {
            score: assignment.score(),
            assignment,
        }
    }

    #[test]
    fn test_render_single_pair() {
        let best = best_of(&[("x", "A", "B")]);
        assert_eq!(render(&best), "2 teams assigned to 1 data structures\nx\tA\tB\n");
    }

    #[test]
    fn test_render_multiple_pairs_per_structure() {
        let best = best_of(&[("x", "A", "B"), ("y", "E", "F"), ("x", "C", "D")]);
        assert_eq!(
            render(&best),
            "6 teams assigned to 2 data structures\nx\tA\tB\nx\tC\tD\ny\tE\tF\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render(&BestResult::default()),
            "0 teams assigned to 0 data structures\n"
        );
    }

    #[test]
    fn test_render_unpaired() {
        assert_eq!(render_unpaired(&["C", "D"]), "# unpaired: C D\n");
        assert_eq!(render_unpaired(&[]), "# unpaired: (none)\n");
    }

    #[test]
    fn test_json_shape() {
        let report = OptimizationReport {
            best: best_of(&[("x", "A", "B")]),
            stats: OptimizationStats {
                trials_run: 3,
                ..Default::default()
            },
        };
        let json = to_json(&report, Some(&["C"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["score"]["teams_covered"], 2);
        assert_eq!(value["score"]["structures_covered"], 1);
        assert_eq!(value["summary"], "2 teams assigned to 1 data structures");
        assert_eq!(value["pairs"][0]["structure"], "x");
        assert_eq!(value["pairs"][0]["second"], "B");
        assert_eq!(value["stats"]["trials_run"], 3);
        assert_eq!(value["unpaired"][0], "C");

        let json = to_json(&report, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("unpaired").is_none());
    }
}
