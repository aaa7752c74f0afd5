//! Plain-text rendering of a [`Report`].

use std::fmt::Write;

use crate::pipeline::Report;

pub fn render(report: &Report) -> String {
    let mut out = String::new();
    let s = report.stats;
    let _ = writeln!(
        out,
        "Graph: {} vertices, {} edges from {} records ({} skipped)",
        s.vertices, s.edges, s.records, s.malformed
    );

    let _ = writeln!(out, "\nTop {} entities by PageRank:", report.top_entities.len());
    if !report.page_rank_converged {
        let _ = writeln!(
            out,
            "  (warning: did not converge after {} iterations)",
            report.page_rank_iterations
        );
    }
    for (rank, entity) in report.top_entities.iter().enumerate() {
        let _ = writeln!(out, "{:>4}. {:<30} {:.6}", rank + 1, entity.name, entity.score);
    }

    let _ = writeln!(out, "\nDetected {} communities:", report.component_count);
    for group in &report.components {
        let more = group.size - group.members.len();
        let _ = write!(
            out,
            "Community {} ({} members): {}",
            group.component_id,
            group.size,
            group.members.join(", ")
        );
        if more > 0 {
            let _ = write!(out, ", ... {more} more");
        }
        out.push('\n');
    }
    out
}
