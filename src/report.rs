use std::fmt::Write;

use crate::pipeline::PipelineRun;
use crate::types::Category;

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Console report of a ranking run
pub fn render_report(run: &PipelineRun, top_n: usize) -> String {
    let summary = &run.summary;
    let total = summary.total_records;
    let mut out = String::new();

    let _ = writeln!(out, "\n📊 Ranking Results:");
    let _ = writeln!(out, "   Total auctioneers: {}", total);
    let _ = writeln!(out, "   Skipped entries: {}", summary.skipped_records);
    let _ = writeln!(out, "   With valid site: {}", summary.with_site);
    let _ = writeln!(out, "   Corporate emails: {}", summary.corporate_emails);
    let _ = writeln!(out, "   Mean TechScore: {:.1}", summary.mean_tech_score);

    let _ = writeln!(out, "\n📈 By category:");
    for category in Category::ALL {
        let count = summary.category_counts.get(category);
        let _ = writeln!(
            out,
            "   • {} [{}]: {} ({:.1}%)",
            category.label(),
            category,
            count,
            percent(count, total)
        );
    }

    let _ = writeln!(
        out,
        "\n💡 Outreach opportunities: {} ({:.1}%)",
        summary.opportunities,
        percent(summary.opportunities, total)
    );

    if top_n > 0 && total > 0 {
        let _ = writeln!(out, "\n🏆 Top {} by TechScore:", top_n.min(total));
        for scored in run.ranked().iter().take(top_n) {
            let _ = writeln!(
                out,
                "   • {} - {} - {}{}",
                scored.record.name,
                scored.tech_score,
                scored.category,
                scored
                    .record
                    .site
                    .as_deref()
                    .map(|site| format!(" - {site}"))
                    .unwrap_or_default()
            );
        }
    }

    if !run.skipped.is_empty() {
        let _ = writeln!(out, "\n⚠️  Skipped entries:");
        for (position, reason) in &run.skipped {
            let _ = writeln!(out, "   - entry {}: {}", position, reason);
        }
    }

    out
}
