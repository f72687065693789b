pub mod config;
pub mod preprocess;
pub mod process;
pub mod timeline;

use std::path::Path;

use scoretrack_score_model::report::TrackingReport;

/// Write `report` as pretty JSON to `output`, or to stdout.
pub fn write_report(report: &TrackingReport, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| anyhow::anyhow!("Failed to serialize report: {e}"))?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            print_summary(report);
            println!("  Report written to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(report: &TrackingReport) {
    let summary = &report.summary;
    println!(
        "  Frames: {} sampled, {} with a score",
        report.frames_processed, report.scores_read
    );
    println!(
        "  Score changes: {} (avg +{:.2} per change)",
        summary.score_count, summary.avg_score_per_change
    );
    println!("  Final score: {}", report.total_score);
    if let (Some(first), Some(last)) = (summary.first_score_time, summary.last_score_time) {
        println!("  Scoring window: {first:.2}s to {last:.2}s");
    }
}
