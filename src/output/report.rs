//! End-of-run reporting and link-list export

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::extract::QuestionRecord;
use crate::fetch::RunReport;
use crate::output::OutputResult;

/// Prints the run report to stdout
///
/// The scheduled-vs-produced line is the operator's signal for silent
/// partial loss: every scheduled question that produced no record was an
/// absorbed per-item failure.
pub fn print_run_report(report: &RunReport) {
    println!("=== Harvest Report ===\n");

    println!("Provider: {}", report.provider);
    if report.filter.is_empty() {
        println!("Filter:   (all questions)");
    } else {
        println!("Filter:   {}", report.filter);
    }
    println!(
        "Source:   {}",
        if report.from_cache { "cache" } else { "live" }
    );
    println!();

    if !report.from_cache {
        println!("Listing pages scanned: {}", report.pages_scanned);
        println!("Links discovered:      {}", report.links_discovered);
    }
    println!("Questions scheduled:   {}", report.scheduled);
    println!("Questions produced:    {}", report.produced);

    if report.lost() > 0 {
        println!(
            "Questions lost:        {} (see warnings above)",
            report.lost()
        );
    }

    let success_rate = if report.scheduled > 0 {
        (report.produced as f64 / report.scheduled as f64) * 100.0
    } else {
        0.0
    };
    println!("Success rate:          {:.1}%", success_rate);
    println!();
    println!("Time elapsed: {:.1}s", report.duration_seconds());
}

/// Saves the source link of every record to a file, one per line
pub fn save_links(path: &Path, records: &[QuestionRecord]) -> OutputResult<()> {
    let mut file = File::create(path)?;
    for record in records {
        writeln!(file, "{}", record.link)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.txt");

        let records = vec![
            QuestionRecord {
                title: "Q1".to_string(),
                content: String::new(),
                choices: vec![],
                answer: String::new(),
                timestamp: String::new(),
                link: "https://example.com/d/p/1".to_string(),
                comments: String::new(),
            },
            QuestionRecord {
                title: "Q2".to_string(),
                content: String::new(),
                choices: vec![],
                answer: String::new(),
                timestamp: String::new(),
                link: "https://example.com/d/p/2".to_string(),
                comments: String::new(),
            },
        ];

        save_links(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "https://example.com/d/p/1\nhttps://example.com/d/p/2\n"
        );
    }
}
