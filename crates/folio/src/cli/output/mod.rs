//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use folio_index::{BatchSummary, DocumentSummary, IndexStats, SearchResult};
use serde::Serialize;

/// ANSI escape codes for terminal styling.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// JSON output for `folio search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// The query as typed.
    query: &'a str,
    /// Number of results returned.
    total_matches: usize,
    /// Ranked results.
    results: &'a [SearchResult],
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Outputs search results as text or JSON.
pub fn output_search_results(results: &[SearchResult], query: &str, json: bool) -> ExitCode {
    if json {
        return print_json(&JsonSearchOutput {
            query,
            total_matches: results.len(),
            results,
        });
    }

    if results.is_empty() {
        println!("{}", dim("No results found."));
        return ExitCode::SUCCESS;
    }

    for (rank, result) in results.iter().enumerate() {
        print!("{}", format_result(rank + 1, result));
    }
    ExitCode::SUCCESS
}

/// Formats one search hit as a text block.
fn format_result(rank: usize, result: &SearchResult) -> String {
    let mut out = format!(
        "{} {} {}\n",
        dim(&format!("{rank}.")),
        header(&result.file_name),
        dim(&format!("({:.3})", result.score))
    );
    out.push_str(&format!("   {}\n", dim(&result.file_path)));
    if !result.matched_pages.is_empty() {
        out.push_str(&format!(
            "   {} {}\n",
            subheader("pages:"),
            join_pages(&result.matched_pages)
        ));
    }
    if !result.snippet.is_empty() {
        out.push_str(&format!("   {}\n", result.snippet));
    }
    out.push('\n');
    out
}

/// Comma-separated page list.
fn join_pages(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outputs listed documents as a table or JSON.
pub fn output_documents(docs: &[DocumentSummary], json: bool) -> ExitCode {
    if json {
        return print_json(docs);
    }

    if docs.is_empty() {
        println!("{}", dim("No documents indexed."));
        return ExitCode::SUCCESS;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Name", "Type", "Size", "Pages", "Path"]);
    for doc in docs {
        table.add_row(vec![
            Cell::new(&doc.file_name),
            Cell::new(&doc.content_type),
            Cell::new(format_size(doc.file_size)),
            Cell::new(doc.page_count.map_or_else(|| "-".to_string(), |n| n.to_string())),
            Cell::new(&doc.file_path),
        ]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}

/// Outputs index statistics as text or JSON.
pub fn output_stats(stats: &IndexStats, json: bool) -> ExitCode {
    if json {
        return print_json(stats);
    }

    println!("{}", subheader("Index:"));
    println!("   documents: {}", stats.total_documents);
    println!("   deleted:   {}", stats.deleted_documents);
    println!("   max doc:   {}", stats.max_doc);
    println!("   segments:  {}", stats.segments);
    ExitCode::SUCCESS
}

/// Prints the outcome of an indexing run.
pub fn output_batch_summary(summary: &BatchSummary, discovery_skipped: usize) {
    println!(
        "Indexed {} file(s), skipped {}.",
        summary.indexed_count(),
        summary.failed_count() + discovery_skipped
    );
    for (id, reason) in summary.failures() {
        println!("   {} {}", warning("skipped"), dim(&format!("{id}: {reason}")));
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> SearchResult {
        SearchResult {
            document_id: "doc1".into(),
            file_path: "/archive/report.pdf".into(),
            file_name: "report.pdf".into(),
            content_type: "application/pdf".into(),
            score: 1.25,
            file_size: 10,
            last_modified: 0,
            indexed_at: 0,
            page_count: Some(2),
            matched_pages: vec![2],
            snippet: "Annual report discusses revenue growth".into(),
        }
    }

    #[test]
    fn result_block_mentions_pages_and_snippet() {
        let block = format_result(1, &result());
        assert!(block.contains("report.pdf"));
        assert!(block.contains("/archive/report.pdf"));
        assert!(block.contains("pages:"));
        assert!(block.contains("revenue growth"));
    }

    #[test]
    fn unpaged_result_has_no_pages_line() {
        let mut hit = result();
        hit.matched_pages.clear();
        assert!(!format_result(1, &hit).contains("pages:"));
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn pages_are_comma_separated() {
        assert_eq!(join_pages(&[1, 3, 4]), "1, 3, 4");
    }
}
