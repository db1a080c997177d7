//! Human-oriented progress lines for tool activity

use serde_json::Value;
use tracing::{debug, info};

use crate::tools::ToolOutcome;
use crate::turn::ToolRequest;

/// Log a tool request; `info` when verbose, `debug` otherwise
pub fn report_request(verbose: bool, request: &ToolRequest) {
    let source = request.server_name.as_deref().unwrap_or("local");
    let details = argument_lines(&request.name, &request.input).join("; ");
    if verbose {
        info!("[{}] {} {}", source, request.name, details);
    } else {
        debug!("[{}] {} {}", source, request.name, details);
    }
}

/// Log the outcome of a tool request
pub fn report_outcome(verbose: bool, request: &ToolRequest, outcome: &ToolOutcome) {
    let summary = if outcome.is_error {
        outcome.content.clone()
    } else {
        summarize_result(&outcome.content).unwrap_or_else(|| "Results retrieved".to_string())
    };
    if verbose {
        info!("  {} -> {}", request.name, summary);
    } else {
        debug!("  {} -> {}", request.name, summary);
    }
}

/// Short description of the arguments of well-known research tools
pub fn argument_lines(name: &str, input: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    match name {
        "search_papers" | "search_articles" => {
            lines.push(format!("Query: {}", str_arg(input, "query")));
            if let Some(section) = input.get("filter_section").and_then(Value::as_str) {
                lines.push(format!("Section: {}", section));
            }
            if let Some(year) = input.get("min_year").and_then(Value::as_i64) {
                lines.push(format!("Min year: {}", year));
            }
        }
        "semantic_search" | "semanticSearch" => {
            let query = input
                .get("query")
                .or_else(|| input.get("search_query"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            lines.push(format!("Query: {}", query));
        }
        "get_paper_details" | "get_paper_pdf" => {
            lines.push(format!("BibTeX key: {}", str_arg(input, "bibtex_key")));
        }
        "list_recent_papers" => {
            let n = input.get("n").and_then(Value::as_u64).unwrap_or(10);
            lines.push(format!("Count: {}", n));
        }
        "generate_bibliography" => {
            lines.push(format!("Keys: {}", truncated_list(input, "bibtex_keys", 5)));
        }
        "get_article_metadata" => {
            lines.push(format!("PMIDs: {}", truncated_list(input, "pmids", 5)));
        }
        "get_full_text_article" => {
            lines.push(format!("PMC IDs: {}", truncated_list(input, "pmc_ids", 3)));
        }
        "find_related_articles" => {
            lines.push(format!(
                "Finding related to: {}",
                truncated_list(input, "pmids", 3)
            ));
        }
        _ => {}
    }
    lines
}

/// One-line summary of a JSON tool result, when it has a recognizable shape
pub fn summarize_result(content: &str) -> Option<String> {
    let data: Value = match serde_json::from_str(content) {
        Ok(data) => data,
        Err(_) => {
            return if content.contains("No results") || content.contains("0 results") {
                Some("Found: 0 results".to_string())
            } else {
                None
            };
        }
    };

    for (key, label) in [("articles", "articles"), ("results", "results"), ("papers", "papers")] {
        if let Some(items) = data.get(key).and_then(Value::as_array) {
            return Some(format!("Found: {} {}", items.len(), label));
        }
    }
    if let Some(total) = data.get("total_count") {
        return Some(format!("Total matches: {}", total));
    }
    if let Some(total) = data.get("total_papers") {
        return Some(format!("Database: {} papers", total));
    }
    None
}

fn str_arg<'a>(input: &'a Value, key: &str) -> &'a str {
    input.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn truncated_list(input: &Value, key: &str, limit: usize) -> String {
    let items: Vec<&str> = input
        .get(key)
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let shown = items.iter().take(limit).copied().collect::<Vec<_>>().join(", ");
    if items.len() > limit {
        format!("{}...", shown)
    } else {
        shown
    }
}
