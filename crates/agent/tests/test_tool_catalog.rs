//! Tests for the tool catalog

use savant_agent::ToolCatalog;
use savant_provider::ToolDefinition;
use serde_json::json;

fn tool(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::new(name, description, json!({"type": "object"}))
}

#[test]
fn test_catalog_new() {
    let catalog = ToolCatalog::new();
    assert!(catalog.is_empty());
    assert!(catalog.names().is_empty());
}

#[test]
fn test_catalog_default() {
    let catalog: ToolCatalog = Default::default();
    assert_eq!(catalog.len(), 0);
}

#[test]
fn test_catalog_keeps_declaration_order() {
    let catalog = ToolCatalog::new()
        .with(tool("search_papers", "search"))
        .with(tool("get_paper_details", "details"))
        .with(tool("database_stats", "stats"));

    assert_eq!(
        catalog.names(),
        vec!["search_papers", "get_paper_details", "database_stats"]
    );
    assert_eq!(catalog.definitions().len(), 3);
}

#[test]
fn test_catalog_register_replaces_same_name() {
    let mut catalog = ToolCatalog::new();
    catalog.register(tool("search_papers", "old"));
    catalog.register(tool("list_recent_papers", "recent"));
    catalog.register(tool("search_papers", "new"));

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("search_papers").unwrap().description, "new");
    assert_eq!(catalog.names(), vec!["search_papers", "list_recent_papers"]);
}

#[test]
fn test_catalog_has() {
    let catalog = ToolCatalog::new().with(tool("search_papers", ""));
    assert!(catalog.has("search_papers"));
    assert!(!catalog.has("web_search"));
    assert!(catalog.get("web_search").is_none());
}

#[test]
fn test_catalog_from_json() {
    let catalog = ToolCatalog::from_json(json!([
        {
            "name": "search_papers",
            "description": "Search the paper database",
            "input_schema": {"type": "object", "required": ["query"]}
        },
        {
            "name": "database_stats",
            "description": "Database statistics",
            "input_schema": {"type": "object"}
        }
    ]))
    .unwrap();

    assert_eq!(catalog.names(), vec!["search_papers", "database_stats"]);
    assert_eq!(
        catalog.get("search_papers").unwrap().input_schema["required"][0],
        "query"
    );
}

#[test]
fn test_catalog_from_json_rejects_bad_entries() {
    assert!(ToolCatalog::from_json(json!([{"description": "no name"}])).is_err());
    assert!(ToolCatalog::from_json(json!({"name": "x"})).is_err());
}
