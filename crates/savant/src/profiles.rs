//! Research profiles: which tools a run gets and how the model is briefed

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde_json::json;
use tracing::warn;

use savant_agent::{DispatchMode, ToolCatalog};
use savant_config::Config;
use savant_provider::McpServer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Personal paper database through the job endpoint
    Papers,
    /// PubMed gateway
    Pubmed,
    /// Scholar Gateway (Wiley journals)
    Scholar,
    /// Every configured gateway
    Unified,
}

impl Profile {
    /// Parse a profile name as stored in the config file
    pub fn parse(name: &str) -> Result<Self> {
        match <Self as ValueEnum>::from_str(name, true) {
            Ok(profile) => Ok(profile),
            Err(_) => bail!(
                "unknown profile '{}' (expected papers, pubmed, scholar or unified)",
                name
            ),
        }
    }

    pub fn mode(self) -> DispatchMode {
        match self {
            Profile::Papers => DispatchMode::Local,
            _ => DispatchMode::Delegated,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Profile::Papers => "Paper Database Research Agent",
            Profile::Pubmed => "PubMed Research Agent",
            Profile::Scholar => "Scholar Gateway Research Agent",
            Profile::Unified => "Unified Research Agent",
        }
    }

    /// Gateways a delegated profile uses; `None` means all of them
    fn gateway_names(self) -> Option<&'static [&'static str]> {
        match self {
            Profile::Papers | Profile::Unified => None,
            Profile::Pubmed => Some(&["pubmed"]),
            Profile::Scholar => Some(&["scholar_gateway"]),
        }
    }

    pub fn system_prompt(self) -> String {
        let (intro, workflow, citation) = match self {
            Profile::Papers => (PAPERS_INTRO, PAPERS_WORKFLOW, PAPERS_CITATION),
            Profile::Pubmed => (PUBMED_INTRO, PUBMED_WORKFLOW, PUBMED_CITATION),
            Profile::Scholar => (SCHOLAR_INTRO, SCHOLAR_WORKFLOW, SCHOLAR_CITATION),
            Profile::Unified => (UNIFIED_INTRO, UNIFIED_WORKFLOW, UNIFIED_CITATION),
        };
        format!(
            "{}\n\n{}\n\n{}\n\n{}\n\n{}",
            intro, RULES, workflow, citation, NO_RESULTS
        )
    }
}

const RULES: &str = "CRITICAL RULES:
1. Only use information retrieved with your tools to answer questions.
2. Never use internal knowledge to provide facts, statistics, or claims about research.
3. If you cannot find relevant information, say so clearly.
4. Always cite your sources.";

const NO_RESULTS: &str = "If searches return no results or insufficient information:
- Try alternative search terms or broader queries
- If still unsuccessful, clearly state what you searched and that nothing relevant was found
- Do not fall back on internal knowledge to answer the question";

const PAPERS_INTRO: &str = "You are a research assistant that answers questions using ONLY \
information from the user's paper database, a curated collection of indexed research papers \
searchable by meaning across paper sections.";

const PAPERS_WORKFLOW: &str = "WORKFLOW:
1. Use search_papers to find relevant papers, filtering by section (Methods, Results, \
Discussion, Introduction) or min_year when useful
2. Use get_paper_details for promising papers
3. Use database_stats or list_recent_papers to see what is available
4. Synthesize findings only from the retrieved papers";

const PAPERS_CITATION: &str = "CITATION FORMAT: author names, title, year and BibTeX key, \
e.g. \"Smith et al. found that... (Smith2024)\"";

const PUBMED_INTRO: &str = "You are a biomedical research assistant that answers questions \
using ONLY information from PubMed.";

const PUBMED_WORKFLOW: &str = "WORKFLOW:
1. Use search_articles to find relevant papers, trying several search strategies
2. Use get_article_metadata to read abstracts of promising articles
3. Use find_related_articles to discover more papers when needed
4. Synthesize findings only from the retrieved articles";

const PUBMED_CITATION: &str = "CITATION FORMAT: author names, title, journal, year, PMID and \
DOI when available, e.g. \"Smith et al. found that... (PMID: 12345678, DOI: 10.1000/example)\"";

const SCHOLAR_INTRO: &str = "You are an academic research assistant that answers questions \
using ONLY information from Scholar Gateway, which covers over 3 million articles from more \
than 1,300 Wiley journals.";

const SCHOLAR_WORKFLOW: &str = "WORKFLOW:
1. Use semantic_search with natural language queries, rephrasing when results are thin
2. Analyze the returned article content and metadata
3. Synthesize findings only from the retrieved articles";

const SCHOLAR_CITATION: &str = "CITATION FORMAT: author names, title, journal, year and DOI \
when available, e.g. \"Smith et al. found that... (DOI: 10.1002/example)\"";

const UNIFIED_INTRO: &str = "You are an academic research assistant that answers questions \
using ONLY information from these research databases:
- PubMed (pubmed): biomedical literature; search_articles, get_article_metadata, \
find_related_articles
- Paper RAG (paper_rag): the user's personal library; search_papers, get_paper_details, \
database_stats, list_recent_papers, generate_bibliography
- Scholar Gateway (scholar_gateway): Wiley journals across disciplines; semantic_search";

const UNIFIED_WORKFLOW: &str = "WORKFLOW:
1. Decide which database(s) fit the question, searching several for broad coverage
2. Retrieve details for promising results
3. Synthesize findings only from the retrieved articles and papers";

const UNIFIED_CITATION: &str = "CITATION FORMAT: author names, title, journal, year, plus PMID \
and DOI (PubMed), BibTeX key (Paper RAG) or DOI (Scholar Gateway)";

/// Tools served by the paper database job endpoint
pub fn papers_catalog() -> Result<ToolCatalog> {
    let catalog = ToolCatalog::from_json(json!([
        {
            "name": "search_papers",
            "description": "Semantic search across paper sections. Returns relevant chunks with paper metadata.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query string (natural language)"},
                    "n_results": {"type": "integer", "description": "Number of results to return (1-20)", "default": 5},
                    "filter_section": {
                        "type": "string",
                        "description": "Filter by section type",
                        "enum": ["Methods", "Results", "Discussion", "Introduction"]
                    },
                    "min_year": {"type": "integer", "description": "Only papers from this year onwards"},
                    "output_format": {"type": "string", "enum": ["text", "json"], "default": "text"}
                },
                "required": ["query"]
            }
        },
        {
            "name": "get_paper_details",
            "description": "Retrieve complete information about a paper including metadata and BibTeX entry.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "bibtex_key": {"type": "string", "description": "The BibTeX key of the paper (e.g., 'Smith2024')"}
                },
                "required": ["bibtex_key"]
            }
        },
        {
            "name": "list_recent_papers",
            "description": "Show recently added papers in the database.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "n": {"type": "integer", "description": "Number of papers to show", "default": 10}
                }
            }
        },
        {
            "name": "database_stats",
            "description": "Get statistics about the paper database including paper count and year distribution.",
            "input_schema": {"type": "object", "properties": {}}
        },
        {
            "name": "generate_bibliography",
            "description": "Create a BibTeX bibliography for specified papers.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "bibtex_keys": {"type": "array", "items": {"type": "string"}},
                    "include_abstracts": {"type": "boolean", "default": false}
                },
                "required": ["bibtex_keys"]
            }
        },
        {
            "name": "get_paper_pdf",
            "description": "Retrieve the PDF file for a paper as base64-encoded data.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "bibtex_key": {"type": "string", "description": "The BibTeX key of the paper"}
                },
                "required": ["bibtex_key"]
            }
        }
    ]))?;
    Ok(catalog)
}

/// Gateway descriptors for a delegated profile
pub fn gateway_servers(profile: Profile, config: &Config) -> Result<Vec<McpServer>> {
    let selected: Vec<_> = match profile.gateway_names() {
        None => config.gateways.iter().collect(),
        Some(names) => {
            let mut selected = Vec::new();
            for name in names {
                match config.gateway(name) {
                    Some(gateway) => selected.push(gateway),
                    None => bail!("gateway '{}' is not configured", name),
                }
            }
            selected
        }
    };

    if selected.is_empty() {
        bail!("no tool gateways configured");
    }

    Ok(selected
        .into_iter()
        .map(|gateway| {
            if gateway.missing_token() {
                warn!(
                    "{} not set; {} will be offered without a token",
                    gateway.token_env.as_deref().unwrap_or("token"),
                    gateway.name
                );
            }
            McpServer::url(&gateway.name, &gateway.url)
                .with_token(gateway.authorization_token.clone())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        assert_eq!(Profile::parse("papers").unwrap(), Profile::Papers);
        assert_eq!(Profile::parse("PubMed").unwrap(), Profile::Pubmed);
        assert!(Profile::parse("arxiv").is_err());
    }

    #[test]
    fn test_profile_modes() {
        assert_eq!(Profile::Papers.mode(), DispatchMode::Local);
        assert_eq!(Profile::Pubmed.mode(), DispatchMode::Delegated);
        assert_eq!(Profile::Scholar.mode(), DispatchMode::Delegated);
        assert_eq!(Profile::Unified.mode(), DispatchMode::Delegated);
    }

    #[test]
    fn test_papers_catalog() {
        let catalog = papers_catalog().unwrap();
        assert_eq!(
            catalog.names(),
            vec![
                "search_papers",
                "get_paper_details",
                "list_recent_papers",
                "database_stats",
                "generate_bibliography",
                "get_paper_pdf"
            ]
        );
    }

    #[test]
    fn test_system_prompts_name_their_tools() {
        assert!(Profile::Papers.system_prompt().contains("search_papers"));
        assert!(Profile::Pubmed.system_prompt().contains("search_articles"));
        assert!(Profile::Scholar.system_prompt().contains("semantic_search"));
        let unified = Profile::Unified.system_prompt();
        assert!(unified.contains("pubmed") && unified.contains("scholar_gateway"));
        assert!(unified.contains("CRITICAL RULES"));
    }

    #[test]
    fn test_single_gateway_selection() {
        let config = Config::default();
        let servers = gateway_servers(Profile::Pubmed, &config).unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "pubmed");
        assert_eq!(servers[0].url, "https://pubmed.mcp.claude.com/mcp");
        assert!(servers[0].authorization_token.is_none());
    }

    #[test]
    fn test_unified_offers_gateways_without_tokens() {
        let mut config = Config::default();
        config.apply_env_with(|key| match key {
            "SCHOLAR_GATEWAY_TOKEN" => Some("sg-token".to_string()),
            _ => None,
        });

        let servers = gateway_servers(Profile::Unified, &config).unwrap();

        let names: Vec<&str> = servers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["pubmed", "paper_rag", "scholar_gateway"]);
        assert!(servers[1].authorization_token.is_none());
        assert_eq!(servers[2].authorization_token.as_deref(), Some("sg-token"));
    }

    #[test]
    fn test_missing_gateway_is_an_error() {
        let mut config = Config::default();
        config.gateways.retain(|g| g.name != "scholar_gateway");
        assert!(gateway_servers(Profile::Scholar, &config).is_err());

        config.gateways.clear();
        assert!(gateway_servers(Profile::Unified, &config).is_err());
    }
}
