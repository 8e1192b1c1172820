//! Local catalog search backend
//!
//! Stands in for the hosted search engine: a flat list of records matched
//! case-insensitively against the query. Supports `*` wildcards
//! (`*.ext`, `prefix*`, `*text*`) and `;`-separated alternatives.

use crate::error::{ResiftError, Result};
use std::path::Path;

/// Outcome of one executed search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    /// First page of matching records
    pub hits: Vec<String>,
    /// Total number of matching records
    pub nb_hits: usize,
}

/// Executes queries for the search host
pub trait SearchBackend {
    fn search(&self, query: &str) -> Result<SearchResults>;
}

const SAMPLE_RECORDS: &[&str] = &[
    "Apple iPhone 15 Pro",
    "Apple AirPods Pro",
    "Samsung Galaxy S24",
    "Samsung 65\" QLED TV",
    "Sony WH-1000XM5 Headphones",
    "Sony PlayStation 5",
    "Nike Air Zoom Pegasus running shoes",
    "Adidas Ultraboost shoes",
    "New Balance 990 shoes",
    "Straw sun hat",
    "Wool beanie hat",
    "Canon EOS R6 camera",
    "Nikon Z6 II camera",
    "Logitech MX Master 3 mouse",
    "Dell UltraSharp 27 monitor",
    "Kindle Paperwhite",
    "Instant Pot Duo",
    "Dyson V15 vacuum",
];

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<String>,
    records_lower: Vec<String>,
    hits_per_page: usize,
}

impl Catalog {
    pub fn new(records: Vec<String>, hits_per_page: usize) -> Self {
        let records_lower = records.iter().map(|r| r.to_lowercase()).collect();
        Self {
            records,
            records_lower,
            hits_per_page,
        }
    }

    /// Small built-in product list
    pub fn sample(hits_per_page: usize) -> Self {
        Self::new(
            SAMPLE_RECORDS.iter().map(|s| s.to_string()).collect(),
            hits_per_page,
        )
    }

    /// Load records from a JSON array of strings
    pub fn load(path: &Path, hits_per_page: usize) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ResiftError::CatalogLoad(path.to_path_buf(), e.to_string()))?;
        let records: Vec<String> = serde_json::from_str(&contents)
            .map_err(|e| ResiftError::CatalogLoad(path.to_path_buf(), e.to_string()))?;
        Ok(Self::new(records, hits_per_page))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SearchBackend for Catalog {
    fn search(&self, query: &str) -> Result<SearchResults> {
        let raw_query = query.trim().to_lowercase();
        let patterns: Vec<&str> = raw_query
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let matching: Vec<&String> = self
            .records
            .iter()
            .zip(&self.records_lower)
            .filter(|(_, lower)| patterns.is_empty() || patterns.iter().any(|p| matches_pattern(lower, p)))
            .map(|(record, _)| record)
            .collect();

        Ok(SearchResults {
            query: query.to_string(),
            nb_hits: matching.len(),
            hits: matching
                .into_iter()
                .take(self.hits_per_page)
                .cloned()
                .collect(),
        })
    }
}

/// Check if a record matches a pattern.
/// Supports `*` wildcards: `*.ext`, `prefix*`, `*text*`, or plain substring.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }

    let has_leading_star = pattern.starts_with('*');
    let has_trailing_star = pattern.ends_with('*');

    match (has_leading_star, has_trailing_star) {
        (true, true) if pattern.len() > 2 => name.contains(&pattern[1..pattern.len() - 1]),
        // "*" or "**"
        (true, true) => true,
        (true, false) => name.ends_with(&pattern[1..]),
        (false, true) => name.starts_with(&pattern[..pattern.len() - 1]),
        (false, false) => name.contains(pattern),
    }
}
