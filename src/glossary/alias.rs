// src/glossary/alias.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::glossary::GlossaryTerm;

/// Built-in domain synonyms. A term picks up every variation of a row whose
/// key is a substring of the lower-cased term, or the other way round.
const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("cpa", &["cpas", "cpa"]),
    (
        "strategist",
        &[
            "strategists",
            "strategist",
            "tax strategist",
            "tax strategists",
        ],
    ),
    ("entity planning", &["entity structure", "entity type"]),
    ("asset location", &["asset placement"]),
    ("opportunity zones", &["opportunity zone"]),
    (
        "reps",
        &["real estate professional", "real estate professional status"],
    ),
    ("str", &["short-term rental", "short-term rentals"]),
    (
        "qof",
        &["qualified opportunity fund", "qualified opportunity funds"],
    ),
];

/// One row of the synonym table as written in a JSON override file.
#[derive(Debug, Clone, Deserialize)]
pub struct SynonymEntry {
    pub key: String,
    pub variations: Vec<String>,
}

/// Ordered synonym table used while building aliases.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: Vec<SynonymEntry>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        let entries = DEFAULT_SYNONYMS
            .iter()
            .map(|(key, variations)| SynonymEntry {
                key: key.to_string(),
                variations: variations.iter().map(|v| v.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }
}

impl SynonymTable {
    /// Rows with a blank key are dropped: an empty key is a substring of
    /// every term.
    pub fn new(entries: Vec<SynonymEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter_map(|e| {
                let key = e.key.trim().to_lowercase();
                if key.is_empty() {
                    tracing::warn!(
                        "Skipping synonym row with blank key (variations {:?})",
                        e.variations
                    );
                    return None;
                }
                Some(SynonymEntry {
                    key,
                    variations: e.variations,
                })
            })
            .collect();
        Self { entries }
    }

    /// Reads a table from a JSON array of `{ "key": .., "variations": [..] }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("cannot read synonym table {}: {}", path.display(), e))?;
        let entries: Vec<SynonymEntry> = serde_json::from_str(&raw)
            .map_err(|e| format!("invalid synonym table {}: {}", path.display(), e))?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[SynonymEntry] {
        &self.entries
    }

    /// Variations contributed to a lower-cased term.
    fn variations_for<'s>(&'s self, base: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.entries
            .iter()
            .filter(move |e| base.contains(e.key.as_str()) || e.key.contains(base))
            .flat_map(|e| e.variations.iter().map(String::as_str))
    }
}

/// Ordered mapping from a normalized surface string to its canonical term.
///
/// Keys keep the position of their first insertion; re-inserting a key
/// points it at the newer term (last write wins).
#[derive(Debug)]
pub struct AliasTable<'a> {
    entries: Vec<(String, &'a GlossaryTerm)>,
    index: HashMap<String, usize>,
}

impl<'a> AliasTable<'a> {
    pub fn build(terms: &'a [GlossaryTerm], synonyms: &SynonymTable) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for term in terms {
            let base = term.normalized();
            if base.trim().is_empty() {
                continue;
            }

            table.insert(base.clone(), term);

            match base.strip_suffix('s') {
                Some(singular) => table.insert(singular.to_string(), term),
                None => table.insert(format!("{}s", base), term),
            }

            for variation in synonyms.variations_for(&base) {
                table.insert(variation.to_lowercase(), term);
            }
        }

        table
    }

    fn insert(&mut self, alias: String, term: &'a GlossaryTerm) {
        if alias.is_empty() {
            return;
        }
        match self.index.get(&alias) {
            Some(&pos) => self.entries[pos].1 = term,
            None => {
                self.index.insert(alias.clone(), self.entries.len());
                self.entries.push((alias, term));
            }
        }
    }

    pub fn get(&self, alias: &str) -> Option<&'a GlossaryTerm> {
        self.index
            .get(&alias.to_lowercase())
            .map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a GlossaryTerm)> + '_ {
        self.entries.iter().map(|(alias, term)| (alias.as_str(), *term))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
