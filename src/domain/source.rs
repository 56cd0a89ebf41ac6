//! Static income source reference data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::common::{Displayable, Identifiable};

/// An income source such as a salary, a client or a platform payout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_ref: Option<String>,
}

impl Source {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            logo_ref: None,
        }
    }

    pub fn with_logo(mut self, logo_ref: impl Into<String>) -> Self {
        self.logo_ref = Some(logo_ref.into());
        self
    }
}

impl Identifiable for Source {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Source {
    fn display_label(&self) -> String {
        self.display_name.clone()
    }
}

/// Read-only lookup of sources by id. The engine only ever joins against it.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    sources: Vec<Source>,
    index: HashMap<String, usize>,
}

impl SourceCatalog {
    /// Builds the catalog; a later duplicate id replaces the earlier entry.
    pub fn new(sources: Vec<Source>) -> Self {
        let mut deduped: Vec<Source> = Vec::with_capacity(sources.len());
        let mut index = HashMap::with_capacity(sources.len());
        for source in sources {
            match index.get(&source.id) {
                Some(&slot) => deduped[slot] = source,
                None => {
                    index.insert(source.id.clone(), deduped.len());
                    deduped.push(source);
                }
            }
        }
        Self {
            sources: deduped,
            index,
        }
    }

    pub fn resolve(&self, source_id: &str) -> Option<&Source> {
        self.index.get(source_id).map(|&slot| &self.sources[slot])
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.index.contains_key(source_id)
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl FromIterator<Source> for SourceCatalog {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
