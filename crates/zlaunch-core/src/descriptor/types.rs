//! Descriptor and catalog types.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// A typed parameter of an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDescriptor {
    /// Type tag as printed by the engine (e.g. `int`, `float`).
    #[serde(rename = "type")]
    pub type_tag: String,
    pub name: String,
    /// Default value, uninterpreted.
    pub default: String,
}

impl ParamDescriptor {
    pub fn new(
        type_tag: impl Into<String>,
        name: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            type_tag: type_tag.into(),
            name: name.into(),
            default: default.into(),
        }
    }
}

/// Signature of one engine operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    /// Input slot names, in engine order.
    pub inputs: Vec<String>,
    /// Output slot names, in engine order.
    pub outputs: Vec<String>,
    pub params: Vec<ParamDescriptor>,
    /// Category tags (menu grouping on the editor side).
    pub categories: Vec<String>,
}

/// Every operation reported by one query run, keyed by operation name.
///
/// Built once by [`parse_catalog`](super::parse_catalog) and never mutated
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorCatalog {
    descriptors: FxHashMap<String, Descriptor>,
}

impl DescriptorCatalog {
    pub(crate) fn from_map(descriptors: FxHashMap<String, Descriptor>) -> Self {
        Self { descriptors }
    }

    /// Look up an operation by name.
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.descriptors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Operation names in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Descriptors sorted by operation name.
    pub fn sorted(&self) -> Vec<(&str, &Descriptor)> {
        let mut entries: Vec<(&str, &Descriptor)> = self
            .descriptors
            .iter()
            .map(|(name, desc)| (name.as_str(), desc))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Serialize for DescriptorCatalog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Sorted so dumps are stable across runs.
        serializer.collect_map(self.sorted())
    }
}
