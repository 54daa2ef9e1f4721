//! Semantic type to in-memory representation mapping.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{LintError, Result};
use crate::input::Representation;
use crate::schema::SemanticType;

/// Mapping from every semantic type to the representation a conforming
/// column must have.
///
/// Built once (usually via [`Default`]) and passed by reference to the type
/// imposer and the type evaluator so both agree on what "conforming" means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<SemanticType, Representation>", into = "IndexMap<SemanticType, Representation>")]
pub struct TypeConversionTable {
    mapping: IndexMap<SemanticType, Representation>,
}

/// One row of a conversion table file.
#[derive(Debug, Deserialize)]
struct ConversionRow {
    metadata: String,
    representation: String,
}

impl TypeConversionTable {
    /// Build a table, failing if any semantic type is left unmapped.
    pub fn new(mapping: IndexMap<SemanticType, Representation>) -> Result<Self> {
        let missing: Vec<&str> = SemanticType::ALL
            .iter()
            .filter(|t| !mapping.contains_key(*t))
            .map(SemanticType::name)
            .collect();
        if !missing.is_empty() {
            return Err(LintError::Config(format!(
                "type conversion table has no entry for: {}",
                missing.join(", ")
            )));
        }
        Ok(Self { mapping })
    }

    /// Load a table from CSV with a `metadata,representation` header.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut mapping = IndexMap::new();
        for row in reader.deserialize::<ConversionRow>() {
            let row = row?;
            let semantic = row.metadata.parse::<SemanticType>()?;
            let repr = Representation::from_name(&row.representation).ok_or_else(|| {
                LintError::Config(format!("unknown representation '{}'", row.representation))
            })?;
            if mapping.insert(semantic, repr).is_some() {
                return Err(LintError::Config(format!(
                    "type conversion table maps '{semantic}' twice"
                )));
            }
        }
        Self::new(mapping)
    }

    /// Load a table from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_csv_reader(file)
    }

    /// Representation required for a semantic type.
    pub fn representation_for(&self, semantic: SemanticType) -> Representation {
        self.mapping
            .get(&semantic)
            .copied()
            .unwrap_or(Representation::Text)
    }

    /// Semantic types whose required representation is `repr`, in table order.
    pub fn semantic_types_for(&self, repr: Representation) -> impl Iterator<Item = SemanticType> + '_ {
        self.mapping
            .iter()
            .filter(move |(_, r)| **r == repr)
            .map(|(t, _)| *t)
    }
}

impl Default for TypeConversionTable {
    fn default() -> Self {
        let mapping = SemanticType::ALL
            .into_iter()
            .map(|t| {
                let repr = match t {
                    SemanticType::Int => Representation::Int32,
                    SemanticType::Long => Representation::Int64,
                    SemanticType::Float | SemanticType::Double => Representation::Float64,
                    SemanticType::Character => Representation::Text,
                    SemanticType::Boolean => Representation::Boolean,
                    SemanticType::Date => Representation::Date,
                    SemanticType::Datetime => Representation::DateTime,
                };
                (t, repr)
            })
            .collect();
        Self { mapping }
    }
}

impl TryFrom<IndexMap<SemanticType, Representation>> for TypeConversionTable {
    type Error = LintError;

    fn try_from(mapping: IndexMap<SemanticType, Representation>) -> Result<Self> {
        Self::new(mapping)
    }
}

impl From<TypeConversionTable> for IndexMap<SemanticType, Representation> {
    fn from(table: TypeConversionTable) -> Self {
        table.mapping
    }
}
