//! Index definition.
//!
//! Describes the fields of a search index and its vector search
//! configuration. Serializes to the JSON shape of the Azure AI
//! Search index REST API; the local backend derives its tantivy
//! schema from the same definition.

use serde::{Deserialize, Serialize};

use crate::core::error::{DocIndexError, Result};

pub const EDM_STRING: &str = "Edm.String";
pub const EDM_SINGLE_COLLECTION: &str = "Collection(Edm.Single)";

/// Analyzer applied to the section content
pub const CONTENT_ANALYZER: &str = "standard.lucene";

/// Vector algorithm kind used by every profile we create
pub const HNSW: &str = "hnsw";

fn is_false(value: &bool) -> bool {
    !value
}

/// One field of an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub key: bool,

    #[serde(default)]
    pub searchable: bool,

    #[serde(default)]
    pub filterable: bool,

    #[serde(default)]
    pub facetable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,

    /// Vector length; set only on vector fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_search_profile: Option<String>,
}

impl FieldDefinition {
    fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: EDM_STRING.to_string(),
            key: false,
            searchable: false,
            filterable: false,
            facetable: false,
            analyzer: None,
            dimensions: None,
            vector_search_profile: None,
        }
    }

    pub fn is_vector(&self) -> bool {
        self.field_type == EDM_SINGLE_COLLECTION
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorProfile {
    pub name: String,
    pub algorithm: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorAlgorithm {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorSearch {
    pub profiles: Vec<VectorProfile>,
    pub algorithms: Vec<VectorAlgorithm>,
}

/// Complete index definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub vector_search: VectorSearch,
}

impl IndexDefinition {
    /// Definition for document sections.
    ///
    /// `id` is the key, `content` is full-text searchable with the
    /// standard Lucene analyzer, `embedding` holds `dimensions`
    /// floats searched through `profile` (HNSW algorithm
    /// `algorithm`), and `sourcepage`/`sourcefile` are filterable
    /// and facetable.
    pub fn for_sections(name: &str, dimensions: usize, profile: &str, algorithm: &str) -> Self {
        let id = FieldDefinition {
            key: true,
            ..FieldDefinition::string("id")
        };
        let content = FieldDefinition {
            searchable: true,
            analyzer: Some(CONTENT_ANALYZER.to_string()),
            ..FieldDefinition::string("content")
        };
        let embedding = FieldDefinition {
            field_type: EDM_SINGLE_COLLECTION.to_string(),
            searchable: true,
            dimensions: Some(dimensions),
            vector_search_profile: Some(profile.to_string()),
            ..FieldDefinition::string("embedding")
        };
        let provenance = |name: &str| FieldDefinition {
            filterable: true,
            facetable: true,
            ..FieldDefinition::string(name)
        };

        Self {
            name: name.to_string(),
            fields: vec![
                id,
                content,
                embedding,
                provenance("sourcepage"),
                provenance("sourcefile"),
            ],
            vector_search: VectorSearch {
                profiles: vec![VectorProfile {
                    name: profile.to_string(),
                    algorithm: algorithm.to_string(),
                }],
                algorithms: vec![VectorAlgorithm {
                    name: algorithm.to_string(),
                    kind: HNSW.to_string(),
                }],
            },
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The key field (validated definitions have exactly one)
    pub fn key_field(&self) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key)
    }

    pub fn vector_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_vector())
    }

    /// Check structural consistency before provisioning
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DocIndexError::ConfigError(msg));

        if self.name.trim().is_empty() {
            return invalid("Index name cannot be empty".to_string());
        }

        let keys: Vec<_> = self.fields.iter().filter(|f| f.key).collect();
        match keys.as_slice() {
            [key] if key.field_type == EDM_STRING => {}
            [key] => return invalid(format!("Key field '{}' must be {EDM_STRING}", key.name)),
            [] => return invalid(format!("Index '{}' has no key field", self.name)),
            _ => return invalid(format!("Index '{}' has more than one key field", self.name)),
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return invalid(format!("Duplicate field '{}'", field.name));
            }
            if !field.is_vector() {
                continue;
            }
            match field.dimensions {
                Some(d) if d > 0 => {}
                _ => return invalid(format!("Vector field '{}' needs dimensions", field.name)),
            }
            let Some(profile_name) = field.vector_search_profile.as_deref() else {
                return invalid(format!("Vector field '{}' needs a profile", field.name));
            };
            let Some(profile) = self
                .vector_search
                .profiles
                .iter()
                .find(|p| p.name == profile_name)
            else {
                return invalid(format!("Unknown vector profile '{profile_name}'"));
            };
            if !self
                .vector_search
                .algorithms
                .iter()
                .any(|a| a.name == profile.algorithm)
            {
                return invalid(format!(
                    "Unknown vector algorithm '{}' in profile '{}'",
                    profile.algorithm, profile.name
                ));
            }
        }

        Ok(())
    }
}
