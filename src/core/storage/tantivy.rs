//! Local tantivy backend.
//!
//! Stores sections in an on-disk tantivy index whose schema is
//! derived from an [`IndexDefinition`]. Only the text fields are
//! stored; embeddings are checked against the definition and then
//! dropped, so search is keyword-only with tantivy's BM25 scores.
//! Vector and hybrid ranking are left to the hosted index.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{DocAddress, Index, IndexWriter, Searcher, TantivyDocument, Term};

use super::{CreateMode, IndexDefinition, SearchIndex};
use crate::core::error::{DocIndexError, Result};
use crate::core::types::{HybridQuery, IndexingResult, SearchHit, Section};

/// Writer heap size (50MB)
pub const WRITER_HEAP_BYTES: usize = 50_000_000;

const DEFINITION_FILE: &str = "definition.json";
const TANTIVY_DIR: &str = "tantivy";

/// Create the tantivy schema for a definition
///
/// - key field: STRING | STORED (exact-match term for upserts)
/// - searchable text: TEXT | STORED
/// - other text: STRING | STORED
/// - vector fields are not part of the schema
pub fn build_schema(definition: &IndexDefinition) -> Schema {
    let mut builder = Schema::builder();

    for field in definition.fields.iter().filter(|f| !f.is_vector()) {
        if field.searchable && !field.key {
            builder.add_text_field(&field.name, TEXT | STORED);
        } else {
            builder.add_text_field(&field.name, STRING | STORED);
        }
    }

    builder.build()
}

/// On-disk index of sections
#[derive(Debug, Clone)]
pub struct TantivyIndex {
    name: String,
    dir: PathBuf,
}

/// An opened index with its definition
struct OpenIndex {
    definition: IndexDefinition,
    index: Index,
    schema: Schema,
}

impl OpenIndex {
    fn field(&self, name: &str) -> Result<Field> {
        self.schema
            .get_field(name)
            .map_err(|e| DocIndexError::StorageError(format!("Missing {name} field: {e}")))
    }

    fn key_field(&self) -> Result<(&str, Field)> {
        let key = self.definition.key_field().ok_or_else(|| {
            DocIndexError::StorageError(format!("Index '{}' has no key", self.definition.name))
        })?;
        Ok((key.name.as_str(), self.field(&key.name)?))
    }

    /// Map a section onto the schema; `Err` is a per-item rejection
    fn to_document(&self, section: &Section) -> std::result::Result<TantivyDocument, String> {
        let value = serde_json::to_value(section).map_err(|e| e.to_string())?;
        let mut doc = TantivyDocument::default();

        for def in &self.definition.fields {
            let Some(field_value) = value.get(&def.name) else {
                if def.key {
                    return Err(format!("Missing key field '{}'", def.name));
                }
                continue;
            };

            if def.is_vector() {
                let vector: Vec<f32> =
                    serde_json::from_value(field_value.clone()).map_err(|e| e.to_string())?;
                let expected = def.dimensions.unwrap_or_default();
                if vector.len() != expected {
                    return Err(format!(
                        "Field '{}' expects {expected} dimensions, got {}",
                        def.name,
                        vector.len()
                    ));
                }
            } else if let Some(text) = field_value.as_str() {
                if def.key && text.is_empty() {
                    return Err("Document key cannot be empty".to_string());
                }
                let field = self.schema.get_field(&def.name).map_err(|e| e.to_string())?;
                doc.add_text(field, text);
            }
        }

        Ok(doc)
    }

    fn stored_text(&self, doc: &TantivyDocument, name: &str) -> String {
        self.schema
            .get_field(name)
            .ok()
            .and_then(|field| doc.get_first(field))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }

    /// BM25 over the searchable text fields, best first
    fn keyword_search(
        &self,
        searcher: &Searcher,
        text: &str,
        limit: usize,
    ) -> Result<Vec<(f32, DocAddress)>> {
        let fields = self
            .definition
            .fields
            .iter()
            .filter(|f| f.searchable && !f.is_vector() && !f.key)
            .map(|f| self.field(&f.name))
            .collect::<Result<Vec<_>>>()?;
        if fields.is_empty() || text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parser = QueryParser::for_index(&self.index, fields);
        let (query, errors) = parser.parse_query_lenient(text);
        if !errors.is_empty() {
            tracing::debug!("Ignored {} query syntax errors in {:?}", errors.len(), text);
        }

        searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| DocIndexError::SearchFailed(format!("Search failed: {e}")))
    }
}

impl TantivyIndex {
    /// Index `name` stored under `local_dir/name`
    pub fn new(local_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: local_dir.join(name),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn definition_path(&self) -> PathBuf {
        self.dir.join(DEFINITION_FILE)
    }

    fn tantivy_dir(&self) -> PathBuf {
        self.dir.join(TANTIVY_DIR)
    }

    /// Whether the index has been provisioned
    pub fn exists(&self) -> bool {
        self.definition_path().exists()
    }

    /// Stored definition of a provisioned index
    pub fn definition(&self) -> Result<IndexDefinition> {
        if !self.exists() {
            return Err(DocIndexError::IndexNotFound(self.name.clone()));
        }
        let contents = fs::read_to_string(self.definition_path())?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn open(&self) -> Result<OpenIndex> {
        let definition = self.definition()?;
        let index = Index::open_in_dir(self.tantivy_dir())
            .map_err(|e| DocIndexError::StorageError(format!("Failed to open index: {e}")))?;
        let schema = index.schema();
        Ok(OpenIndex {
            definition,
            index,
            schema,
        })
    }

    fn provision(&self, definition: &IndexDefinition) -> Result<()> {
        let tantivy_dir = self.tantivy_dir();
        fs::create_dir_all(&tantivy_dir)?;

        Index::create_in_dir(&tantivy_dir, build_schema(definition))
            .map_err(|e| DocIndexError::StorageError(format!("Failed to create index: {e}")))?;

        let json = serde_json::to_string_pretty(definition)?;
        fs::write(self.definition_path(), json)?;
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for TantivyIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_index(&self, definition: &IndexDefinition, mode: CreateMode) -> Result<()> {
        definition.validate()?;

        if self.exists() {
            match mode {
                CreateMode::Create => {
                    return Err(DocIndexError::IndexAlreadyExists(self.name.clone()));
                }
                CreateMode::CreateOrUpdate => {
                    if self.definition()? == *definition {
                        tracing::info!("Index '{}' is up to date", self.name);
                        return Ok(());
                    }
                    // A schema change cannot be applied in place
                    tracing::warn!(
                        "Definition of index '{}' changed, rebuilding (existing documents are dropped)",
                        self.name
                    );
                    fs::remove_dir_all(&self.dir)?;
                }
            }
        }

        self.provision(definition)?;
        tracing::info!("Index '{}' created at {:?}", self.name, self.dir);
        Ok(())
    }

    async fn upload_documents(&self, sections: &[Section]) -> Result<Vec<IndexingResult>> {
        let open = self.open()?;
        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let (_, key_field) = open.key_field()?;
        let mut writer: IndexWriter = open
            .index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| DocIndexError::StorageError(format!("Failed to create writer: {e}")))?;

        let mut results = Vec::with_capacity(sections.len());
        for section in sections {
            match open.to_document(section) {
                Ok(doc) => {
                    writer.delete_term(Term::from_field_text(key_field, &section.id));
                    writer.add_document(doc).map_err(|e| {
                        DocIndexError::StorageError(format!("Failed to add document: {e}"))
                    })?;
                    results.push(IndexingResult::success(&section.id));
                }
                Err(reason) => results.push(IndexingResult::failure(&section.id, reason)),
            }
        }

        writer
            .commit()
            .map_err(|e| DocIndexError::StorageError(format!("Failed to commit: {e}")))?;
        Ok(results)
    }

    async fn search(&self, query: &HybridQuery) -> Result<Vec<SearchHit>> {
        let open = self.open()?;
        let reader = open
            .index
            .reader()
            .map_err(|e| DocIndexError::SearchFailed(format!("Failed to create reader: {e}")))?;
        let searcher = reader.searcher();

        if query.top == 0 || searcher.num_docs() == 0 {
            return Ok(Vec::new());
        }

        let is_vector = open
            .definition
            .field(&query.vector_field)
            .is_some_and(|f| f.is_vector());
        if !is_vector {
            return Err(DocIndexError::InvalidQuery(format!(
                "'{}' is not a vector field",
                query.vector_field
            )));
        }
        tracing::debug!(
            "Local index '{}' ranks by keyword only; ignoring '{}' vector",
            self.name,
            query.vector_field
        );

        let (key_name, _) = open.key_field()?;
        let mut hits = Vec::with_capacity(query.top);
        for (score, address) in open.keyword_search(&searcher, &query.text, query.top)? {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                DocIndexError::SearchFailed(format!("Failed to retrieve document: {e}"))
            })?;
            hits.push(SearchHit {
                score: f64::from(score),
                id: open.stored_text(&doc, key_name),
                content: open.stored_text(&doc, "content"),
                sourcepage: open.stored_text(&doc, "sourcepage"),
                sourcefile: open.stored_text(&doc, "sourcefile"),
            });
        }

        Ok(hits)
    }
}
