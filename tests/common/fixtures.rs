// Test fixtures: documents on disk and in-memory collaborators

use async_trait::async_trait;
use docindex::core::embedding::Embedder;
use docindex::core::error::{DocIndexError, Result};
use docindex::core::storage::{CreateMode, IndexDefinition, SearchIndex};
use docindex::core::types::{HybridQuery, IndexingResult, SearchHit, Section};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Documents in a temporary directory
#[allow(dead_code)]
pub struct TestDocs {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestDocs {
    /// Create a directory holding `files` (relative path, contents)
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        for (name, contents) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, contents).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Deterministic embedder: hashed bag of lowercase words.
///
/// Texts sharing words get similar vectors, so vector ranking in
/// tests behaves like a (very) small semantic model.
#[allow(dead_code)]
pub struct HashEmbedder {
    dimensions: usize,
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            // FNV-1a
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for byte in word.bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        // Keep every vector non-zero
        vector[0] += 0.01;
        vector
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(self.vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        "hash"
    }
}

/// Embedder whose service is always unavailable
#[allow(dead_code)]
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(DocIndexError::EmbeddingFailed(
            "service unavailable".to_string(),
        ))
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// In-memory index recording every call.
///
/// Documents whose content contains `reject_marker` are reported as
/// failed; everything else is stored.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingIndex {
    pub reject_marker: Option<String>,
    pub created: Mutex<Vec<(IndexDefinition, CreateMode)>>,
    pub batches: Mutex<Vec<Vec<Section>>>,
    pub queries: Mutex<Vec<HybridQuery>>,
}

#[allow(dead_code)]
impl RecordingIndex {
    pub fn rejecting(marker: &str) -> Self {
        Self {
            reject_marker: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn sections(&self) -> Vec<Section> {
        self.batches.lock().unwrap().concat()
    }
}

#[async_trait]
impl SearchIndex for RecordingIndex {
    fn name(&self) -> &str {
        "recording"
    }

    async fn create_index(&self, definition: &IndexDefinition, mode: CreateMode) -> Result<()> {
        self.created.lock().unwrap().push((definition.clone(), mode));
        Ok(())
    }

    async fn upload_documents(&self, sections: &[Section]) -> Result<Vec<IndexingResult>> {
        self.batches.lock().unwrap().push(sections.to_vec());
        Ok(sections
            .iter()
            .map(|s| match &self.reject_marker {
                Some(marker) if s.content.contains(marker.as_str()) => {
                    IndexingResult::failure(&s.id, "document rejected")
                }
                _ => IndexingResult::success(&s.id),
            })
            .collect())
    }

    async fn search(&self, query: &HybridQuery) -> Result<Vec<SearchHit>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self
            .sections()
            .into_iter()
            .filter(|s| s.content.contains(query.text.as_str()))
            .take(query.top)
            .map(|s| SearchHit {
                score: 1.0,
                id: s.id,
                content: s.content,
                sourcepage: s.sourcepage,
                sourcefile: s.sourcefile,
            })
            .collect())
    }
}

const WORDS: [&str; 16] = [
    "wing", "flap", "rudder", "engine", "fuel", "pressure", "valve", "check", "the", "a",
    "panel", "inspect", "cabin", "door", "landing", "gear",
];

/// Pseudo-random prose from a linear congruential generator.
///
/// Mixes sentence endings, word breaks, newlines and occasional runs
/// with no break characters at all.
#[allow(dead_code)]
pub fn lcg_text(seed: u64, words: usize) -> String {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };

    let mut text = String::new();
    for _ in 0..words {
        let roll = next();
        if roll % 23 == 0 {
            text.push_str(&"x".repeat(next() % 120));
        } else {
            text.push_str(WORDS[roll % WORDS.len()]);
        }
        text.push_str(match next() % 20 {
            0 => ". ",
            1 => "! ",
            2 => ", ",
            3 => "\n",
            4 => "; ",
            5 => "?",
            _ => " ",
        });
    }
    text
}
