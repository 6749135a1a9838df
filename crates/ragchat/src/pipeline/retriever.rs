//! Nearest-document lookup for a question

use crate::error::RagError;
use crate::pipeline::index::VectorIndex;
use crate::pipeline::traits::Embedder;

/// Candidates considered per query; only the best one is used
pub const DEFAULT_TOP_K: usize = 4;

pub struct Retriever<'a> {
  index: &'a VectorIndex,
  embedder: &'a dyn Embedder,
}

impl<'a> Retriever<'a> {
  pub fn new(index: &'a VectorIndex, embedder: &'a dyn Embedder) -> Self {
    Self { index, embedder }
  }

  /// Text of the closest document, or an empty string when the index is empty.
  /// With a single document this is that document for every query.
  pub async fn retrieve(&self, query: &str) -> Result<String, RagError> {
    if self.index.is_empty() {
      return Ok(String::new());
    }

    let query_embedding = self.embedder.embed(query).await?;
    let context = self
      .index
      .search(&query_embedding, DEFAULT_TOP_K)
      .first()
      .map(|hit| hit.text.to_string())
      .unwrap_or_default();

    Ok(context)
  }
}
