//! In-memory vector index and the indexer that fills it

use crate::error::RagError;
use crate::pipeline::traits::Embedder;

/// Calculate cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
  if a.len() != b.len() {
    return 0.0;
  }

  let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
  let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
  let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

  if magnitude_a == 0.0 || magnitude_b == 0.0 {
    0.0
  } else {
    dot_product / (magnitude_a * magnitude_b)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
  pub text: String,
  pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
  pub text: &'a str,
  pub score: f32,
}

/// Flat list of documents searched by brute force. Never mutated once the
/// service is serving.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
  documents: Vec<IndexedDocument>,
}

impl VectorIndex {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, text: impl Into<String>, embedding: Vec<f32>) {
    self.documents.push(IndexedDocument { text: text.into(), embedding });
  }

  pub fn len(&self) -> usize {
    self.documents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.documents.is_empty()
  }

  pub fn documents(&self) -> &[IndexedDocument] {
    &self.documents
  }

  /// Up to `k` documents, most similar first. Equal scores keep insertion order.
  pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit<'_>> {
    let mut hits: Vec<SearchHit<'_>> = self
      .documents
      .iter()
      .map(|doc| SearchHit { text: &doc.text, score: cosine_similarity(query, &doc.embedding) })
      .collect();

    // stable sort keeps insertion order on ties
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(k);
    hits
  }
}

/// Embeds a fixed corpus, one request per text, into a fresh index
pub struct Indexer<'a> {
  embedder: &'a dyn Embedder,
}

impl<'a> Indexer<'a> {
  pub fn new(embedder: &'a dyn Embedder) -> Self {
    Self { embedder }
  }

  pub async fn build(&self, corpus: &[String]) -> Result<VectorIndex, RagError> {
    let mut index = VectorIndex::new();
    for text in corpus {
      bentley::info!(&format!("Embedding: '{text}'"));
      let embedding = self.embedder.embed(text).await?;
      index.insert(text.clone(), embedding);
    }
    bentley::success!(&format!("Indexed {} document(s) in memory", index.len()));
    Ok(index)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipeline::traits::MockEmbedder;

  #[test]
  fn test_cosine_similarity() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
  }

  #[test]
  fn test_cosine_similarity_degenerate_inputs() {
    assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
  }

  #[test]
  fn test_search_orders_by_similarity_and_truncates() {
    let mut index = VectorIndex::new();
    index.insert("east", vec![1.0, 0.0]);
    index.insert("north", vec![0.0, 1.0]);
    index.insert("northeast", vec![1.0, 1.0]);

    let hits = index.search(&[0.1, 1.0], 2);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].text, "north");
    assert_eq!(hits[1].text, "northeast");
  }

  #[test]
  fn test_search_ties_keep_insertion_order() {
    let mut index = VectorIndex::new();
    index.insert("first", vec![1.0, 0.0]);
    index.insert("second", vec![2.0, 0.0]);

    let hits = index.search(&[1.0, 0.0], 4);
    assert_eq!(hits.iter().map(|h| h.text).collect::<Vec<_>>(), vec!["first", "second"]);
  }

  #[test]
  fn test_empty_index_search() {
    let index = VectorIndex::new();
    assert!(index.is_empty());
    assert!(index.search(&[1.0], 4).is_empty());
  }

  #[tokio::test]
  async fn test_indexer_embeds_every_text() {
    let mut embedder = MockEmbedder::new();
    embedder.expect_embed().times(2).returning(|text| Ok(vec![text.len() as f32, 1.0]));

    let corpus = vec!["short".to_string(), "a longer text".to_string()];
    let index = Indexer::new(&embedder).build(&corpus).await.unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.documents()[0].text, "short");
    assert_eq!(index.documents()[0].embedding, vec![5.0, 1.0]);
    assert_eq!(index.documents()[1].text, "a longer text");
  }

  #[tokio::test]
  async fn test_indexer_returns_fresh_index_each_build() {
    let mut embedder = MockEmbedder::new();
    embedder.expect_embed().returning(|_| Ok(vec![1.0]));

    let corpus = vec!["only".to_string()];
    let indexer = Indexer::new(&embedder);
    let first = indexer.build(&corpus).await.unwrap();
    let second = indexer.build(&corpus).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
  }

  #[tokio::test]
  async fn test_indexer_propagates_embedding_failure() {
    let mut embedder = MockEmbedder::new();
    embedder.expect_embed().returning(|_| Err(RagError::daemon(404, "model not found")));

    let corpus = vec!["only".to_string()];
    let result = Indexer::new(&embedder).build(&corpus).await;
    assert!(matches!(result, Err(RagError::Daemon { status: 404, .. })));
  }
}
