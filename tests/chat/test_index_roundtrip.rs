// Save/load round-trip: a loaded index must answer queries identically to
// the in-memory original

use ragchat_node::corpus::chunk_document;
use ragchat_node::embeddings::{EmbeddingProvider, HashEmbedder};
use ragchat_node::vector::VectorIndex;

async fn build_sample_index(embedder: &HashEmbedder) -> VectorIndex {
    let doc = "Our mission is to enable chat commerce. \
               Billing runs monthly and invoices are sent by email. \
               Support is available around the clock via the help center. \
               The platform connects businesses to customers on any channel.";
    let chunks = chunk_document(doc, 60, 10);

    let mut index = VectorIndex::new(embedder.dimension());
    for chunk in chunks {
        let embedding = embedder.embed(&chunk.text).await.unwrap();
        index.insert(chunk, embedding).unwrap();
    }
    index
}

#[tokio::test]
async fn test_roundtrip_preserves_search_results() {
    let embedder = HashEmbedder::new(96);
    let index = build_sample_index(&embedder).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.bin");
    index.save(&path).unwrap();
    let loaded = VectorIndex::load(&path).unwrap();

    assert_eq!(loaded.len(), index.len());
    assert_eq!(loaded.dimension(), index.dimension());

    for query_text in [
        "what is the mission",
        "how does billing work",
        "when is support available",
        "unrelated question about weather",
    ] {
        let query = embedder.embed(query_text).await.unwrap();
        let before = index.search(&query, 3);
        let after = loaded.search(&query, 3);

        assert_eq!(before.len(), after.len(), "query: {}", query_text);
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.chunk, a.chunk, "query: {}", query_text);
            assert_eq!(b.score, a.score, "query: {}", query_text);
        }
    }
}

#[tokio::test]
async fn test_roundtrip_of_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.bin");

    let index = VectorIndex::new(32);
    index.save(&path).unwrap();

    let loaded = VectorIndex::load(&path).unwrap();
    assert!(loaded.is_empty());
    assert!(loaded.search(&vec![0.5; 32], 5).is_empty());
}

#[tokio::test]
async fn test_saved_file_survives_reopen() {
    let embedder = HashEmbedder::new(48);
    let index = build_sample_index(&embedder).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.bin");
    index.save(&path).unwrap();

    // Load twice; both copies must agree
    let first = VectorIndex::load(&path).unwrap();
    let second = VectorIndex::load(&path).unwrap();
    let query = embedder.embed("mission").await.unwrap();

    let a = first.search(&query, 2);
    let b = second.search(&query, 2);
    assert_eq!(
        a.iter().map(|r| &r.chunk.text).collect::<Vec<_>>(),
        b.iter().map(|r| &r.chunk.text).collect::<Vec<_>>()
    );
}
