use super::*;
use crate::config::OllamaConfig;
use crate::embeddings::chunking::ChunkingConfig;
use crate::embeddings::l2_normalize;
use tempfile::TempDir;

const TEST_DIMENSION: u32 = 64;

fn create_test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config {
        ollama: OllamaConfig {
            embedding_dimension: TEST_DIMENSION,
            ..OllamaConfig::default()
        },
        chunking: ChunkingConfig::default(),
        base_dir: temp_dir.path().to_path_buf(),
    };
    (config, temp_dir)
}

fn test_vector(seed: f32) -> Vec<f32> {
    let mut vector: Vec<f32> = (0..TEST_DIMENSION)
        .map(|i| (i as f32).mul_add(0.01, seed).sin())
        .collect();
    l2_normalize(&mut vector);
    vector
}

fn test_record(doc_id: &str, chunk_index: u32, seed: f32) -> EmbeddingRecord {
    EmbeddingRecord {
        id: chunk_record_id(doc_id, chunk_index as usize),
        vector: test_vector(seed),
        metadata: ChunkMetadata {
            source: "resume.pdf".to_string(),
            doc_type: "resume".to_string(),
            doc_id: doc_id.to_string(),
            chunk_index,
            content: format!("chunk {} of {}", chunk_index, doc_id),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        },
    }
}

#[tokio::test]
async fn store_initialization() {
    let (config, _temp_dir) = create_test_config();

    let store = VectorStore::new(&config).await;
    assert!(store.is_ok(), "Failed to initialize store: {:?}", store.err());
}

#[tokio::test]
async fn open_collection_is_idempotent() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    store
        .open_collection("resumes")
        .await
        .expect("first open should succeed");
    store
        .open_collection("resumes")
        .await
        .expect("second open should succeed");

    let names = store.collection_names().await.expect("should list collections");
    assert_eq!(names.iter().filter(|n| n.as_str() == "resumes").count(), 1);
}

#[tokio::test]
async fn add_and_count_records() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    let count = store
        .add_records(
            "resumes",
            vec![
                test_record("resume-a", 0, 0.1),
                test_record("resume-a", 1, 0.2),
            ],
        )
        .await
        .expect("add should succeed");

    assert_eq!(count, 2);
    assert_eq!(store.count("resumes").await.expect("count should succeed"), 2);
}

#[tokio::test]
async fn empty_add_is_a_noop() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    let count = store
        .add_records("resumes", Vec::new())
        .await
        .expect("empty add should succeed");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn dimension_mismatch_is_rejected() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    let mut record = test_record("resume-a", 0, 0.1);
    record.vector.truncate(8);

    let result = store.add_records("resumes", vec![record]).await;
    assert!(matches!(result, Err(MatchError::Database(_))));
}

#[tokio::test]
async fn get_by_doc_id_returns_chunks_in_order() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    // Insert out of order to verify the store sorts by chunk index.
    store
        .add_records(
            "job_descriptions",
            vec![
                test_record("jd-x", 2, 0.3),
                test_record("jd-x", 0, 0.1),
                test_record("jd-x", 1, 0.2),
                test_record("jd-y", 0, 0.4),
            ],
        )
        .await
        .expect("add should succeed");

    let chunks = store
        .get_by_doc_id("job_descriptions", "jd-x")
        .await
        .expect("lookup should succeed");

    assert_eq!(chunks.len(), 3);
    assert_eq!(
        chunks.iter().map(|c| c.chunk_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(chunks.iter().all(|c| c.doc_id == "jd-x"));
}

#[tokio::test]
async fn get_by_unknown_doc_id_is_empty_not_error() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    let chunks = store
        .get_by_doc_id("job_descriptions", "jd-nonexistent")
        .await
        .expect("lookup should succeed");
    assert!(chunks.is_empty());
}

#[tokio::test]
async fn identical_vector_has_near_zero_distance() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    let record = test_record("resume-a", 0, 0.7);
    let query = record.vector.clone();
    store
        .add_records("resumes", vec![record, test_record("resume-b", 0, 3.0)])
        .await
        .expect("add should succeed");

    let results = store
        .search("resumes", &query, 2)
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].metadata.doc_id, "resume-a");
    assert!(
        results[0].distance.abs() < 1e-4,
        "expected near-zero distance, got {}",
        results[0].distance
    );
    assert!(results[0].distance <= results[1].distance);
}

#[tokio::test]
async fn search_with_fewer_entries_than_top_k() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    store
        .add_records("resumes", vec![test_record("resume-a", 0, 0.5)])
        .await
        .expect("add should succeed");

    let results = store
        .search("resumes", &test_vector(0.5), 10)
        .await
        .expect("search should succeed");
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn search_on_empty_collection_returns_nothing() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    let results = store
        .search("resumes", &test_vector(0.5), 5)
        .await
        .expect("search should succeed");
    assert!(results.is_empty());
}
