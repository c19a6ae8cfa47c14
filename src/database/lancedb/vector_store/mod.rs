#[cfg(test)]
mod tests;

use super::{BaseMetadata, ChunkMetadata, EmbeddingRecord, SearchResult, chunk_record_id};
use crate::config::Config;
use crate::embeddings::{Embedder, TextChunk};
use crate::{MatchError, Result};
use arrow::array::{
    Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType, Table};
use std::sync::Arc;
use tracing::{debug, info};

/// Vector store over LanceDB, holding one table per named collection.
///
/// Collections are created lazily on first use with a fixed vector dimension
/// and are queried with cosine distance. All writes are append-only; a
/// document's chunks are always submitted as a single batch.
pub struct VectorStore {
    connection: Connection,
    dimension: usize,
}

impl VectorStore {
    /// Connect to the LanceDB directory configured under the application's
    /// base directory, creating it if needed.
    #[inline]
    pub async fn new(config: &Config) -> Result<Self> {
        let db_path = config.vectors_dir();
        debug!("Initializing LanceDB at path: {:?}", db_path);

        std::fs::create_dir_all(&db_path).map_err(|e| {
            MatchError::Database(format!("Failed to create vector database directory: {}", e))
        })?;

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| MatchError::Database(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self {
            connection,
            dimension: config.ollama.embedding_dimension as usize,
        })
    }

    /// Open a collection, creating it with the configured schema if it does
    /// not exist yet. Idempotent: repeated calls return handles to the same
    /// underlying table. Losing a concurrent first-creation race falls back
    /// to opening the winner's table.
    #[inline]
    pub async fn open_collection(&self, name: &str) -> Result<Table> {
        match self.connection.open_table(name).execute().await {
            Ok(table) => Ok(table),
            Err(lancedb::Error::TableNotFound { .. }) => {
                debug!("Creating collection '{}'", name);
                match self
                    .connection
                    .create_empty_table(name, self.schema())
                    .execute()
                    .await
                {
                    Ok(table) => Ok(table),
                    Err(lancedb::Error::TableAlreadyExists { .. }) => self
                        .connection
                        .open_table(name)
                        .execute()
                        .await
                        .map_err(|e| {
                            MatchError::Database(format!(
                                "Failed to open collection '{}' after creation race: {}",
                                name, e
                            ))
                        }),
                    Err(e) => Err(MatchError::Database(format!(
                        "Failed to create collection '{}': {}",
                        name, e
                    ))),
                }
            }
            Err(e) => Err(MatchError::Database(format!(
                "Failed to open collection '{}': {}",
                name, e
            ))),
        }
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    self.dimension as i32,
                ),
                false,
            ),
            Field::new("content", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("doc_type", DataType::Utf8, false),
            Field::new("doc_id", DataType::Utf8, false),
            Field::new("chunk_index", DataType::UInt32, false),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    /// Append records to a collection. All records of one call are submitted
    /// as a single batch in a single engine append; this store adds no
    /// atomicity guarantee beyond that of the underlying engine.
    #[inline]
    pub async fn add_records(
        &self,
        collection: &str,
        records: Vec<EmbeddingRecord>,
    ) -> Result<usize> {
        if records.is_empty() {
            debug!("No records to store");
            return Ok(0);
        }

        for record in &records {
            if record.vector.len() != self.dimension {
                return Err(MatchError::Database(format!(
                    "Vector dimension mismatch for record {}: expected {}, got {}",
                    record.id,
                    self.dimension,
                    record.vector.len()
                )));
            }
        }

        let batch = self.create_record_batch(&records)?;
        let table = self.open_collection(collection).await?;

        let schema = batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| MatchError::Database(format!("Failed to insert records: {}", e)))?;

        debug!(
            "Stored {} records in collection '{}'",
            records.len(),
            collection
        );
        Ok(records.len())
    }

    fn create_record_batch(&self, records: &[EmbeddingRecord]) -> Result<RecordBatch> {
        let len = records.len();

        let mut ids = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * self.dimension);
        let mut contents = Vec::with_capacity(len);
        let mut sources = Vec::with_capacity(len);
        let mut doc_types = Vec::with_capacity(len);
        let mut doc_ids = Vec::with_capacity(len);
        let mut chunk_indices = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);

        for record in records {
            ids.push(record.id.as_str());
            flat_values.extend_from_slice(&record.vector);
            contents.push(record.metadata.content.as_str());
            sources.push(record.metadata.source.as_str());
            doc_types.push(record.metadata.doc_type.as_str());
            doc_ids.push(record.metadata.doc_id.as_str());
            chunk_indices.push(record.metadata.chunk_index);
            created_ats.push(record.metadata.created_at.as_str());
        }

        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array = FixedSizeListArray::try_new(
            field,
            self.dimension as i32,
            Arc::new(values_array),
            None,
        )
        .map_err(|e| MatchError::Database(format!("Failed to create vector array: {}", e)))?;

        let arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(sources)),
            Arc::new(StringArray::from(doc_types)),
            Arc::new(StringArray::from(doc_ids)),
            Arc::new(UInt32Array::from(chunk_indices)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(self.schema(), arrays)
            .map_err(|e| MatchError::Database(format!("Failed to create record batch: {}", e)))
    }

    /// k-nearest-neighbor search by cosine distance. Returns up to `top_k`
    /// results ordered by ascending distance; a collection holding fewer
    /// vectors simply returns them all.
    #[inline]
    pub async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        debug!(
            "Searching collection '{}' with top_k = {}",
            collection, top_k
        );

        let table = self.open_collection(collection).await?;

        let results = table
            .vector_search(query_vector)
            .map_err(|e| MatchError::Database(format!("Failed to create vector search: {}", e)))?
            .column("vector")
            .distance_type(DistanceType::Cosine)
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| MatchError::Database(format!("Failed to execute search: {}", e)))?;

        let rows = collect_rows(results).await?;
        let search_results = rows
            .into_iter()
            .map(|(metadata, distance)| SearchResult {
                metadata,
                distance: distance.unwrap_or(0.0),
            })
            .collect::<Vec<_>>();

        debug!("Search returned {} results", search_results.len());
        Ok(search_results)
    }

    /// Fetch all stored chunks of one document, ordered by chunk index.
    /// An unknown document id yields an empty vec; "not found" is decided
    /// one layer up.
    #[inline]
    pub async fn get_by_doc_id(&self, collection: &str, doc_id: &str) -> Result<Vec<ChunkMetadata>> {
        let table = self.open_collection(collection).await?;

        let predicate = format!("doc_id = '{}'", doc_id.replace('\'', "''"));
        let results = table
            .query()
            .only_if(predicate)
            .execute()
            .await
            .map_err(|e| MatchError::Database(format!("Failed to query by doc id: {}", e)))?;

        let mut chunks = collect_rows(results)
            .await?
            .into_iter()
            .map(|(metadata, _)| metadata)
            .collect::<Vec<_>>();
        chunks.sort_by_key(|m| m.chunk_index);

        Ok(chunks)
    }

    /// Embed all chunks of a document and append them to the collection.
    /// The embedding call happens before any write, so an embedding failure
    /// aborts the operation with nothing stored.
    #[inline]
    pub async fn index_chunks(
        &self,
        embedder: &dyn Embedder,
        collection: &str,
        doc_id: &str,
        chunks: &[TextChunk],
        base: &BaseMetadata,
    ) -> Result<usize> {
        if chunks.is_empty() {
            debug!("Document {} produced no chunks, nothing to index", doc_id);
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = embedder.embed(&texts)?;

        let created_at = Utc::now().to_rfc3339();
        let records = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                let chunk_index = u32::try_from(chunk.chunk_index).map_err(|_| {
                    MatchError::Database(format!("Chunk index {} overflows u32", chunk.chunk_index))
                })?;
                Ok(EmbeddingRecord {
                    id: chunk_record_id(doc_id, chunk.chunk_index),
                    vector,
                    metadata: ChunkMetadata {
                        source: base.source.clone(),
                        doc_type: base.doc_type.tag().to_string(),
                        doc_id: doc_id.to_string(),
                        chunk_index,
                        content: chunk.content.clone(),
                        created_at: created_at.clone(),
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let count = self.add_records(collection, records).await?;
        info!(
            "Indexed {} chunks for document {} in collection '{}'",
            count, doc_id, collection
        );
        Ok(count)
    }

    /// Embed a query text and search the collection for its nearest chunks
    #[inline]
    pub async fn query_similar(
        &self,
        embedder: &dyn Embedder,
        collection: &str,
        query_text: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let vectors = embedder.embed(std::slice::from_ref(&query_text.to_string()))?;
        let query_vector = vectors
            .first()
            .ok_or_else(|| MatchError::Embedding("Query embedding was empty".to_string()))?;

        self.search(collection, query_vector, top_k).await
    }

    /// Number of stored vectors in a collection
    #[inline]
    pub async fn count(&self, collection: &str) -> Result<usize> {
        let table = self.open_collection(collection).await?;
        table
            .count_rows(None)
            .await
            .map_err(|e| MatchError::Database(format!("Failed to count rows: {}", e)))
    }

    /// Names of all existing collections
    #[inline]
    pub async fn collection_names(&self) -> Result<Vec<String>> {
        self.connection
            .table_names()
            .execute()
            .await
            .map_err(|e| MatchError::Database(format!("Failed to list collections: {}", e)))
    }
}

/// Drain a LanceDB result stream into metadata rows, carrying the engine's
/// `_distance` column when present.
async fn collect_rows(
    mut results: lancedb::arrow::SendableRecordBatchStream,
) -> Result<Vec<(ChunkMetadata, Option<f32>)>> {
    let mut rows = Vec::new();

    while let Some(batch) = results
        .try_next()
        .await
        .map_err(|e| MatchError::Database(format!("Failed to read result stream: {}", e)))?
    {
        rows.extend(parse_batch(&batch)?);
    }

    Ok(rows)
}

fn parse_batch(batch: &RecordBatch) -> Result<Vec<(ChunkMetadata, Option<f32>)>> {
    let sources = string_column(batch, "source")?;
    let doc_types = string_column(batch, "doc_type")?;
    let doc_ids = string_column(batch, "doc_id")?;
    let contents = string_column(batch, "content")?;
    let created_ats = string_column(batch, "created_at")?;

    let chunk_indices = batch
        .column_by_name("chunk_index")
        .and_then(|col| col.as_any().downcast_ref::<UInt32Array>())
        .ok_or_else(|| MatchError::Database("Missing or invalid chunk_index column".to_string()))?;

    let distances = batch
        .column_by_name("_distance")
        .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

    let mut rows = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let metadata = ChunkMetadata {
            source: sources.value(row).to_string(),
            doc_type: doc_types.value(row).to_string(),
            doc_id: doc_ids.value(row).to_string(),
            chunk_index: chunk_indices.value(row),
            content: contents.value(row).to_string(),
            created_at: created_ats.value(row).to_string(),
        };

        let distance = distances.and_then(|d| (!d.is_null(row)).then(|| d.value(row)));

        rows.push((metadata, distance));
    }

    Ok(rows)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| MatchError::Database(format!("Missing or invalid {} column", name)))
}
