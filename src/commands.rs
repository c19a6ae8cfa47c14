use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::{Config, get_config_dir};
use crate::database::lancedb::DocType;
use crate::indexer::Indexer;

async fn load_indexer() -> Result<Indexer> {
    let config = Config::load(get_config_dir()?)?;
    Indexer::new(config)
        .await
        .context("Failed to initialize indexer")
}

/// Index a resume or job description file into its collection
#[inline]
pub async fn index_document(file: &Path, doc_type: DocType, source: Option<String>) -> Result<()> {
    info!("Indexing {} document from {:?}", doc_type, file);

    let indexer = load_indexer().await?;
    let indexed = indexer.index_document(file, doc_type, source).await?;

    println!("Indexed {} as {}", indexed.source, indexed.doc_id);
    println!("  Collection: {}", doc_type.collection());
    println!("  Chunks indexed: {}", indexed.chunks_indexed);
    if indexed.chunks_indexed == 0 {
        println!("  Note: the document produced no text, nothing was stored");
    }

    Ok(())
}

/// Rank indexed resumes against a job description
#[inline]
pub async fn match_candidates(jd_id: &str, top_k: usize) -> Result<()> {
    let indexer = load_indexer().await?;
    let matches = indexer.match_candidates(jd_id, top_k).await?;

    if matches.is_empty() {
        println!("No matching resume chunks for {}", jd_id);
        return Ok(());
    }

    println!("Top matches for {}:", jd_id);
    for (rank, candidate) in matches.iter().enumerate() {
        println!(
            "{:>3}. {} (similarity {:.3})",
            rank + 1,
            candidate.resume_doc_id,
            candidate.similarity
        );
        println!("     {}", preview(&candidate.chunk));
    }

    Ok(())
}

/// Free-text similarity search over one collection
#[inline]
pub async fn search(doc_type: DocType, query: &str, top_k: usize) -> Result<()> {
    let indexer = load_indexer().await?;
    let results = indexer
        .vector_store()
        .query_similar(indexer.embedder(), doc_type.collection(), query, top_k)
        .await?;

    if results.is_empty() {
        println!("No results in {}", doc_type.collection());
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>3}. {} [{}] (distance {:.3})",
            rank + 1,
            result.metadata.doc_id,
            result.metadata.source,
            result.distance
        );
        println!("     {}", preview(&result.metadata.content));
    }

    Ok(())
}

/// Show configuration, collection sizes, and Ollama reachability
#[inline]
pub async fn show_status() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir)?;

    println!("Config directory: {}", config_dir.display());
    println!("Ollama: {} (model {})", config.ollama_url()?, config.ollama.model);
    println!(
        "Chunking: {} chars, {} overlap",
        config.chunking.max_chunk_chars, config.chunking.overlap_chars
    );

    let indexer = Indexer::new(config).await?;
    for doc_type in [DocType::Resume, DocType::Jd] {
        let count = indexer.vector_store().count(doc_type.collection()).await?;
        println!("Collection {}: {} stored chunks", doc_type.collection(), count);
    }

    match indexer.embedder().health_check() {
        Ok(()) => println!("Ollama: reachable, model available"),
        Err(e) => println!("Ollama: unavailable ({})", e),
    }

    Ok(())
}

/// Print the active configuration as TOML
#[inline]
pub fn show_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir)?;

    println!("# {}", config_dir.join("config.toml").display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Write a default config file if none exists yet
#[inline]
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    let config = Config::load(&config_dir)?;
    config.save()?;
    println!("Wrote default config to {}", config_path.display());
    Ok(())
}

fn preview(text: &str) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut preview: String = flattened.chars().take(110).collect();
    if flattened.chars().count() > 110 {
        preview.push('…');
    }
    preview
}
