use clap::{Parser, Subcommand};
use cvmatch::Result;
use cvmatch::commands::{
    index_document, init_config, match_candidates, search, show_config, show_status,
};
use cvmatch::database::lancedb::DocType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cvmatch")]
#[command(about = "Index resumes and job descriptions, then match candidates by similarity")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the Ollama connection and chunking settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Index a resume or job description file
    Index {
        /// Path to the document (PDF or plain text)
        file: PathBuf,
        /// Document type, decides the target collection
        #[arg(long, value_enum)]
        doc_type: DocType,
        /// Source name stored in metadata, defaults to the file name
        #[arg(long)]
        source: Option<String>,
    },
    /// Rank indexed resumes against a job description
    Match {
        /// Document id returned when the job description was indexed
        jd_id: String,
        /// Number of resume chunks to return
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
    /// Free-text similarity search over one collection
    Search {
        /// Query text
        query: String,
        /// Collection to search
        #[arg(long, value_enum, default_value_t = DocType::Resume)]
        doc_type: DocType,
        /// Number of chunks to return
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
    /// Show configuration, collection sizes, and Ollama reachability
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                init_config()?;
            }
        }
        Commands::Index {
            file,
            doc_type,
            source,
        } => {
            index_document(&file, doc_type, source).await?;
        }
        Commands::Match { jd_id, top_k } => {
            match_candidates(&jd_id, top_k).await?;
        }
        Commands::Search {
            query,
            doc_type,
            top_k,
        } => {
            search(doc_type, &query, top_k).await?;
        }
        Commands::Status => {
            show_status().await?;
        }
    }

    Ok(())
}
