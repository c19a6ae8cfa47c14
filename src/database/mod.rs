// Database module
// LanceDB-backed vector collections, one per document type

pub mod lancedb;

pub use lancedb::*;
