//! BioScout Common Library
//!
//! Shared code for the BioScout crates including:
//! - Paper and author data models
//! - Bibliographic lookup service abstraction (PubMed E-utilities client)
//! - Error types and handling
//! - Configuration management

pub mod config;
pub mod errors;
pub mod lookup;
pub mod models;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{LookupError, Result};
pub use lookup::{BiblioLookup, MockLookup};
pub use models::{AuthorName, PaperId, Record, SeedSet};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default NCBI E-utilities base URL
pub const DEFAULT_EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default maximum number of ids returned by an author search
pub const DEFAULT_SEARCH_RETMAX: usize = 200;
