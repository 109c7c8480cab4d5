//! Pipeline error types

use bioscout_common::errors::LookupError;
use bioscout_common::models::SeedSetError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Seed(#[from] SeedSetError),

    #[error("Similarity fraction must be in (0, 1], got {0}")]
    InvalidFraction(f64),

    #[error("Reading list size must be a positive integer")]
    EmptyReadingList,

    #[error("Lookup service failure: {0}")]
    Lookup(#[from] LookupError),
}
