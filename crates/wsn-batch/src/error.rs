use thiserror::Error;

use wsn_core::WsnError;
use wsn_output::OutputError;
use wsn_sim::SimError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch configuration error: {0}")]
    Config(String),

    #[error("input error in {path}: {reason}")]
    Input { path: String, reason: String },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Core(#[from] WsnError),
}

pub type BatchResult<T> = Result<T, BatchError>;
