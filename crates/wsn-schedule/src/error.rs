use thiserror::Error;

use wsn_core::WsnError;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid slot schedule: {0}")]
    Slot(String),

    #[error(transparent)]
    Core(#[from] WsnError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
