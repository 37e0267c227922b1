use thiserror::Error;

use wsn_core::WsnError;
use wsn_schedule::ScheduleError;
use wsn_topology::TopologyError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match node count {expected}")]
    LengthMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("this simulator has already run")]
    AlreadyRan,

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Core(#[from] WsnError),
}

pub type SimResult<T> = Result<T, SimError>;
