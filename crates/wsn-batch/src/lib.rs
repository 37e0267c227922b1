//! `wsn-batch` — problem generation and parallel batch runs.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`problem`] | `Problem`, `ProblemGenerator`, `ScatterGenerator`         |
//! | [`loader`]  | CSV position and failure inputs                           |
//! | [`grid`]    | `ParamGrid` (cartesian parameter sweep)                   |
//! | [`runner`]  | `BatchRunner`, `Variant`, `Job`                           |
//! | [`error`]   | `BatchError`, `BatchResult<T>`                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wsn_batch::{generate_problems, BatchRunner, ParamGrid, ScatterGenerator, Variant};
//! use wsn_output::{CsvWriter, WriteBehind};
//!
//! let problems = generate_problems(&ScatterGenerator::default(), 4, 42, "scatter");
//! let sink = WriteBehind::spawn(CsvWriter::new("results")?)?;
//! BatchRunner::new(0, 42).run(&problems, &[Variant::default()], &ParamGrid::default(), &sink.handle())?;
//! sink.finish()?;
//! ```

pub mod error;
pub mod grid;
pub mod loader;
pub mod problem;
pub mod runner;


pub use error::{BatchError, BatchResult};
pub use grid::ParamGrid;
pub use loader::{load_failures_csv, load_positions_csv, load_problem};
pub use problem::{generate_problems, Problem, ProblemGenerator, ScatterGenerator};
pub use runner::{BatchRunner, Job, Variant};
