//! Parallel batch execution.
//!
//! A batch is the cross product problems × variants × parameter sets.  Each
//! job owns a fresh [`Simulator`](wsn_sim::Simulator) built from its own
//! copy of the problem inputs, so jobs share nothing but the read-only
//! problem list.  Finished runs go to a [`SinkHandle`]; the worker never
//! waits on I/O.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use wsn_core::{RunId, SimParams, mix_seed};
use wsn_output::{NodeRow, Record, RunRow, SinkHandle};
use wsn_sim::{NoopObserver, RunReport, RunSummary, SimBuilder, Stages};

use crate::{BatchError, BatchResult, ParamGrid, Problem};

/// A named stage configuration to compare against others in one batch.
#[derive(Clone, Debug)]
pub struct Variant {
    pub name:   String,
    pub stages: Stages,
}

impl Variant {
    pub fn new(name: impl Into<String>, stages: Stages) -> Self {
        Self { name: name.into(), stages }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::new("default", Stages::default())
    }
}

/// One scheduled run.  Indices point into the batch's problem and variant
/// lists.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    pub run:     RunId,
    pub problem: usize,
    pub variant: usize,
    pub params:  SimParams,
    pub seed:    u64,
}

/// Runs batches on a fixed-size worker pool.
///
/// At most `threads` runs are in flight; the rest wait in the pool's queue.
#[derive(Clone, Debug)]
pub struct BatchRunner {
    threads: usize,
    seed:    u64,
}

impl BatchRunner {
    /// `threads == 0` sizes the pool to the available cores.
    pub fn new(threads: usize, seed: u64) -> Self {
        Self { threads, seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Enumerate jobs in problem, variant, parameter-set order.  Run ids are
    /// sequential from 0 and each run's seed is derived from its id, so the
    /// outcome does not depend on the pool size.
    pub fn jobs(&self, problems: &[Problem], variants: &[Variant], grid: &ParamGrid) -> Vec<Job> {
        let params = grid.expand();
        let mut jobs = Vec::with_capacity(problems.len() * variants.len() * params.len());
        for problem in 0..problems.len() {
            for variant in 0..variants.len() {
                for p in &params {
                    let run = RunId(jobs.len() as u32);
                    jobs.push(Job {
                        run,
                        problem,
                        variant,
                        params: p.clone(),
                        seed: mix_seed(self.seed, run.0 as u64),
                    });
                }
            }
        }
        jobs
    }

    /// Run the batch and stream every problem and run to `sink`.
    ///
    /// Returns the run summaries in job order.  The first failing run aborts
    /// the batch.
    pub fn run(
        &self,
        problems: &[Problem],
        variants: &[Variant],
        grid:     &ParamGrid,
        sink:     &SinkHandle,
    ) -> BatchResult<Vec<RunSummary>> {
        for problem in problems {
            sink.submit(Record::Problem(problem.row()))?;
        }
        self.execute(problems, variants, grid, |job, report| {
            let variant = &variants[job.variant];
            let problem = &problems[job.problem];
            sink.submit(Record::Run {
                run:   RunRow::new(job.run, problem.id, variant.name.as_str(), job.seed, &job.params, &report.summary),
                nodes: NodeRow::from_report(job.run, problem.id, &report),
            })?;
            Ok(report.summary)
        })
    }

    /// Run the batch and keep the full reports in memory, in job order.
    pub fn run_reports(
        &self,
        problems: &[Problem],
        variants: &[Variant],
        grid:     &ParamGrid,
    ) -> BatchResult<Vec<(Job, RunReport)>> {
        self.execute(problems, variants, grid, |job, report| Ok((job.clone(), report)))
    }

    fn execute<T, F>(
        &self,
        problems: &[Problem],
        variants: &[Variant],
        grid:     &ParamGrid,
        finish:   F,
    ) -> BatchResult<Vec<T>>
    where
        T: Send,
        F: Fn(&Job, RunReport) -> BatchResult<T> + Sync,
    {
        if variants.is_empty() {
            return Err(BatchError::Config("batch needs at least one variant".into()));
        }
        grid.validate()?;

        let jobs = self.jobs(problems, variants, grid);
        let total = jobs.len();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("wsn-run-{i}"))
            .build()?;

        info!(
            problems = problems.len(),
            variants = variants.len(),
            param_sets = grid.len(),
            runs = total,
            threads = pool.current_num_threads(),
            "batch started"
        );

        // Log roughly every tenth of the batch.
        let step = (total / 10).max(1);
        let done = AtomicUsize::new(0);

        let results = pool.install(|| {
            jobs.par_iter()
                .map(|job| {
                    let report = run_job(job, &problems[job.problem], &variants[job.variant])?;
                    let out = finish(job, report)?;
                    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if n % step == 0 || n == total {
                        info!(done = n, total, "runs finished");
                    }
                    Ok(out)
                })
                .collect::<BatchResult<Vec<T>>>()
        })?;

        info!(runs = total, "batch finished");
        Ok(results)
    }
}

/// Build and run one simulator.
fn run_job(job: &Job, problem: &Problem, variant: &Variant) -> BatchResult<RunReport> {
    let mut sim = SimBuilder::new(job.params.clone(), problem.positions.clone(), problem.failures.clone())
        .stages(variant.stages.clone())
        .seed(job.seed)
        .build()?;
    let report = sim.run(&mut NoopObserver)?;
    debug!(
        run = %job.run,
        problem = %problem.id,
        variant = %variant.name,
        duration = report.summary.actual_total_duration,
        failures = report.summary.final_failure_count,
        energy = report.total_energy_consumed(),
        wasted = report.total_energy_wasted(),
        "run complete"
    );
    Ok(report)
}
