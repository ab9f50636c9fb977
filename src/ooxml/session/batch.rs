//! Many documents at once, one session each, on the rayon pool.

use crate::ooxml::error::{DocumentError, Result};
use crate::ooxml::session::options::SessionOptions;
use crate::ooxml::session::editor::Session;
use crate::ooxml::text::Flavor;
use rayon::prelude::*;

/// One document to process.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Caller's name for the document, usually its file name
    pub name: String,
    pub bytes: Vec<u8>,
    /// `None` infers the flavor from the name, then from the package contents
    pub flavor: Option<Flavor>,
}

impl BatchJob {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let flavor = Flavor::from_path(&name);
        Self { name, bytes, flavor }
    }
}

/// Result of one job.
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    /// The emitted package
    pub result: Result<Vec<u8>>,
}

/// Open every job in its own session, run `transform` on it and emit it.
///
/// Outcomes come back in job order. A failing document yields an error
/// outcome and does not affect the others.
pub fn process_batch<F>(jobs: Vec<BatchJob>, options: &SessionOptions, transform: F) -> Vec<BatchOutcome>
where
    F: Fn(&mut Session) -> Result<()> + Sync,
{
    jobs.into_par_iter()
        .map(|job| {
            let result = run_job(job.bytes, job.flavor, options, &transform);
            if let Err(err) = &result {
                log::warn!("{}: {}", job.name, err);
            }
            BatchOutcome {
                name: job.name,
                result,
            }
        })
        .collect()
}

fn run_job<F>(bytes: Vec<u8>, flavor: Option<Flavor>, options: &SessionOptions, transform: &F) -> Result<Vec<u8>>
where
    F: Fn(&mut Session) -> Result<()>,
{
    let mut session = match flavor {
        Some(flavor) => Session::open_with(bytes, flavor, options.clone())?,
        None => Session::detect_with(bytes, options.clone())?,
    };
    transform(&mut session)?;
    session.emit()
}

/// Names and errors of the jobs that failed.
pub fn failures(outcomes: &[BatchOutcome]) -> impl Iterator<Item = (&str, &DocumentError)> {
    outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
}
