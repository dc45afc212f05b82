//! The `Process` trait and the runner that wraps every execution

use crate::descriptor::ProcessInfo;
use crate::error::{ProcessError, Result};
use std::time::Instant;
use tracing::{debug, debug_span};

/// A named geospatial operation with typed inputs and outputs.
///
/// Implementors are unit structs; [`Process::info`] describes the parameters
/// and [`Process::execute`] calls into the engines. Use [`run`] rather than
/// calling `execute` directly so inputs are validated and the run is logged.
pub trait Process {
    type Input;
    type Output;

    fn info(&self) -> &'static ProcessInfo;

    /// Reject inputs the engine should never see
    fn validate(&self, _input: &Self::Input) -> Result<()> {
        Ok(())
    }

    fn execute(&self, input: Self::Input) -> geoprocs_core::Result<Self::Output>;
}

/// Validate and execute a process inside a span named after it
pub fn run<P: Process>(process: &P, input: P::Input) -> Result<P::Output> {
    let info = process.info();
    let span = debug_span!("process", name = info.name);
    let _enter = span.enter();

    process.validate(&input)?;
    debug!("Running {}", info.title);

    let start = Instant::now();
    let output = process
        .execute(input)
        .map_err(|source| ProcessError::Execution {
            process: info.name,
            source,
        })?;
    debug!(elapsed_ms = start.elapsed().as_secs_f64() * 1e3, "{} finished", info.name);

    Ok(output)
}
