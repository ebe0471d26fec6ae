//! Runtime lifecycle for the console binary

use std::future::Future;
use tokio::runtime::Builder;

/// Run `future` to completion on a fresh multi-threaded runtime, then shut
/// the runtime down without waiting on blocking tasks.
///
/// Tokio reads stdin on a blocking-pool thread that only returns once a line
/// arrives. Dropping the runtime normally would wait on that read, so a
/// Ctrl-C at the prompt would not end the process until the operator pressed
/// Enter.
pub fn block_on_detached<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}
