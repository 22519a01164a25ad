//! Runtime seam for running dispatched calls.

use std::future::Future;

/// Abstraction for spawning task execution on a runtime.
///
/// The gate spawns its dispatch loop and every admitted call through this
/// trait, so dispatch never waits for a call to finish.
pub trait Spawn {
    /// Spawn a future that runs to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
