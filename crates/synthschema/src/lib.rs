//! Public SDK surface for synthschema.
//!
//! This crate re-exports the core building blocks, wires them into a
//! [`Pipeline`] from a [`config::SynthConfig`], and provides a small
//! initialization helper to keep consumer setup consistent.

mod output;
mod pipeline;

/// Re-export for convenience.
pub use synthschema_config as config;
pub use synthschema_core as core;

pub use output::write_csv;
pub use pipeline::{Dataset, Pipeline, PipelineError};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
