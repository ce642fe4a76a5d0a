//! Demo Polisher Processing Library
//!
//! Stem separation through external tools (Demucs, Spleeter). Tools run as async
//! child processes bounded by a timeout, a cancellation token and a shared
//! concurrency limit; background jobs go through [`SeparationQueue`].

pub mod queue;
pub mod runner;
pub mod separator;

pub use queue::{SeparationJob, SeparationQueue};
pub use runner::SeparationRunner;
pub use separator::{
    AudioSourceSeparator, SeparationReport, SeparationRequest, SeparatorError, SeparatorFactory,
    SeparatorSettings,
};
#[cfg(feature = "demucs")]
pub use separator::DemucsSeparator;
#[cfg(feature = "spleeter")]
pub use separator::SpleeterSeparator;
