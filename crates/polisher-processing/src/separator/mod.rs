//! Audio source separation module

#[cfg(feature = "demucs")]
pub mod demucs;
pub mod factory;
#[cfg(feature = "spleeter")]
pub mod spleeter;
pub mod traits;

#[cfg(feature = "demucs")]
pub use demucs::DemucsSeparator;
pub use factory::{SeparatorFactory, SeparatorSettings};
#[cfg(feature = "spleeter")]
pub use spleeter::SpleeterSeparator;
pub use traits::{AudioSourceSeparator, SeparationReport, SeparationRequest, SeparatorError};
