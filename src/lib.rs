pub mod config;
pub mod constants;
pub mod design;
pub mod error;
pub mod output;
pub mod signal_processing;
pub mod stream;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{FilterParams, ViewerConfig};
pub use design::{FilterCoefficients, FilterDesigner, FilterSpec};
pub use error::{FilterError, Result};
pub use signal_processing::StreamingFilterApplier;
pub use stream::{SampleChunk, StreamSession};
pub use wav::save_wav;
