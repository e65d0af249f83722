pub mod fir_core;
pub mod post_process;
pub mod response;
pub mod streaming;

pub use fir_core::FilterState;
pub use response::{energy_centroid, gain_at, magnitude_response};
pub use streaming::StreamingFilterApplier;
