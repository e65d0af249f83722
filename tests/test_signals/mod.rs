pub mod generate;

pub use generate::{impulse, mixed_tones, rms, sine};
