pub mod buffer;
pub mod chunk;
pub mod session;
pub mod source;

pub use buffer::DisplayBuffer;
pub use chunk::SampleChunk;
pub use session::{DisplayHandle, DisplaySnapshot, StreamSession};
pub use source::{ChannelSource, ChunkSource, WavFileSource};
