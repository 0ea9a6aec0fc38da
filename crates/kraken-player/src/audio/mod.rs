mod analyser;
mod source_pipe;

pub use analyser::{follow_transport, Analyser};
pub use source_pipe::SourcePipe;
