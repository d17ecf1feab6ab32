pub mod num_profiler;

pub use num_profiler::*;
