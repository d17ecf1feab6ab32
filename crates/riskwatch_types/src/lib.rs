pub mod binning;
pub mod config;
pub mod dataset;
pub mod drift;
pub mod error;
pub mod util;

pub use config::*;
pub use dataset::*;
pub use drift::*;
pub use util::*;
