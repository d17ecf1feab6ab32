pub mod error;
pub mod profile;

pub use profile::*;
