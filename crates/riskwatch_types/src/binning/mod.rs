pub mod equal_width;

pub mod histogram;

pub mod quantile;

pub mod strategy;

pub use equal_width::*;
pub use histogram::*;
pub use quantile::*;
pub use strategy::*;
