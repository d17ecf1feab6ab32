pub mod contract;
pub mod error;
pub mod loader;

pub use contract::{ContractLoader, FieldConstraints, FieldContract, SchemaContract};
pub use error::DataFrameError;
pub use loader::CsvLoader;
