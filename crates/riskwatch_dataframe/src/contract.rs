use crate::error::DataFrameError;
use crate::loader::CsvLoader;
use riskwatch_drift::{DatasetLoader, DriftError};
use riskwatch_types::{ColumnData, Dataset};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldConstraints {
    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldContract {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub constraints: FieldConstraints,
}

/// Data contract a dataset snapshot must satisfy before it is monitored.
///
/// ```yaml
/// fields:
///   - name: age
///     required: true
///     constraints: { min: 0, max: 120 }
///   - name: node
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaContract {
    pub fields: Vec<FieldContract>,
}

impl SchemaContract {
    pub fn from_yaml_file(path: &Path) -> Result<Self, DataFrameError> {
        let content = std::fs::read_to_string(path).map_err(|source| DataFrameError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| DataFrameError::ContractParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks that every listed field exists, that required fields have no
    /// missing values and that numeric values respect their bounds.
    ///
    /// Stops at the first violated field.
    pub fn validate(&self, data: &Dataset) -> Result<(), DataFrameError> {
        let missing: Vec<&str> = self
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .filter(|name| !data.has_column(name))
            .collect();

        if !missing.is_empty() {
            return Err(DataFrameError::SchemaError(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        for field in &self.fields {
            self.validate_field(field, data)?;
            debug!("Field {} satisfies its contract", field.name);
        }

        info!(
            "Dataset with {} rows satisfies a contract of {} fields",
            data.n_rows(),
            self.fields.len()
        );

        Ok(())
    }

    fn validate_field(&self, field: &FieldContract, data: &Dataset) -> Result<(), DataFrameError> {
        let Some(column) = data.column(&field.name) else {
            return Err(DataFrameError::SchemaError(format!(
                "missing column: {}",
                field.name
            )));
        };

        let has_missing = match &column.data {
            ColumnData::Numeric(values) => values.iter().any(Option::is_none),
            ColumnData::Text(values) => values.iter().any(Option::is_none),
        };

        if field.required && has_missing {
            return Err(DataFrameError::SchemaError(format!(
                "{} has nulls but is required",
                field.name
            )));
        }

        let FieldConstraints { min, max } = &field.constraints;
        if min.is_none() && max.is_none() {
            return Ok(());
        }

        let ColumnData::Numeric(values) = &column.data else {
            return Err(DataFrameError::SchemaError(format!(
                "{} has range constraints but is not numeric",
                field.name
            )));
        };

        if let Some(min) = min {
            if values.iter().flatten().any(|value| value < min) {
                return Err(DataFrameError::SchemaError(format!(
                    "{} below min {}",
                    field.name, min
                )));
            }
        }

        if let Some(max) = max {
            if values.iter().flatten().any(|value| value > max) {
                return Err(DataFrameError::SchemaError(format!(
                    "{} above max {}",
                    field.name, max
                )));
            }
        }

        Ok(())
    }
}

/// Reads CSV snapshots and rejects the ones that break a contract.
pub struct ContractLoader {
    pub loader: CsvLoader,
    pub contract: SchemaContract,
}

impl ContractLoader {
    pub fn new(loader: CsvLoader, contract: SchemaContract) -> Self {
        ContractLoader { loader, contract }
    }
}

impl DatasetLoader for ContractLoader {
    fn load(&self, path: &Path) -> Result<Dataset, DriftError> {
        let data = self.loader.read(path)?;
        self.contract.validate(&data)?;
        Ok(data)
    }
}
