use crate::error::UtilError;
use colored_json::{Color, ColorMode, ColoredFormatter, PrettyFormatter, Styler};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Serde adapter for floats that may be NaN or infinite.
///
/// Non-finite values are written as JSON `null` and `null` reads back as NaN,
/// so degenerate statistics never fail serialization.
pub mod finite_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

pub struct ReportFuncs {}

impl ReportFuncs {
    /// Pretty, coloured JSON for terminals.
    pub fn __str__<T: Serialize>(object: T) -> String {
        match ColoredFormatter::with_styler(
            PrettyFormatter::default(),
            Styler {
                key: Color::Rgb(245, 77, 85).bold(),
                string_value: Color::Rgb(249, 179, 93).foreground(),
                float_value: Color::Rgb(249, 179, 93).foreground(),
                integer_value: Color::Rgb(249, 179, 93).foreground(),
                bool_value: Color::Rgb(249, 179, 93).foreground(),
                nil_value: Color::Rgb(249, 179, 93).foreground(),
                ..Default::default()
            },
        )
        .to_colored_json(&object, ColorMode::On)
        {
            Ok(json) => json,
            Err(e) => format!("Failed to serialize to json: {e}"),
        }
    }

    pub fn __json__<T: Serialize>(object: T) -> String {
        match serde_json::to_string_pretty(&object) {
            Ok(json) => json,
            Err(e) => format!("Failed to serialize to json: {e}"),
        }
    }

    /// Converts a report into a plain JSON tree of objects, arrays, strings,
    /// numbers, booleans and nulls.
    pub fn to_json_value<T: Serialize>(object: &T) -> Result<Value, UtilError> {
        serde_json::to_value(object).map_err(|e| UtilError::SerializeError(e.to_string()))
    }

    /// Writes `model` as 2-space indented JSON, creating parent directories and
    /// overwriting any existing file.
    pub fn save_to_json<T>(model: &T, path: &Path) -> Result<(), UtilError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string_pretty(model)
            .map_err(|e| UtilError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                debug!("Creating report directory {}", parent.display());
                std::fs::create_dir_all(parent).map_err(|e| UtilError::io(parent, e))?;
            }
        }

        std::fs::write(path, json).map_err(|e| UtilError::io(path, e))?;
        info!("Drift report saved to {}", path.display());

        Ok(())
    }

    pub fn load_from_json<T>(path: &Path) -> Result<T, UtilError>
    where
        T: DeserializeOwned,
    {
        let file = std::fs::read_to_string(path).map_err(|e| UtilError::io(path, e))?;

        serde_json::from_str(&file).map_err(|e| UtilError::DeSerializeError(e.to_string()))
    }
}
