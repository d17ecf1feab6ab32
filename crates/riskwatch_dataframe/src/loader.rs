use crate::error::DataFrameError;
use arrow::array::{ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Float64Type};
use regex::Regex;
use riskwatch_drift::{DatasetLoader, DriftError};
use riskwatch_types::{Column, Dataset};
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_BATCH_SIZE: usize = 8192;

/// Cells read as missing: empty fields plus the usual NA spellings of
/// spreadsheet and dataframe exports.
pub const DEFAULT_NULL_PATTERN: &str = r"^(|NA|N/A|n/a|NaN|nan|-NaN|-nan|null|NULL|None|<NA>|#NA|#N/A|#N/A N/A|1\.#IND|-1\.#IND|1\.#QNAN|-1\.#QNAN)$";

/// Integer, floating point and decimal columns are numeric. A column with no
/// values at all is treated as an all-missing numeric column.
fn is_numeric(data_type: &DataType) -> bool {
    data_type.is_integer()
        || data_type.is_floating()
        || matches!(
            data_type,
            DataType::Decimal128(_, _) | DataType::Decimal256(_, _) | DataType::Null
        )
}

enum ColumnBuffer {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnBuffer {
    fn for_type(data_type: &DataType) -> Self {
        if is_numeric(data_type) {
            ColumnBuffer::Numeric(Vec::new())
        } else {
            ColumnBuffer::Text(Vec::new())
        }
    }

    fn extend(&mut self, array: &ArrayRef) -> Result<(), DataFrameError> {
        match self {
            ColumnBuffer::Numeric(values) => {
                let array = cast(array, &DataType::Float64)?;
                values.extend(array.as_primitive::<Float64Type>().iter());
            }
            ColumnBuffer::Text(values) => {
                let array = cast(array, &DataType::Utf8)?;
                values.extend(
                    array
                        .as_string::<i32>()
                        .iter()
                        .map(|value| value.map(str::to_string)),
                );
            }
        }
        Ok(())
    }

    /// Text columns whose every value parses as a float (`inf`, `-inf`) are
    /// numeric too; arrow's inference only recognizes finite literals.
    fn into_column(self, name: &str) -> Column {
        match self {
            ColumnBuffer::Numeric(values) => Column::numeric(name, values),
            ColumnBuffer::Text(values) => match parse_floats(&values) {
                Some(parsed) => Column::numeric(name, parsed),
                None => Column::text(name, values),
            },
        }
    }
}

fn parse_floats(values: &[Option<String>]) -> Option<Vec<Option<f64>>> {
    values
        .iter()
        .map(|value| match value {
            Some(value) => value.trim().parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect()
}

/// Reads header-row CSV files into a [`Dataset`], inferring column types from
/// the data.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    pub delimiter: u8,
    pub batch_size: usize,
    /// Rows scanned for type inference; `None` scans the whole file.
    pub infer_rows: Option<usize>,
    /// Regex matched against whole cells to mark them missing.
    pub null_pattern: String,
}

impl Default for CsvLoader {
    fn default() -> Self {
        CsvLoader {
            delimiter: b',',
            batch_size: DEFAULT_BATCH_SIZE,
            infer_rows: None,
            null_pattern: DEFAULT_NULL_PATTERN.to_string(),
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_null_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.null_pattern = pattern.into();
        self
    }

    pub fn read(&self, path: &Path) -> Result<Dataset, DataFrameError> {
        let io_error = |source| DataFrameError::IoError {
            path: path.to_path_buf(),
            source,
        };
        let csv_error = |source| DataFrameError::CsvError {
            path: path.to_path_buf(),
            source,
        };

        let null_regex = Regex::new(&self.null_pattern)?;
        let mut file = File::open(path).map_err(io_error)?;

        let format = Format::default()
            .with_header(true)
            .with_delimiter(self.delimiter)
            .with_null_regex(null_regex);
        let (schema, records) = format
            .infer_schema(&mut file, self.infer_rows)
            .map_err(csv_error)?;
        file.rewind().map_err(io_error)?;

        debug!(
            "Inferred {} columns from {} records in {}",
            schema.fields().len(),
            records,
            path.display()
        );

        let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        let mut buffers: Vec<ColumnBuffer> = schema
            .fields()
            .iter()
            .map(|f| ColumnBuffer::for_type(f.data_type()))
            .collect();

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_format(format)
            .with_batch_size(self.batch_size)
            .build(file)
            .map_err(csv_error)?;

        for batch in reader {
            let batch = batch.map_err(csv_error)?;
            for (buffer, array) in buffers.iter_mut().zip(batch.columns()) {
                buffer.extend(array)?;
            }
        }

        let columns = names
            .iter()
            .zip(buffers)
            .map(|(name, buffer)| buffer.into_column(name))
            .collect();

        Ok(Dataset::new(columns)?)
    }
}

impl DatasetLoader for CsvLoader {
    fn load(&self, path: &Path) -> Result<Dataset, DriftError> {
        Ok(self.read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskwatch_types::ColumnData;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_mixed_columns() {
        let file = write_csv(
            "age,heart_rate,node,label\n\
             34,72.5,clinic_a,true\n\
             51,,clinic_b,false\n\
             47,88.0,,true\n",
        );

        let dataset = CsvLoader::new().read(file.path()).unwrap();

        assert_eq!(dataset.n_rows(), 3);
        assert_eq!(
            dataset.column_names(),
            vec!["age", "heart_rate", "node", "label"]
        );
        assert_eq!(dataset.numeric_features(), vec!["age", "heart_rate"]);
        assert_eq!(dataset.dropna("age").unwrap().to_vec(), vec![34.0, 51.0, 47.0]);
        assert_eq!(
            dataset.numeric_column("heart_rate").unwrap(),
            &[Some(72.5), None, Some(88.0)]
        );

        match &dataset.column("node").unwrap().data {
            ColumnData::Text(values) => assert_eq!(values[0].as_deref(), Some("clinic_a")),
            other => panic!("Expected text column, got {other:?}"),
        }
    }

    #[test]
    fn test_read_across_batches() {
        let mut content = String::from("x\n");
        for i in 0..25 {
            content.push_str(&format!("{i}\n"));
        }
        let file = write_csv(&content);

        let loader = CsvLoader {
            batch_size: 10,
            ..Default::default()
        };
        let dataset = loader.read(file.path()).unwrap();

        assert_eq!(dataset.n_rows(), 25);
        assert_eq!(dataset.dropna("x").unwrap()[24], 24.0);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let file = write_csv("a;b\n1;2\n3;4\n");

        let dataset = CsvLoader::new()
            .with_delimiter(b';')
            .read(file.path())
            .unwrap();

        assert_eq!(dataset.dropna("b").unwrap().to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_na_tokens_are_missing() {
        let file = write_csv("hr,node\n70,a\nNA,b\n80,null\nnan,N/A\n,c\n");

        let dataset = CsvLoader::new().read(file.path()).unwrap();

        assert_eq!(dataset.numeric_features(), vec!["hr"]);
        assert_eq!(
            dataset.numeric_column("hr").unwrap(),
            &[Some(70.0), None, Some(80.0), None, None]
        );
        assert_eq!(dataset.dropna("hr").unwrap().to_vec(), vec![70.0, 80.0]);

        match &dataset.column("node").unwrap().data {
            ColumnData::Text(values) => {
                assert_eq!(values.iter().filter(|v| v.is_none()).count(), 2)
            }
            other => panic!("Expected text column, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_null_pattern() {
        let file = write_csv("hr\n70\nmissing\n80\n");

        let dataset = CsvLoader::new()
            .with_null_pattern("^(|missing)$")
            .read(file.path())
            .unwrap();
        assert_eq!(dataset.dropna("hr").unwrap().to_vec(), vec![70.0, 80.0]);

        // NA is an ordinary string once the pattern no longer lists it
        let file = write_csv("hr\n70\nNA\n");
        let dataset = CsvLoader::new()
            .with_null_pattern("^$")
            .read(file.path())
            .unwrap();
        assert!(dataset.numeric_features().is_empty());

        let result = CsvLoader::new().with_null_pattern("(").read(file.path());
        assert!(matches!(result, Err(DataFrameError::NullPatternError(_))));
    }

    #[test]
    fn test_infinities_are_numeric() {
        let file = write_csv("x\n1.5\ninf\n-inf\nNA\n");

        let dataset = CsvLoader::new().read(file.path()).unwrap();

        assert_eq!(dataset.numeric_features(), vec!["x"]);
        assert_eq!(
            dataset.dropna("x").unwrap().to_vec(),
            vec![1.5, f64::INFINITY, f64::NEG_INFINITY]
        );
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = CsvLoader::new().read(Path::new("/nonexistent/reference.csv"));
        assert!(matches!(result, Err(DataFrameError::IoError { .. })));

        let drift_result = CsvLoader::new().load(Path::new("/nonexistent/reference.csv"));
        assert!(matches!(drift_result, Err(DriftError::LoadError(_))));
    }
}
