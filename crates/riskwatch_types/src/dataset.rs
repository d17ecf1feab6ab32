use crate::error::TypeError;
use ndarray::Array1;
use std::collections::HashSet;

/// Values of a single column. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Numeric column. NaN is stored as missing, infinities are kept as observations.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect();

        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }
}

/// In-memory tabular snapshot. Rows carry no meaning for drift purposes,
/// columns keep the order they were loaded in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, TypeError> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TypeError::DuplicateColumnError(column.name.clone()));
            }

            if column.data.len() != n_rows {
                return Err(TypeError::ColumnLengthError {
                    name: column.name.clone(),
                    expected: n_rows,
                    found: column.data.len(),
                });
            }
        }

        Ok(Dataset { columns, n_rows })
    }

    /// Build a dataset of fully observed numeric columns. NaN is treated as missing.
    pub fn from_numeric<S>(columns: Vec<(S, Vec<f64>)>) -> Result<Self, TypeError>
    where
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column::numeric(name, values.into_iter().map(Some).collect()))
            .collect();

        Dataset::new(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_features(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.data.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn numeric_column(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name).map(|c| &c.data) {
            Some(ColumnData::Numeric(values)) => Some(values),
            _ => None,
        }
    }

    /// Observed values of a numeric column with missing entries removed.
    ///
    /// Returns `None` when the column does not exist or is not numeric.
    pub fn dropna(&self, name: &str) -> Option<Array1<f64>> {
        self.numeric_column(name)
            .map(|values| values.iter().flatten().copied().collect::<Array1<f64>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropna_skips_missing_and_nan() {
        let dataset = Dataset::new(vec![
            Column::numeric("x", vec![Some(1.0), None, Some(f64::NAN), Some(4.0)]),
            Column::text(
                "node",
                vec![Some("a".into()), None, Some("b".into()), Some("c".into())],
            ),
        ])
        .unwrap();

        assert_eq!(dataset.n_rows(), 4);
        assert_eq!(dataset.dropna("x").unwrap().to_vec(), vec![1.0, 4.0]);
        assert!(dataset.dropna("node").is_none());
        assert!(dataset.dropna("missing").is_none());
        assert_eq!(dataset.numeric_features(), vec!["x".to_string()]);
        assert_eq!(
            dataset.column_names(),
            vec!["x".to_string(), "node".to_string()]
        );
    }

    #[test]
    fn test_mismatched_column_lengths() {
        let result = Dataset::from_numeric(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]);

        match result {
            Err(TypeError::ColumnLengthError {
                name,
                expected,
                found,
            }) => {
                assert_eq!(name, "b");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected ColumnLengthError, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_columns() {
        let result = Dataset::from_numeric(vec![("a", vec![1.0]), ("a", vec![2.0])]);
        assert!(matches!(result, Err(TypeError::DuplicateColumnError(_))));
    }

    #[test]
    fn test_infinities_are_observed_values() {
        let dataset = Dataset::from_numeric(vec![(
            "hr",
            vec![70.0, f64::INFINITY, f64::NAN, f64::NEG_INFINITY],
        )])
        .unwrap();

        assert_eq!(
            dataset.numeric_column("hr").unwrap(),
            &[Some(70.0), Some(f64::INFINITY), None, Some(f64::NEG_INFINITY)]
        );
        assert_eq!(
            dataset.dropna("hr").unwrap().to_vec(),
            vec![70.0, f64::INFINITY, f64::NEG_INFINITY]
        );
    }
}
