use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single record in wire form: column name to cell value, in column order.
pub type Record = IndexMap<String, String>;

/// Returned when a row does not have exactly one value per schema column.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("row has {found} values but the schema has {expected} columns")]
pub struct RowWidthError {
    pub expected: usize,
    pub found: usize,
}

/// Ordered list of column names shared by every row of a [`Dataset`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Builds a schema without validating names.
    ///
    /// Callers that read untrusted headers go through [`crate::loader`], which
    /// rejects empty and duplicate names before getting here.
    pub fn new(columns: Vec<String>) -> Self {
        Schema { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index_of(column).is_some()
    }
}

/// One row of cell values, positionally aligned with the owning [`Schema`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Value at a column position. Out-of-range positions read as empty.
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// An ordered, uniformly shaped collection of rows.
///
/// Every row holds exactly `schema.len()` values; this is checked when rows
/// are added so the filter engine never has to probe for missing keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    schema: Schema,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(schema: Schema) -> Self {
        Dataset {
            schema,
            rows: Vec::new(),
        }
    }

    /// Appends a row, rejecting it if its width does not match the schema.
    pub fn push_row(&mut self, values: Vec<String>) -> Result<(), RowWidthError> {
        if values.len() != self.schema.len() {
            return Err(RowWidthError {
                expected: self.schema.len(),
                found: values.len(),
            });
        }
        self.rows.push(Row { values });
        Ok(())
    }

    /// Builds a dataset from wire records.
    ///
    /// Columns come from the key order of the first record. Keys missing from
    /// later records become empty values; keys the first record lacks are
    /// dropped with a warning.
    pub fn from_records(records: &[Record]) -> Self {
        let schema = Schema::new(crate::engine::discover_columns(records));
        let mut rows = Vec::with_capacity(records.len());
        let mut dropped = 0usize;

        for record in records {
            let values = schema
                .columns()
                .iter()
                .map(|column| record.get(column).cloned().unwrap_or_default())
                .collect();
            dropped += record.keys().filter(|k| !schema.contains(k)).count();
            rows.push(Row { values });
        }

        if dropped > 0 {
            log::warn!(
                "dropped {} cell(s) whose column is not in the schema {:?}",
                dropped,
                schema.columns()
            );
        }

        Dataset { schema, rows }
    }

    /// Converts back to wire records, one key per schema column.
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.schema
                    .columns()
                    .iter()
                    .cloned()
                    .zip(row.values.iter().cloned())
                    .collect()
            })
            .collect()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in `row`, or `None` if the column is not in the schema.
    pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a str> {
        self.schema.index_of(column).map(|i| row.get(i))
    }
}

/// Per-column substring patterns. An absent or empty pattern is no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(IndexMap<String, String>);

impl FilterState {
    /// An unconstrained filter state with an empty entry for every column.
    pub fn for_columns(columns: &[String]) -> Self {
        FilterState(columns.iter().map(|c| (c.clone(), String::new())).collect())
    }

    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, column: impl Into<String>, pattern: impl Into<String>) {
        self.0.insert(column.into(), pattern.into());
    }

    /// Columns that carry a non-empty pattern.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(c, p)| (c.as_str(), p.as_str()))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, p)| (c.as_str(), p.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FilterState(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The (dataset, filter state) pair saved and loaded by the viewer.
///
/// Serialized as `{ "dataset": [...], "filterState": {...} }`. The store keeps
/// whatever JSON it was handed; [`Snapshot::from_payload`] is where that JSON
/// is turned back into typed records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub dataset: Vec<Record>,
    pub filter_state: FilterState,
}

impl Snapshot {
    pub fn new(dataset: &Dataset, filter_state: &FilterState) -> Self {
        Snapshot {
            dataset: dataset.to_records(),
            filter_state: filter_state.clone(),
        }
    }

    /// Reads a stored payload without rejecting anything.
    ///
    /// The older `csvData` / `filterValues` names are accepted. Non-string
    /// cells are rendered as JSON text and `null` as empty. Rows that are not
    /// objects are skipped, and a payload without a usable dataset yields an
    /// empty snapshot.
    ///
    /// ```
    /// use serde_json::json;
    /// use tableview::table::Snapshot;
    ///
    /// let payload = json!({"csvData": [{"name": "Apple", "price": 1}], "filterValues": {"price": "1"}});
    /// let snapshot = Snapshot::from_payload(&payload);
    /// assert_eq!(snapshot.dataset[0]["price"], "1");
    /// assert_eq!(snapshot.filter_state.get("price"), "1");
    /// ```
    pub fn from_payload(payload: &Value) -> Self {
        let dataset: Vec<Record> = payload_field(payload, "dataset", "csvData")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(Value::as_object)
                    .map(|row| row.iter().map(|(k, v)| (k.clone(), cell_text(v))).collect())
                    .collect()
            })
            .unwrap_or_default();

        let filter_state = payload_field(payload, "filterState", "filterValues")
            .and_then(Value::as_object)
            .map(|filters| filters.iter().map(|(k, v)| (k.clone(), cell_text(v))).collect())
            .unwrap_or_default();

        Snapshot {
            dataset,
            filter_state,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }
}

fn payload_field<'a>(payload: &'a Value, name: &str, alias: &str) -> Option<&'a Value> {
    payload.get(name).or_else(|| payload.get(alias))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
