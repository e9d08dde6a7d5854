use serde::{Deserialize, Serialize};

use crate::errors::SamplerError;
use crate::schema::{Field, Schema};
use crate::types::{CellValue, ColumnName};

/// One metadata row, aligned with the owning table's schema.
///
/// Equality and hashing cover every cell, passthrough columns included, which
/// is what deduplication uses.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    values: Vec<CellValue>,
}

impl Row {
    /// Wrap raw cell values, normalizing empty strings to null.
    pub fn new(values: Vec<CellValue>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|value| value.filter(|text| !text.is_empty()))
                .collect(),
        }
    }

    /// Cells in schema order.
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `idx`, or `None` when null or out of range.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).and_then(|value| value.as_deref())
    }

    /// True when every cell is non-null.
    pub fn is_fully_populated(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Pad with trailing nulls up to `width` cells.
    pub(crate) fn widened(mut self, width: usize) -> Row {
        if self.values.len() < width {
            self.values.resize(width, None);
        }
        self
    }
}

/// Schema-validated table snapshot.
///
/// Every sampling step reads a table and returns a new one; tables are never
/// edited in place after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, rejecting rows whose arity does not match the schema.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self, SamplerError> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != schema.len())
        {
            return Err(SamplerError::read(
                "table",
                format!(
                    "row {idx} has {} values but the schema has {} columns",
                    row.len(),
                    schema.len()
                ),
            ));
        }
        Ok(Self { schema, rows })
    }

    /// Assemble a table from rows already known to match `schema`.
    pub(crate) fn from_aligned(schema: Schema, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == schema.len()));
        Self { schema, rows }
    }

    /// Empty table with the given schema.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Column layout shared by every row.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `field` in `row`, if the schema has that field and the cell is non-null.
    pub fn value<'a>(&self, row: &'a Row, field: Field) -> Option<&'a str> {
        self.schema.position(field).and_then(|idx| row.get(idx))
    }

    /// Clone the rows at `indices` (in order) into a new table with the same schema.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            schema: self.schema.clone(),
            rows: indices
                .iter()
                .filter_map(|idx| self.rows.get(*idx).cloned())
                .collect(),
        }
    }

    /// Consume the table into its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Header-plus-cells view used by verification and persistence.
    pub fn to_raw(&self) -> RawTable {
        RawTable {
            headers: self
                .schema
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            rows: self
                .rows
                .iter()
                .map(|row| row.values().to_vec())
                .collect(),
        }
    }
}

/// Untyped table exactly as read from CSV: arbitrary headers, nullable cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Header names in file order.
    pub headers: Vec<ColumnName>,
    /// Data rows; `None` marks an empty cell.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Index of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Validate headers and wrap every row, keeping all source columns.
    pub fn into_table(self, source_id: &str) -> Result<Table, SamplerError> {
        let schema = Schema::bind(source_id, &self.headers)?;
        let passthrough = schema.passthrough_names();
        if !passthrough.is_empty() {
            tracing::debug!(
                source = source_id,
                columns = ?passthrough,
                "carrying unknown source columns through"
            );
        }
        let width = schema.len();
        let rows = self
            .rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, None);
                Row::new(cells)
            })
            .collect();
        Ok(Table { schema, rows })
    }
}
