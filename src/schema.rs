use serde::{Deserialize, Serialize};

use crate::errors::SamplerError;
use crate::types::ColumnName;

/// Semantic kind of a known metadata column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Stable paper identifier.
    Identifier,
    /// Free text (title, abstract, authors, journal, url).
    Text,
    /// Publish date string; parsed only for stratification.
    Date,
    /// Reference to a parsed full-text file.
    Reference,
    /// Identifier in an external registry.
    ExternalId,
}

/// Known metadata columns, declared in canonical output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    /// `cord_uid`
    CordUid,
    /// `title`
    Title,
    /// `abstract`
    Abstract,
    /// `publish_time`
    PublishTime,
    /// `authors`
    Authors,
    /// `journal`
    Journal,
    /// `url`
    Url,
    /// `pdf_json_files`
    PdfJsonFiles,
    /// `pmc_json_files`
    PmcJsonFiles,
    /// `who_covidence_id`
    WhoCovidenceId,
}

impl Field {
    /// Every known field in canonical order.
    pub const ALL: [Field; 10] = [
        Field::CordUid,
        Field::Title,
        Field::Abstract,
        Field::PublishTime,
        Field::Authors,
        Field::Journal,
        Field::Url,
        Field::PdfJsonFiles,
        Field::PmcJsonFiles,
        Field::WhoCovidenceId,
    ];

    /// CSV header name for this field.
    pub const fn column_name(self) -> &'static str {
        match self {
            Field::CordUid => "cord_uid",
            Field::Title => "title",
            Field::Abstract => "abstract",
            Field::PublishTime => "publish_time",
            Field::Authors => "authors",
            Field::Journal => "journal",
            Field::Url => "url",
            Field::PdfJsonFiles => "pdf_json_files",
            Field::PmcJsonFiles => "pmc_json_files",
            Field::WhoCovidenceId => "who_covidence_id",
        }
    }

    /// Semantic kind; the `Date` field drives year stratification.
    pub const fn kind(self) -> FieldKind {
        match self {
            Field::CordUid => FieldKind::Identifier,
            Field::PublishTime => FieldKind::Date,
            Field::PdfJsonFiles | Field::PmcJsonFiles => FieldKind::Reference,
            Field::WhoCovidenceId => FieldKind::ExternalId,
            Field::Title | Field::Abstract | Field::Authors | Field::Journal | Field::Url => {
                FieldKind::Text
            }
        }
    }

    /// Required fields must be present as columns for a source to be usable.
    pub const fn is_required(self) -> bool {
        matches!(self, Field::CordUid | Field::Title | Field::Abstract)
    }

    /// Look up a field by its exact CSV header name.
    pub fn from_column_name(name: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.column_name() == name)
    }
}

/// One table column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// A known metadata field.
    Known(Field),
    /// A source column outside the known set, carried through unchanged.
    Passthrough(ColumnName),
}

impl Column {
    /// CSV header name.
    pub fn name(&self) -> &str {
        match self {
            Column::Known(field) => field.column_name(),
            Column::Passthrough(name) => name,
        }
    }

    /// The known field behind this column, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Column::Known(field) => Some(*field),
            Column::Passthrough(_) => None,
        }
    }
}

/// Ordered column list of a table.
///
/// Loaded tables keep the source header order, passthrough columns included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Schema containing every known field in canonical order.
    pub fn full() -> Self {
        Self::from_fields(Field::ALL)
    }

    /// Build a schema of known fields, sorting and deduplicating them.
    ///
    /// Required fields are not enforced here; use [`Schema::bind`] for loaded data.
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut fields: Vec<Field> = fields.into_iter().collect();
        fields.sort();
        fields.dedup();
        Self {
            columns: fields.into_iter().map(Column::Known).collect(),
        }
    }

    /// Validate a CSV header row, keeping every column in header order.
    ///
    /// Duplicate header names and missing required fields are read failures.
    pub fn bind<S: AsRef<str>>(source_id: &str, headers: &[S]) -> Result<Schema, SamplerError> {
        let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
        for header in headers {
            let name = header.as_ref().trim();
            if columns.iter().any(|column| column.name() == name) {
                return Err(SamplerError::read(
                    source_id,
                    format!("duplicate column '{name}'"),
                ));
            }
            columns.push(match Field::from_column_name(name) {
                Some(field) => Column::Known(field),
                None => Column::Passthrough(name.to_string()),
            });
        }
        let schema = Schema { columns };
        if let Some(missing) = Field::ALL
            .into_iter()
            .filter(|field| field.is_required())
            .find(|field| schema.position(*field).is_none())
        {
            return Err(SamplerError::read(
                source_id,
                format!("missing required column '{}'", missing.column_name()),
            ));
        }
        Ok(schema)
    }

    /// This schema followed by every absent known field, in canonical order.
    ///
    /// Existing column positions are unchanged, so rows widen by appending nulls.
    pub fn with_all_fields(&self) -> Schema {
        let mut columns = self.columns.clone();
        columns.extend(
            Field::ALL
                .into_iter()
                .filter(|field| self.position(*field).is_none())
                .map(Column::Known),
        );
        Schema { columns }
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns, passthrough columns included.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column index of `field`, if the schema contains it.
    pub fn position(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.field() == Some(field))
    }

    /// Index of the first column whose field is of kind [`FieldKind::Date`].
    pub fn date_column(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.field().is_some_and(|field| field.kind() == FieldKind::Date))
    }

    /// Header names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Names of the passthrough columns, in order.
    pub fn passthrough_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.field().is_none())
            .map(Column::name)
            .collect()
    }
}
