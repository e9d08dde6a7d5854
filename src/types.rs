/// Raw CSV column name.
/// Examples: `cord_uid`, `publish_time`, `sha`
pub type ColumnName = String;
/// Nullable cell value; `None` for empty CSV cells.
/// Examples: `Some("2020-03-14")`, `None`
pub type CellValue = Option<String>;
/// Calendar year used as the stratification key.
/// Examples: `2019`, `2021`
pub type Year = i32;
/// Topic keyword matched against titles (stored lowercase).
/// Examples: `covid`, `sars-cov-2`
pub type Keyword = String;
/// File path strings used in error reports.
/// Example: `data/metadata.csv`
pub type PathString = String;
/// Warning/log message text.
/// Examples: `source table is empty`, `missing required column 'title'`
pub type LogMessage = String;
