/// CSV reading and writing for metadata tables.
pub mod csv;
