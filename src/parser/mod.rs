pub mod derivative;
pub mod row;

pub use derivative::{flatten_properties, load_property_database, EXTERNAL_ID_KEY, NAME_KEY};
pub use row::{load_rows, parse_fields, parse_meta, parse_row, split_delimited, RowFields, Scope};
