use super::report::{cell_text, TableAction};
use crate::error::ExportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a table as CSV to `path`.
pub fn export_csv<P: AsRef<Path>>(table: &TableAction, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_csv(table, file)
}

/// Writes a table as CSV: a header of column names, then one record per row.
pub fn write_csv<W: Write>(table: &TableAction, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(cell_text))?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::report::thickness_table;
    use crate::model::ThicknessAggregate;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_header_and_rows() {
        let table = thickness_table(&[ThicknessAggregate {
            thickness: 150,
            count: 2,
            area: 0.0,
            volume: 2.5,
        }]);

        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Thickness (mm),Count,Volume (m3)\n150,2,2.5\n"
        );
    }
}
