//! RFC 4180 CSV via the `csv` crate.

use crate::domain::ExportTable;
use crate::domain::ports::{EncodeError, TableEncoder};

/// Header row then one record per row; every field is a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableEncoder;

impl TableEncoder for CsvTableEncoder {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, table: &ExportTable) -> Result<Vec<u8>, EncodeError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(table.headers())
            .map_err(|err| EncodeError::write(err.to_string()))?;
        for row in table.rows() {
            writer
                .write_record(row)
                .map_err(|err| EncodeError::write(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| EncodeError::write(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, EmployeeId};

    #[test]
    fn quotes_fields_containing_commas() {
        let table = ExportTable::employees(&[Employee {
            id: EmployeeId::new(1),
            name: "Mensah, Ama".into(),
            department: None,
            contact: Some("ama@example.com".into()),
        }]);
        let bytes = CsvTableEncoder.encode(&table).expect("encode");
        let text = String::from_utf8(bytes).expect("utf8");
        assert_eq!(
            text,
            "ID,Name,Department,Contact\n1,\"Mensah, Ama\",,ama@example.com\n"
        );
    }

    #[test]
    fn empty_table_is_just_the_header() {
        let bytes = CsvTableEncoder
            .encode(&ExportTable::licenses(&[]))
            .expect("encode");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "ID,Software Name,License Key,Expiry Date,Assigned To\n"
        );
    }
}
