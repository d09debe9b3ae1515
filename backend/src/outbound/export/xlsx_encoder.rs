//! Single-sheet XLSX workbooks via `rust_xlsxwriter`.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::ExportTable;
use crate::domain::ports::{EncodeError, TableEncoder};

/// Writes a bold header row and string cells; the sheet is named after
/// the entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxTableEncoder;

fn write_error(err: XlsxError) -> EncodeError {
    EncodeError::write(err.to_string())
}

fn cell_index<T: TryFrom<usize>>(index: usize) -> Result<T, EncodeError> {
    T::try_from(index).map_err(|_| EncodeError::write("table exceeds worksheet bounds"))
}

impl TableEncoder for XlsxTableEncoder {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn encode(&self, table: &ExportTable) -> Result<Vec<u8>, EncodeError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(table.entity().as_str())
            .map_err(write_error)?;

        for (col, header) in table.headers().iter().enumerate() {
            sheet
                .write_string_with_format(0, cell_index(col)?, *header, &header_format)
                .map_err(write_error)?;
        }
        for (index, row) in table.rows().iter().enumerate() {
            let row_number: u32 = cell_index(index + 1)?;
            for (col, value) in row.iter().enumerate() {
                sheet
                    .write_string(row_number, cell_index(col)?, value)
                    .map_err(write_error)?;
            }
        }
        workbook.save_to_buffer().map_err(write_error)
    }
}
