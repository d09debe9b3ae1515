//! Table encoders for downloads: CSV always, XLSX behind the `xlsx` feature.

mod csv_encoder;
#[cfg(feature = "xlsx")]
mod xlsx_encoder;

pub use csv_encoder::CsvTableEncoder;
#[cfg(feature = "xlsx")]
pub use xlsx_encoder::XlsxTableEncoder;

use crate::domain::SpreadsheetCapability;

/// Spreadsheet support compiled into this build.
#[cfg(feature = "xlsx")]
pub fn spreadsheet_capability() -> SpreadsheetCapability {
    SpreadsheetCapability::Available(std::sync::Arc::new(XlsxTableEncoder))
}

/// Spreadsheet support compiled into this build.
#[cfg(not(feature = "xlsx"))]
pub fn spreadsheet_capability() -> SpreadsheetCapability {
    SpreadsheetCapability::unavailable("built without the xlsx feature")
}
