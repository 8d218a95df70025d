//! Spreadsheet decoding adapters.

mod calamine_workbook_source;

pub use calamine_workbook_source::CalamineWorkbookSource;
