//! # Bandtrack Sheets
//!
//! Spreadsheet I/O for the Bandtrack tracker: a Google Sheets writer that
//! replaces whole worksheets, a timestamped CSV fallback, and symbol list
//! sources backed by the same spreadsheet or by fixed in-memory lists.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`csv_backup`] | Timestamped CSV fallback files |
//! | [`error`] | Sheet and backup error types |
//! | [`symbols`] | Symbol list sources |
//! | [`writer`] | Google Sheets v4 worksheet writer |

pub mod csv_backup;
pub mod error;
pub mod symbols;
pub mod writer;

pub use csv_backup::CsvBackup;
pub use error::{BackupError, SheetError};
pub use symbols::{SheetSymbolSource, StaticSymbolSource, SymbolSource};
pub use writer::{worksheet_name, GoogleSheetsWriter, SheetWriter};
