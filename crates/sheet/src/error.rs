use std::fmt;

#[derive(Debug)]
pub enum SheetError {
    /// Workbook could not be opened (missing file, unsupported format).
    Open(String),
    /// A worksheet exists but could not be read.
    Read { sheet: String, message: String },
    /// Workbook contains no worksheets.
    NoSheets,
    /// Requested worksheet name not present in the workbook.
    UnknownSheet(String),
    /// Sheet exceeds the import dimension caps.
    TooLarge { rows: usize, cols: usize },
    /// TOML parse / deserialization error for a detection config.
    ConfigParse(String),
    /// Detection config validation error.
    ConfigValidation(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(msg) => write!(f, "cannot open workbook: {msg}"),
            Self::Read { sheet, message } => {
                write!(f, "cannot read sheet '{sheet}': {message}")
            }
            Self::NoSheets => write!(f, "workbook contains no sheets"),
            Self::UnknownSheet(name) => write!(f, "no sheet named '{name}' in workbook"),
            Self::TooLarge { rows, cols } => {
                write!(f, "sheet too large to import: {rows}x{cols}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for SheetError {}
