use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// One spreadsheet cell as extracted by the loader.
///
/// Supplier files carry only text and numbers that matter to us; booleans,
/// dates and error cells are degraded by the loader before they get here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// True for `Empty` and for whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Trimmed text content, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => {
                let t = s.trim();
                if t.is_empty() { None } else { Some(t) }
            }
            _ => None,
        }
    }

    /// Finite numeric value, parsing text cells where possible.
    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Numeric value with the lossy supplier-cell policy: anything that does
    /// not parse as a finite number becomes `0.0`.
    pub fn number_or_zero(&self) -> f64 {
        self.number().unwrap_or(0.0)
    }

    /// Cell content rendered as a string. Whole numbers print without a
    /// fractional part so numeric item codes stay comparable to text ones.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet
// ---------------------------------------------------------------------------

/// An ordered cell matrix, consumed once per analysis.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawSheet {
    pub rows: Vec<Vec<CellValue>>,
}

const EMPTY_CELL: CellValue = CellValue::Empty;

impl RawSheet {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col); out-of-range positions read as empty, matching
    /// how a ragged supplier sheet behaves in the original files.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(|r| r.as_slice())
    }
}

/// Strip rows whose every cell is blank. Pure and idempotent; empty input
/// yields empty output.
pub fn normalize(sheet: RawSheet) -> RawSheet {
    let rows = sheet
        .rows
        .into_iter()
        .filter(|row| !row.iter().all(CellValue::is_blank))
        .collect();
    RawSheet { rows }
}
