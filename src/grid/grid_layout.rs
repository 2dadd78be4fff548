use crate::errors::ConfigurationError;
use crate::grid::grid_builder::Grid;
use std::str::FromStr;

/// horizontal offset of the `"i)"` label from the left edge of its cell
pub const LABEL_OFFSET: f64 = 20.0;

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn letter() -> Self {
        PageSize {
            width: 612.0,
            height: 792.0,
        }
    }

    pub fn a4() -> Self {
        PageSize {
            width: 595.27,
            height: 841.89,
        }
    }
}

impl FromStr for PageSize {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "letter" => Ok(PageSize::letter()),
            "a4" => Ok(PageSize::a4()),
            _ => Err(ConfigurationError::InvalidValue {
                key: "size".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Where one problem goes. Coordinates have the origin at the bottom-left page corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPlacement {
    /// 1-based problem number
    pub number: usize,
    pub row: usize,
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub label_x: f64,
    pub label_y: f64,
}

impl Grid {
    /// Lays the problems left-to-right, top-to-bottom into `columns` columns between the margins.
    pub fn placements(&self, page: &PageSize) -> Result<Vec<CellPlacement>, ConfigurationError> {
        let spec = &self.spec;
        let n = self.problems.len();
        let columns = spec.columns.max(1);
        let rows = n.div_ceil(columns).max(1);
        let cell_width = (page.width - 2.0 * spec.lm) / columns as f64;
        let cell_height = (page.height - spec.tm - spec.bm) / rows as f64;
        if !(cell_width > 0.0 && cell_height > 0.0) {
            return Err(ConfigurationError::PageTooSmall {
                cell_width,
                cell_height,
            });
        }
        let cells = (0..n)
            .map(|i| {
                let (row, column) = (i / columns, i % columns);
                let x = spec.lm + column as f64 * cell_width;
                let y = page.height - spec.tm - (row + 1) as f64 * cell_height;
                CellPlacement {
                    number: i + 1,
                    row,
                    column,
                    x,
                    y,
                    width: cell_width,
                    height: cell_height,
                    label: format!("{})", i + 1),
                    label_x: x - LABEL_OFFSET,
                    label_y: y + cell_height / 2.0,
                }
            })
            .collect();
        Ok(cells)
    }
}
