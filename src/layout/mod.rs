//! Page layout for report cards.
//!
//! Layout runs in two passes. The first places content blocks top to bottom,
//! breaking pages whenever a block would cross the bottom margin. The second
//! stamps every page with its footer once the total page count is known.
//! The result is a list of pages holding positioned draw operations, which
//! [`crate::render`] turns into PDF bytes.
//!
//! Coordinates are millimetres from the top-left corner of the page.

mod canvas;
mod report;
pub mod style;
pub mod table;
pub mod text;

pub use canvas::{Canvas, LayoutState};
pub use report::{assessment_breakdown, disclaimer, ReportCardLayout};
pub use style::{Rgb, Styles};

use thiserror::Error;

/// Tolerance for float comparisons against page limits.
pub(crate) const EPSILON: f32 = 1e-3;

/// Layout failures. These indicate content that cannot be placed at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("{block} block needs {height:.1}mm but a page only has {available:.1}mm")]
    BlockTooTall {
        block: &'static str,
        height: f32,
        available: f32,
    },

    #[error("table row {row} needs {height:.1}mm but a page only has {available:.1}mm below the header")]
    RowTooTall { row: usize, height: f32, available: f32 },
}

/// Page size and margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    /// A4 portrait with a 25mm bottom margin that holds the page footer.
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        margin_top: 20.0,
        margin_bottom: 25.0,
        margin_left: 20.0,
        margin_right: 20.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest y any content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    pub fn content_height(&self) -> f32 {
        self.content_bottom() - self.margin_top
    }

    /// Baseline of the per-page footer line, inside the bottom margin.
    pub fn footer_baseline(&self) -> f32 {
        self.height - 12.0
    }

    /// Whether a block of `height` placed at `y` stays above the bottom margin.
    pub fn fits(&self, y: f32, height: f32) -> bool {
        y + height <= self.content_bottom() + EPSILON
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.content_width() <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "margins leave no width on a {}mm page",
                self.width
            )));
        }
        if self.content_height() <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "margins leave no height on a {}mm page",
                self.height
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A run of text anchored at `x` (per `align`) with its baseline at `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: Weight,
    pub color: Rgb,
    pub align: Align,
}

/// A rectangle with optional fill and outline.
#[derive(Debug, Clone, PartialEq)]
pub struct RectOp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub line_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Rect(RectOp),
}

/// What a placed block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    StudentInfo,
    SectionTitle,
    TableHeader,
    TableRow(usize),
    Summary,
    DocumentFooter,
}

/// Vertical extent of one placed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: BlockKind,
    pub top: f32,
    pub height: f32,
}

impl Placement {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub ops: Vec<DrawOp>,
    pub blocks: Vec<Placement>,
}

impl Page {
    /// All text on the page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t.text.as_str()),
            DrawOp::Rect(_) => None,
        })
    }
}

/// Fully laid-out document.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_content_area() {
        let g = PageGeometry::A4;
        assert_eq!(g.content_width(), 170.0);
        assert_eq!(g.content_bottom(), 272.0);
        assert_eq!(g.content_height(), 252.0);
        assert!(g.footer_baseline() > g.content_bottom());
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_fits_is_inclusive() {
        let g = PageGeometry::A4;
        assert!(g.fits(262.0, 10.0));
        assert!(!g.fits(262.0, 10.5));
    }

    #[test]
    fn test_invalid_geometry() {
        let g = PageGeometry {
            margin_top: 150.0,
            margin_bottom: 150.0,
            ..PageGeometry::A4
        };
        assert!(matches!(g.validate(), Err(LayoutError::InvalidGeometry(_))));
    }
}
