//! Page list with a vertical cursor.

use super::{BlockKind, DrawOp, LayoutError, Page, PageGeometry, Placement, RectOp, TextOp};

/// Where the next block goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    /// 0-based index into the page list.
    pub page_index: usize,
    /// Top of the next block.
    pub y: f32,
}

/// Accumulates pages and draw operations for a single document.
#[derive(Debug)]
pub struct Canvas {
    geometry: PageGeometry,
    pages: Vec<Page>,
    state: LayoutState,
}

impl Canvas {
    /// Start a document with one empty page.
    pub fn new(geometry: PageGeometry) -> Result<Self, LayoutError> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            pages: vec![Page {
                number: 1,
                ..Page::default()
            }],
            state: LayoutState {
                page_index: 0,
                y: geometry.margin_top,
            },
        })
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a page and move the cursor to its top margin.
    pub fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            ..Page::default()
        });
        self.state = LayoutState {
            page_index: number - 1,
            y: self.geometry.margin_top,
        };
    }

    /// Break the page unless `height` fits below the cursor.
    pub fn ensure_space(&mut self, block: &'static str, height: f32) -> Result<(), LayoutError> {
        let available = self.geometry.content_height();
        if height > available + super::EPSILON {
            return Err(LayoutError::BlockTooTall {
                block,
                height,
                available,
            });
        }
        if !self.geometry.fits(self.state.y, height) {
            self.new_page();
        }
        Ok(())
    }

    /// Record a block of `height` at the cursor and advance past it.
    /// Returns the block's top.
    pub fn place(&mut self, kind: BlockKind, height: f32) -> f32 {
        let top = self.state.y;
        self.current_page().blocks.push(Placement { kind, top, height });
        self.state.y += height;
        top
    }

    /// Record a block at an explicit top on the current page.
    pub fn place_at(&mut self, kind: BlockKind, top: f32, height: f32) {
        self.current_page().blocks.push(Placement { kind, top, height });
        self.state.y = top + height;
    }

    /// Put the cursor at `y` on the current page.
    pub fn set_cursor(&mut self, y: f32) {
        self.state.y = y;
    }

    /// Move the cursor down without placing anything.
    pub fn advance(&mut self, gap: f32) {
        self.state.y += gap;
    }

    pub fn text(&mut self, op: TextOp) {
        self.current_page().ops.push(DrawOp::Text(op));
    }

    pub fn rect(&mut self, op: RectOp) {
        self.current_page().ops.push(DrawOp::Rect(op));
    }

    /// Mutable access to every page, for the stamping pass.
    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    fn current_page(&mut self) -> &mut Page {
        let index = self.state.page_index;
        &mut self.pages[index]
    }
}
