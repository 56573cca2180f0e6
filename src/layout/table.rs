//! Page-aware table layout.
//!
//! Rows are never split across pages. When a row does not fit below the
//! cursor the table continues on a new page and the header row is drawn
//! again above it.

use super::canvas::Canvas;
use super::style::{Rgb, Styles};
use super::text::{self, centered_baseline, line_height};
use super::{Align, BlockKind, LayoutError, PageGeometry, RectOp, TextOp, Weight, EPSILON};

/// One table column.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    /// Width in millimetres, scaled down when the table is too wide.
    pub preferred_width: Option<f32>,
    pub align: Align,
}

impl Column {
    pub fn new(header: impl Into<String>, preferred_width: f32, align: Align) -> Self {
        Self {
            header: header.into(),
            preferred_width: Some(preferred_width),
            align,
        }
    }
}

/// Column widths for `total_width`.
///
/// Preferred widths are used as-is when they fit and scaled proportionally
/// when they do not. Without a full set of preferences the width is split
/// evenly.
pub fn column_widths(total_width: f32, count: usize, preferred: Option<&[f32]>) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }

    if let Some(preferred) = preferred.filter(|p| p.len() == count) {
        let total_preferred: f32 = preferred.iter().sum();
        if total_preferred > 0.0 {
            if total_preferred <= total_width {
                return preferred.to_vec();
            }
            let scale = total_width / total_preferred;
            return preferred.iter().map(|w| w * scale).collect();
        }
    }

    vec![total_width / count as f32; count]
}

/// Where a row lands, relative to the page the table starts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    pub page_offset: usize,
    pub top: f32,
    /// A header row was drawn directly above this row on a fresh page.
    pub header_repeated: bool,
}

/// Pagination plan for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    /// Page offset and top of the first header row.
    pub first_header: (usize, f32),
    pub rows: Vec<RowPlacement>,
    /// Page offset and cursor after the last row.
    pub end: (usize, f32),
}

/// Plan row positions for a table whose header starts at `start_y`.
///
/// Before each row the plan checks `y + h <= content_bottom`; on failure the
/// row moves to the next page below a repeated header. The header and the
/// first row are kept together.
pub fn paginate_rows(
    row_heights: &[f32],
    header_height: f32,
    start_y: f32,
    geometry: &PageGeometry,
) -> Result<TablePlan, LayoutError> {
    let fresh_page_y = geometry.margin_top + header_height;
    let available = geometry.content_bottom() - fresh_page_y;

    if let Some((row, &height)) = row_heights
        .iter()
        .enumerate()
        .find(|(_, h)| **h > available + EPSILON)
    {
        return Err(LayoutError::RowTooTall { row, height, available });
    }
    if available < -EPSILON {
        return Err(LayoutError::BlockTooTall {
            block: "table header",
            height: header_height,
            available: geometry.content_height(),
        });
    }

    let first_row = row_heights.first().copied().unwrap_or(0.0);
    let mut page_offset = 0;
    let mut header_top = start_y;
    if !geometry.fits(start_y, header_height + first_row) {
        page_offset = 1;
        header_top = geometry.margin_top;
    }
    let first_header = (page_offset, header_top);

    let mut y = header_top + header_height;
    let mut rows = Vec::with_capacity(row_heights.len());
    for &height in row_heights {
        let mut header_repeated = false;
        if !geometry.fits(y, height) {
            page_offset += 1;
            y = fresh_page_y;
            header_repeated = true;
        }
        rows.push(RowPlacement {
            page_offset,
            top: y,
            header_repeated,
        });
        y += height;
    }

    Ok(TablePlan {
        first_header,
        rows,
        end: (page_offset, y),
    })
}

/// Table contents plus the style it is drawn with.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    pub columns: &'a [Column],
    pub rows: &'a [Vec<String>],
    pub styles: &'a Styles,
}

struct LaidRow {
    height: f32,
    cells: Vec<Vec<String>>,
}

impl Table<'_> {
    fn widths(&self, total_width: f32) -> Vec<f32> {
        let preferred: Option<Vec<f32>> = self.columns.iter().map(|c| c.preferred_width).collect();
        column_widths(total_width, self.columns.len(), preferred.as_deref())
    }

    fn lay_row(&self, cells: &[String], widths: &[f32], size: f32, weight: Weight) -> LaidRow {
        let padding = self.styles.spacing.cell_padding;
        let cells: Vec<Vec<String>> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                text::wrap(cell, (width - 2.0 * padding).max(0.0), size, weight)
            })
            .collect();
        let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);

        LaidRow {
            height: max_lines as f32 * line_height(size) + 2.0 * padding,
            cells,
        }
    }

    /// Height of the header plus the first body row, for keep-together checks.
    pub fn lead_height(&self, total_width: f32) -> f32 {
        let widths = self.widths(total_width);
        let size = self.styles.fonts.body;
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let header = self.lay_row(&headers, &widths, size, Weight::Bold);
        let first = self
            .rows
            .first()
            .map(|row| self.lay_row(row, &widths, size, Weight::Normal).height)
            .unwrap_or(0.0);
        header.height + first
    }

    /// Lay the table out on `canvas` starting at its cursor.
    pub fn draw(&self, canvas: &mut Canvas) -> Result<(), LayoutError> {
        let geometry = *canvas.geometry();
        let widths = self.widths(geometry.content_width());
        let size = self.styles.fonts.body;

        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let header = self.lay_row(&headers, &widths, size, Weight::Bold);
        let body: Vec<LaidRow> = self
            .rows
            .iter()
            .map(|row| self.lay_row(row, &widths, size, Weight::Normal))
            .collect();
        let heights: Vec<f32> = body.iter().map(|r| r.height).collect();

        let plan = paginate_rows(&heights, header.height, canvas.state().y, &geometry)?;

        let start_page = canvas.state().page_index;
        let move_to = |canvas: &mut Canvas, page_offset: usize| {
            while canvas.state().page_index < start_page + page_offset {
                canvas.new_page();
            }
        };

        move_to(canvas, plan.first_header.0);
        self.draw_header(canvas, &header, &widths, plan.first_header.1);

        for (index, (row, placement)) in body.iter().zip(&plan.rows).enumerate() {
            if placement.header_repeated {
                move_to(canvas, placement.page_offset);
                self.draw_header(canvas, &header, &widths, geometry.margin_top);
            }
            let fill = (index % 2 == 1).then_some(self.styles.colors.light_gray);
            canvas.place_at(BlockKind::TableRow(index), placement.top, row.height);
            self.draw_cells(canvas, row, &widths, placement.top, fill, self.styles.colors.text, Weight::Normal);
        }

        move_to(canvas, plan.end.0);
        canvas.set_cursor(plan.end.1);
        Ok(())
    }

    fn draw_header(&self, canvas: &mut Canvas, header: &LaidRow, widths: &[f32], top: f32) {
        canvas.place_at(BlockKind::TableHeader, top, header.height);
        self.draw_cells(
            canvas,
            header,
            widths,
            top,
            Some(self.styles.colors.primary),
            Rgb::WHITE,
            Weight::Bold,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_cells(
        &self,
        canvas: &mut Canvas,
        row: &LaidRow,
        widths: &[f32],
        top: f32,
        fill: Option<Rgb>,
        color: Rgb,
        weight: Weight,
    ) {
        let geometry = *canvas.geometry();
        let size = self.styles.fonts.body;
        let padding = self.styles.spacing.cell_padding;
        let line = line_height(size);
        let is_header = weight == Weight::Bold;

        let mut x = geometry.margin_left;
        for (i, (width, lines)) in widths.iter().zip(&row.cells).enumerate() {
            canvas.rect(RectOp {
                x,
                y: top,
                width: *width,
                height: row.height,
                fill,
                stroke: Some(self.styles.colors.border),
                line_width: self.styles.spacing.border_width,
            });

            let align = if is_header { Align::Center } else { self.columns[i].align };
            let anchor = match align {
                Align::Left => x + padding,
                Align::Center => x + width / 2.0,
                Align::Right => x + width - padding,
            };
            for (n, text) in lines.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                canvas.text(TextOp {
                    text: text.clone(),
                    x: anchor,
                    y: centered_baseline(top + padding + n as f32 * line, line, size),
                    size,
                    weight,
                    color,
                    align,
                });
            }
            x += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_widths_scaled_to_fit() {
        let widths = column_widths(170.0, 6, Some(&[25.0, 50.0, 45.0, 25.0, 25.0, 20.0]));
        let total: f32 = widths.iter().sum();
        assert!((total - 170.0).abs() < 1e-3);
        assert!((widths[1] / widths[0] - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_preferred_widths_kept_when_they_fit() {
        let widths = column_widths(200.0, 2, Some(&[50.0, 70.0]));
        assert_eq!(widths, vec![50.0, 70.0]);
    }

    #[test]
    fn test_even_split_without_preferences() {
        assert_eq!(column_widths(120.0, 4, None), vec![30.0; 4]);
        // Wrong number of preferences falls back to an even split
        assert_eq!(column_widths(120.0, 3, Some(&[10.0])), vec![40.0; 3]);
        assert!(column_widths(120.0, 0, None).is_empty());
    }

    #[test]
    fn test_rows_never_cross_bottom_margin() {
        let geometry = PageGeometry::A4;
        let heights: Vec<f32> = (0..120).map(|i| 6.0 + (i % 7) as f32 * 3.5).collect();
        let header = 8.0;
        let plan = paginate_rows(&heights, header, 100.0, &geometry).unwrap();

        for (i, (row, h)) in plan.rows.iter().zip(&heights).enumerate() {
            assert!(
                row.top + h <= geometry.content_bottom() + EPSILON,
                "row {i} overflows"
            );
            if i > 0 {
                let prev = plan.rows[i - 1];
                if row.page_offset == prev.page_offset {
                    assert!((row.top - (prev.top + heights[i - 1])).abs() < EPSILON);
                    assert!(!row.header_repeated);
                } else {
                    // Break only when the row would really have overflowed
                    assert!(prev.top + heights[i - 1] + h > geometry.content_bottom());
                    assert!(row.header_repeated);
                    assert_eq!(row.top, geometry.margin_top + header);
                }
            }
        }
        assert!(plan.end.0 > 0);
    }

    #[test]
    fn test_break_inserted_before_first_overflowing_row() {
        let geometry = PageGeometry::A4;
        // Header at 20, rows of 50 from 30: 30, 80, 130, 180, then 230 + 50 > 272
        let plan = paginate_rows(&[50.0; 5], 10.0, 20.0, &geometry).unwrap();
        let offsets: Vec<usize> = plan.rows.iter().map(|r| r.page_offset).collect();
        assert_eq!(offsets, vec![0, 0, 0, 0, 1]);
        assert_eq!(plan.rows[4].top, 30.0);
        assert_eq!(plan.end, (1, 80.0));
    }

    #[test]
    fn test_header_kept_with_first_row() {
        let geometry = PageGeometry::A4;
        let plan = paginate_rows(&[20.0, 20.0], 10.0, 250.0, &geometry).unwrap();
        assert_eq!(plan.first_header, (1, 20.0));
        assert_eq!(plan.rows[0].page_offset, 1);
        assert!(!plan.rows[0].header_repeated);
    }

    #[test]
    fn test_row_taller_than_page_is_rejected() {
        let geometry = PageGeometry::A4;
        let err = paginate_rows(&[10.0, 260.0], 10.0, 20.0, &geometry).unwrap_err();
        assert!(matches!(err, LayoutError::RowTooTall { row: 1, .. }));
    }

    #[test]
    fn test_empty_table() {
        let plan = paginate_rows(&[], 10.0, 40.0, &PageGeometry::A4).unwrap();
        assert!(plan.rows.is_empty());
        assert_eq!(plan.end, (0, 50.0));
    }

    #[test]
    fn test_draw_repeats_header_on_continuation_pages() {
        let styles = Styles::default();
        let columns = [
            Column::new("Code", 30.0, Align::Center),
            Column::new("Name", 140.0, Align::Left),
        ];
        let rows: Vec<Vec<String>> = (0..80).map(|i| vec![format!("C{i:03}"), format!("Course {i}")]).collect();
        let table = Table {
            columns: &columns,
            rows: &rows,
            styles: &styles,
        };

        let mut canvas = Canvas::new(PageGeometry::A4).unwrap();
        table.draw(&mut canvas).unwrap();
        let pages = canvas.into_pages();

        assert!(pages.len() > 1);
        for page in &pages {
            assert_eq!(page.blocks[0].kind, BlockKind::TableHeader);
            assert_eq!(page.texts().next(), Some("Code"));
            for block in &page.blocks {
                assert!(block.bottom() <= PageGeometry::A4.content_bottom() + EPSILON);
            }
        }
        let placed_rows: usize = pages
            .iter()
            .flat_map(|p| &p.blocks)
            .filter(|b| matches!(b.kind, BlockKind::TableRow(_)))
            .count();
        assert_eq!(placed_rows, 80);
    }
}
