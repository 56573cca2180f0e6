//! PDF output for laid-out documents.

use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect};
use thiserror::Error;

use crate::layout::text::{PT_TO_MM, text_width};
use crate::layout::{Align, DrawOp, LaidOutDocument, PageGeometry, RectOp, Rgb, TextOp, Weight};

/// PDF backend errors.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("document has no pages")]
    Empty,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render every page of `doc` into a PDF file image.
pub fn render_pdf(doc: &LaidOutDocument, title: &str) -> Result<Vec<u8>, RenderError> {
    if doc.pages.is_empty() {
        return Err(RenderError::Empty);
    }

    let geometry = doc.geometry;
    let (pdf, first_page, first_layer) = PdfDocument::new(title, Mm(geometry.width), Mm(geometry.height), "Layer 1");
    let fonts = Fonts {
        regular: pdf.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: pdf.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in doc.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(Mm(geometry.width), Mm(geometry.height), "Layer 1")
        };
        let layer = pdf.get_page(page_index).get_layer(layer_index);

        for op in &page.ops {
            match op {
                DrawOp::Rect(rect) => draw_rect(&layer, &geometry, rect),
                DrawOp::Text(text) => draw_text(&layer, &geometry, &fonts, text),
            }
        }
    }

    Ok(pdf.save_to_bytes()?)
}

fn pdf_color(color: Rgb) -> Color {
    let Rgb(r, g, b) = color;
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

// PDF user space starts at the bottom-left corner.
fn flip(geometry: &PageGeometry, y: f32) -> Mm {
    Mm(geometry.height - y)
}

fn draw_rect(layer: &PdfLayerReference, geometry: &PageGeometry, rect: &RectOp) {
    let mode = match (rect.fill, rect.stroke) {
        (Some(_), Some(_)) => PaintMode::FillStroke,
        (Some(_), None) => PaintMode::Fill,
        (None, Some(_)) => PaintMode::Stroke,
        (None, None) => return,
    };
    if let Some(fill) = rect.fill {
        layer.set_fill_color(pdf_color(fill));
    }
    if let Some(stroke) = rect.stroke {
        layer.set_outline_color(pdf_color(stroke));
        layer.set_outline_thickness(rect.line_width / PT_TO_MM);
    }

    let shape = Rect::new(
        Mm(rect.x),
        flip(geometry, rect.y + rect.height),
        Mm(rect.x + rect.width),
        flip(geometry, rect.y),
    )
    .with_mode(mode);
    layer.add_rect(shape);
}

fn draw_text(layer: &PdfLayerReference, geometry: &PageGeometry, fonts: &Fonts, text: &TextOp) {
    let font = match text.weight {
        Weight::Normal => &fonts.regular,
        Weight::Bold => &fonts.bold,
    };
    let width = text_width(&text.text, text.size, text.weight);
    let x = match text.align {
        Align::Left => text.x,
        Align::Center => text.x - width / 2.0,
        Align::Right => text.x - width,
    };

    layer.set_fill_color(pdf_color(text.color));
    layer.use_text(text.text.clone(), text.size, Mm(x), flip(geometry, text.y), font);
}
