//! PDF rendering: one document per generated text, title plus flowing body.
//!
//! Built on printpdf with the Helvetica builtin fonts, so no font files ship
//! with the binary. printpdf places text at explicit coordinates, so line
//! wrapping and pagination happen here with a conservative average-width
//! estimate per character — good enough for plain paragraph text.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::errors::GenerateError;

const PAGE_WIDTH_MM: f32 = 215.9; // US letter
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;

const TITLE_SIZE_PT: f32 = 18.0;
const BODY_SIZE_PT: f32 = 11.0;
const PT_TO_MM: f32 = 0.352_778;

// Body line height 11pt + 4pt gap; title slightly looser.
const BODY_LINE_HEIGHT_MM: f32 = 15.0 * PT_TO_MM;
const TITLE_LINE_HEIGHT_MM: f32 = 22.0 * PT_TO_MM;
const TITLE_BODY_GAP_MM: f32 = 2.0 * BODY_LINE_HEIGHT_MM;

// Average glyph advance as a fraction of the font size, tuned for Helvetica.
const BODY_CHAR_WIDTH_EM: f32 = 0.5;
const TITLE_CHAR_WIDTH_EM: f32 = 0.55;

/// Renders a single-column PDF: bold centered title, blank gap, left-aligned
/// body flowing onto additional pages as needed. Returns the complete
/// document bytes or a `Render` error; never a truncated document.
pub fn render_pdf(title: &str, body: &str) -> Result<Vec<u8>, GenerateError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_err)?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_err)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    let usable_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let title_char_width = TITLE_SIZE_PT * TITLE_CHAR_WIDTH_EM * PT_TO_MM;
    let body_char_width = BODY_SIZE_PT * BODY_CHAR_WIDTH_EM * PT_TO_MM;
    let title_cols = (usable_width / title_char_width) as usize;
    let body_cols = (usable_width / body_char_width) as usize;

    for line in wrap_text(title, title_cols) {
        let line_width = line.chars().count() as f32 * title_char_width;
        let x = (MARGIN_MM + (usable_width - line_width) / 2.0).max(MARGIN_MM);
        layer.use_text(line, TITLE_SIZE_PT, Mm(x), Mm(y), &bold);
        y -= TITLE_LINE_HEIGHT_MM;
    }
    y -= TITLE_BODY_GAP_MM;

    for line in wrap_text(body, body_cols) {
        if y < MARGIN_MM {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        if !line.is_empty() {
            layer.use_text(line, BODY_SIZE_PT, Mm(MARGIN_MM), Mm(y), &regular);
        }
        y -= BODY_LINE_HEIGHT_MM;
    }

    doc.save_to_bytes().map_err(render_err)
}

fn render_err(err: impl std::fmt::Display) -> GenerateError {
    GenerateError::Render(err.to_string())
}

/// Word-wraps text to `max_cols` characters per line, preserving explicit
/// newlines (blank lines stay blank). Words longer than a line are split.
fn wrap_text(text: &str, max_cols: usize) -> Vec<String> {
    let max_cols = max_cols.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_cols = 0usize;
        for word in paragraph.split_whitespace() {
            let word_cols = word.chars().count();

            if word_cols > max_cols {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_cols = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(max_cols) {
                    lines.push(chunk.iter().collect());
                }
                continue;
            }

            let needed = if current.is_empty() {
                word_cols
            } else {
                current_cols + 1 + word_cols
            };
            if needed > max_cols {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_cols = word_cols;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                    current_cols += 1;
                }
                current.push_str(word);
                current_cols += word_cols;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
