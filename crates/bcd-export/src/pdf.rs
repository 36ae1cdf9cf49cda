//! Screening report PDF.
//!
//! Fixed single-flow layout on A4 portrait:
//! letterhead, patient profile table, findings table, optional imaging block,
//! signature and confidentiality notice. Content flows onto new pages when it
//! runs into the bottom margin.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon,
};
use tracing::{info, warn};

use bcd_core::summary::{Field, SummaryView};

use crate::error::ExportError;
use crate::styles::{DocumentStyles, Letterhead, Rgb8, pt_to_mm};

const MM_PER_INCH: f32 = 25.4;

/// Rough Helvetica advance width as a fraction of the font size. Builtin
/// fonts carry no metrics, so wrapping and right alignment use this.
const REGULAR_CHAR_EM: f32 = 0.5;
const BOLD_CHAR_EM: f32 = 0.55;

const REPORT_TITLE: &str = "MEDICAL SCREENING REPORT";
const SIGNATURE_RULE: &str = "__________________________";
const SIGNATURE_CAPTION: &str = "Authorized Physician Signature";
const DEFAULT_IMAGE_SOURCE: &str = "Radiology Scan";

/// Largest box the image is fitted into, in inches.
const IMAGE_MAX_WIDTH_IN: f32 = 4.0;
const IMAGE_MAX_HEIGHT_IN: f32 = 2.8;

/// Default file name offered for a report.
pub fn report_file_name(summary: &SummaryView) -> String {
    format!("Report_{}.pdf", summary.patient_id().unwrap_or("Unknown"))
}

/// Renders a [`SummaryView`] into the screening report layout.
#[derive(Debug, Clone, Default)]
pub struct ReportWriter {
    styles: DocumentStyles,
    letterhead: Letterhead,
}

impl ReportWriter {
    pub fn new(styles: DocumentStyles, letterhead: Letterhead) -> Self {
        Self { styles, letterhead }
    }

    pub fn letterhead(&self) -> &Letterhead {
        &self.letterhead
    }

    /// Build the PDF in memory.
    pub fn render(&self, summary: &SummaryView) -> Result<Vec<u8>, ExportError> {
        let title = format!(
            "Screening Report {}",
            summary.patient_id().unwrap_or("Unknown")
        );
        let mut canvas = Canvas::new(&title, &self.styles)?;

        self.letterhead_block(&mut canvas);

        canvas.section_header("Patient Profile");
        self.patient_profile(&mut canvas, &summary.patient_info);

        canvas.section_header("Examination Findings");
        self.findings_table(&mut canvas, &summary.findings);

        if let Some(path) = summary.imaging.path.as_deref() {
            if path.is_file() {
                self.imaging_block(&mut canvas, path, summary.image_type())?;
            } else {
                warn!(path = %path.display(), "image no longer exists, omitting imaging section");
            }
        }

        self.closing_block(&mut canvas);

        let pages = canvas.pages;
        let bytes = canvas.finish()?;
        info!(pages, bytes = bytes.len(), "report rendered");
        Ok(bytes)
    }

    /// Render and write to `destination`.
    ///
    /// The bytes go to a temporary file next to the destination which is then
    /// renamed over it, so a failure never leaves a half-written report behind.
    pub fn write(&self, summary: &SummaryView, destination: &Path) -> Result<(), ExportError> {
        let bytes = self.render(summary)?;

        let write_err = |source: std::io::Error| ExportError::Write {
            path: destination.to_path_buf(),
            source,
        };

        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(destination).map_err(|e| write_err(e.error))?;

        info!(path = %destination.display(), bytes = bytes.len(), "report written");
        Ok(())
    }

    fn letterhead_block(&self, canvas: &mut Canvas<'_>) {
        let styles = &self.styles;
        let palette = styles.palette;
        let small_line = line_height(styles.small_size);
        let block = [
            (self.letterhead.institution.as_str(), true),
            (self.letterhead.address.as_str(), false),
            (self.letterhead.phone.as_str(), false),
        ];

        let row_height = line_height(styles.title_size).max(small_line * block.len() as f32);
        canvas.ensure(row_height);
        let bottom = canvas.y - row_height;
        let descent = pt_to_mm(styles.small_size * 0.25);

        canvas.text(
            REPORT_TITLE,
            styles.title_size,
            canvas.left(),
            bottom + pt_to_mm(styles.title_size * 0.25),
            Face::Bold,
            palette.primary,
        );

        // Bottom-aligned with the title, last line on the baseline row.
        for (i, (text, bold)) in block.iter().rev().enumerate() {
            let face = if *bold { Face::Bold } else { Face::Regular };
            canvas.text_right(
                text,
                styles.small_size,
                canvas.right(),
                bottom + descent + small_line * i as f32,
                face,
                palette.muted,
            );
        }

        canvas.y = bottom - pt_to_mm(5.0);
        canvas.hline(canvas.left(), canvas.right(), canvas.y, palette.primary, 1.0);
        canvas.y -= pt_to_mm(20.0);
    }

    fn patient_profile(&self, canvas: &mut Canvas<'_>, fields: &[Field]) {
        let palette = self.styles.palette;
        let spec = TableSpec {
            col_widths: [3.0 * MM_PER_INCH, 3.0 * MM_PER_INCH],
            padding: pt_to_mm(10.0),
            background: Some(palette.panel),
            outer_border: Some((palette.border, 0.5)),
            inner_grid: None,
        };

        // Consecutive fields share a row; an odd count leaves the last cell blank.
        let rows: Vec<[Cell; 2]> = fields
            .chunks(2)
            .map(|pair| {
                let cell = |f: &Field| Cell::labelled(&f.label, &f.value);
                [
                    cell(&pair[0]),
                    pair.get(1).map(cell).unwrap_or_default(),
                ]
            })
            .collect();

        canvas.table(&spec, &rows);
    }

    fn findings_table(&self, canvas: &mut Canvas<'_>, fields: &[Field]) {
        let spec = TableSpec {
            col_widths: [2.0 * MM_PER_INCH, 4.0 * MM_PER_INCH],
            padding: pt_to_mm(8.0),
            background: None,
            outer_border: None,
            inner_grid: Some((self.styles.palette.border, 0.25)),
        };

        let rows: Vec<[Cell; 2]> = fields
            .iter()
            .map(|f| [Cell::bold(&f.label), Cell::plain(&f.value)])
            .collect();

        canvas.table(&spec, &rows);
    }

    fn imaging_block(
        &self,
        canvas: &mut Canvas<'_>,
        path: &Path,
        image_type: Option<&str>,
    ) -> Result<(), ExportError> {
        let image = image_crate::open(path).map_err(|e| ExportError::Image {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let (px_w, px_h) = image.dimensions();
        if px_w == 0 || px_h == 0 {
            return Err(ExportError::Image {
                path: path.to_path_buf(),
                message: "image has no pixels".to_string(),
            });
        }

        let (width, height) = fit_within(
            px_w as f32,
            px_h as f32,
            IMAGE_MAX_WIDTH_IN * MM_PER_INCH,
            IMAGE_MAX_HEIGHT_IN * MM_PER_INCH,
        );

        let palette = self.styles.palette;
        let padding = pt_to_mm(6.0);
        let frame_width = 6.0 * MM_PER_INCH;
        let frame_height = height + 2.0 * padding;
        let caption_height = pt_to_mm(10.0) + line_height(self.styles.small_size);

        canvas.section_header_with_room("Imaging Analysis", frame_height + caption_height);

        let frame_bottom = canvas.y - frame_height;
        let left = canvas.left();
        canvas.frame(left, frame_bottom, frame_width, frame_height, palette.primary, 1.0);

        // Alpha channels are flattened; the report is printed on white anyway.
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        Image::from_dynamic_image(&rgb).add_to_layer(
            canvas.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(left + (frame_width - width) / 2.0)),
                translate_y: Some(Mm(frame_bottom + padding)),
                dpi: Some(px_w as f32 * MM_PER_INCH / width),
                ..Default::default()
            },
        );

        canvas.y = frame_bottom - pt_to_mm(10.0);
        let caption = format!("Source: {}", image_type.unwrap_or(DEFAULT_IMAGE_SOURCE));
        canvas.right_aligned_line(&caption, self.styles.small_size, Face::Oblique, palette.muted);

        info!(path = %path.display(), px_w, px_h, "image embedded in report");
        Ok(())
    }

    fn closing_block(&self, canvas: &mut Canvas<'_>) {
        let styles = &self.styles;
        let palette = styles.palette;
        let body_line = line_height(styles.body_size);
        let padding = pt_to_mm(3.0);
        let block_height = pt_to_mm(40.0)
            + 2.0 * (body_line + 2.0 * padding)
            + pt_to_mm(30.0)
            + line_height(styles.small_size);
        canvas.ensure(block_height);

        canvas.y -= pt_to_mm(40.0);

        // Signature sits in the right-hand column of a 3.5in + 2.5in grid.
        let column_left = canvas.left() + 3.5 * MM_PER_INCH;
        let column_width = 2.5 * MM_PER_INCH;
        let descent = pt_to_mm(styles.body_size * 0.25);

        canvas.y -= body_line + padding;
        canvas.text(
            SIGNATURE_RULE,
            styles.body_size,
            column_left + padding,
            canvas.y + descent,
            Face::Regular,
            palette.text,
        );
        canvas.y -= padding;

        canvas.y -= body_line + padding;
        let caption_width = text_width(SIGNATURE_CAPTION, styles.body_size, Face::Regular);
        canvas.text(
            SIGNATURE_CAPTION,
            styles.body_size,
            column_left + (column_width - caption_width).max(0.0) / 2.0,
            canvas.y + descent,
            Face::Regular,
            palette.text,
        );
        canvas.y -= padding;

        canvas.y -= pt_to_mm(30.0);
        canvas.right_aligned_line(&self.letterhead.notice, styles.small_size, Face::Regular, palette.muted);
    }
}

/// Largest `(width, height)` with the source aspect ratio that fits the box.
fn fit_within(src_w: f32, src_h: f32, max_w: f32, max_h: f32) -> (f32, f32) {
    let scale = (max_w / src_w).min(max_h / src_h);
    (src_w * scale, src_h * scale)
}

fn line_height(size_pt: f32) -> f32 {
    pt_to_mm(size_pt * 1.2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Oblique,
}

fn char_width(size_pt: f32, face: Face) -> f32 {
    let em = match face {
        Face::Bold => BOLD_CHAR_EM,
        Face::Regular | Face::Oblique => REGULAR_CHAR_EM,
    };
    pt_to_mm(size_pt * em)
}

fn text_width(text: &str, size_pt: f32, face: Face) -> f32 {
    text.chars().count() as f32 * char_width(size_pt, face)
}

/// A table cell: an optional bold lead-in followed by regular text.
#[derive(Debug, Clone, Default)]
struct Cell {
    bold: String,
    regular: String,
}

impl Cell {
    fn labelled(label: &str, value: &str) -> Self {
        Self {
            bold: format!("{label}:"),
            regular: value.to_string(),
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            bold: text.to_string(),
            regular: String::new(),
        }
    }

    fn plain(text: &str) -> Self {
        Self {
            bold: String::new(),
            regular: text.to_string(),
        }
    }

    /// Greedy word wrap into lines of styled runs.
    fn layout(&self, width_mm: f32, size_pt: f32) -> Vec<Vec<(String, Face)>> {
        let words = self
            .bold
            .split_whitespace()
            .map(|w| (w, Face::Bold))
            .chain(self.regular.split_whitespace().map(|w| (w, Face::Regular)));

        let space = char_width(size_pt, Face::Regular);
        let mut lines: Vec<Vec<(String, Face)>> = Vec::new();
        let mut current: Vec<(String, Face)> = Vec::new();
        let mut used = 0.0_f32;

        for (word, face) in words {
            for piece in split_long_word(word, width_mm, char_width(size_pt, face)) {
                let piece_width = text_width(&piece, size_pt, face);
                let needed = if current.is_empty() { piece_width } else { space + piece_width };
                if !current.is_empty() && used + needed > width_mm {
                    lines.push(std::mem::take(&mut current));
                    used = 0.0;
                }
                used += if current.is_empty() { piece_width } else { space + piece_width };
                match current.last_mut() {
                    Some((text, last_face)) if *last_face == face => {
                        text.push(' ');
                        text.push_str(&piece);
                    }
                    _ => current.push((piece, face)),
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

fn split_long_word(word: &str, width_mm: f32, char_mm: f32) -> Vec<String> {
    let max_chars = ((width_mm / char_mm).floor() as usize).max(1);
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= max_chars {
        return vec![word.to_string()];
    }
    chars.chunks(max_chars).map(|c| c.iter().collect()).collect()
}

struct TableSpec {
    col_widths: [f32; 2],
    padding: f32,
    background: Option<Rgb8>,
    /// Colour and thickness in points.
    outer_border: Option<(Rgb8, f32)>,
    inner_grid: Option<(Rgb8, f32)>,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

/// Drawing cursor over the document. `y` is the top of the remaining free
/// space on the current page, in millimetres from the bottom edge.
struct Canvas<'a> {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    styles: &'a DocumentStyles,
    y: f32,
    pages: usize,
}

impl<'a> Canvas<'a> {
    fn new(title: &str, styles: &'a DocumentStyles) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(styles.page_width_mm),
            Mm(styles.page_height_mm),
            "Page 1",
        );
        let layer = doc.get_page(page).get_layer(layer);

        let font = |f: BuiltinFont| {
            doc.add_builtin_font(f)
                .map_err(|e| ExportError::Pdf(format!("font error: {e}")))
        };
        let fonts = Fonts {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            oblique: font(BuiltinFont::HelveticaOblique)?,
        };

        Ok(Self {
            doc,
            layer,
            fonts,
            styles,
            y: styles.page_height_mm - styles.margin_mm(),
            pages: 1,
        })
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
    }

    fn left(&self) -> f32 {
        self.styles.margin_mm()
    }

    fn right(&self) -> f32 {
        self.styles.page_width_mm - self.styles.margin_mm()
    }

    fn bottom(&self) -> f32 {
        self.styles.margin_mm()
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(self.styles.page_width_mm),
            Mm(self.styles.page_height_mm),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.styles.page_height_mm - self.styles.margin_mm();
    }

    /// Start a new page unless `height` millimetres still fit on this one.
    /// Returns whether a page break happened.
    fn ensure(&mut self, height: f32) -> bool {
        let at_top = self.y >= self.styles.page_height_mm - self.styles.margin_mm();
        if self.y - height < self.bottom() && !at_top {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.fonts.regular,
            Face::Bold => &self.fonts.bold,
            Face::Oblique => &self.fonts.oblique,
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, baseline: f32, face: Face, color: Rgb8) {
        self.layer.set_fill_color(color.to_pdf());
        self.layer.use_text(text, size, Mm(x), Mm(baseline), self.font(face));
    }

    fn text_right(&self, text: &str, size: f32, right: f32, baseline: f32, face: Face, color: Rgb8) {
        let x = (right - text_width(text, size, face)).max(self.left());
        self.text(text, size, x, baseline, face, color);
    }

    /// One right-aligned line of text at the cursor.
    fn right_aligned_line(&mut self, text: &str, size: f32, face: Face, color: Rgb8) {
        let height = line_height(size);
        self.ensure(height);
        self.y -= height;
        self.text_right(text, size, self.right(), self.y + pt_to_mm(size * 0.25), face, color);
    }

    fn hline(&self, x1: f32, x2: f32, y: f32, color: Rgb8, thickness_pt: f32) {
        self.polyline(&[(x1, y), (x2, y)], false, color, thickness_pt);
    }

    fn vline(&self, x: f32, y1: f32, y2: f32, color: Rgb8, thickness_pt: f32) {
        self.polyline(&[(x, y1), (x, y2)], false, color, thickness_pt);
    }

    fn frame(&self, x: f32, y: f32, w: f32, h: f32, color: Rgb8, thickness_pt: f32) {
        self.polyline(
            &[(x, y), (x + w, y), (x + w, y + h), (x, y + h)],
            true,
            color,
            thickness_pt,
        );
    }

    fn polyline(&self, points: &[(f32, f32)], closed: bool, color: Rgb8, thickness_pt: f32) {
        self.layer.set_outline_color(color.to_pdf());
        self.layer.set_outline_thickness(thickness_pt);
        self.layer.add_line(Line {
            points: points
                .iter()
                .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
                .collect(),
            is_closed: closed,
        });
    }

    fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32, color: Rgb8) {
        self.layer.set_fill_color(color.to_pdf());
        self.layer.add_polygon(Polygon {
            rings: vec![
                [(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
                    .iter()
                    .map(|&(px, py)| (Point::new(Mm(px), Mm(py)), false))
                    .collect(),
            ],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn section_header(&mut self, title: &str) {
        self.section_header_with_room(title, line_height(self.styles.body_size) * 3.0);
    }

    /// Section header that moves to a new page together with at least
    /// `room` millimetres of the content following it.
    fn section_header_with_room(&mut self, title: &str, room: f32) {
        let size = self.styles.section_size;
        let before = pt_to_mm(20.0);
        let after = pt_to_mm(10.0);
        let height = line_height(size);

        if !self.ensure(before + height + after + room) {
            self.y -= before;
        }
        self.y -= height;
        self.text(
            &title.to_uppercase(),
            size,
            self.left(),
            self.y + pt_to_mm(size * 0.25),
            Face::Bold,
            self.styles.palette.accent,
        );
        self.y -= after;
    }

    fn table(&mut self, spec: &TableSpec, rows: &[[Cell; 2]]) {
        let size = self.styles.body_size;
        let line = line_height(size);

        let mut first_on_page = true;
        for (i, row) in rows.iter().enumerate() {
            let laid_out: Vec<_> = row
                .iter()
                .zip(spec.col_widths)
                .map(|(cell, width)| cell.layout(width - 2.0 * spec.padding, size))
                .collect();
            let lines = laid_out.iter().map(Vec::len).max().unwrap_or(0).max(1);

            if self.ensure(lines as f32 * line + 2.0 * spec.padding) {
                first_on_page = true;
            }

            // Rows taller than the space left are split across pages.
            let mut from = 0;
            while from < lines {
                let capacity = ((self.y - self.bottom() - 2.0 * spec.padding) / line).floor();
                let capacity = if capacity >= 1.0 { capacity as usize } else { 1 };
                let take = (lines - from).min(capacity);
                let last_row = i + 1 == rows.len() && from + take == lines;
                let continues = from + take < lines;

                self.row_segment(spec, &laid_out, from..from + take, first_on_page, last_row || continues);
                first_on_page = false;
                from += take;

                if continues {
                    self.new_page();
                    first_on_page = true;
                }
            }
        }
    }

    /// Draw lines `range` of a laid-out row at the cursor and move below it.
    fn row_segment(
        &mut self,
        spec: &TableSpec,
        cells: &[Vec<Vec<(String, Face)>>],
        range: std::ops::Range<usize>,
        first_on_page: bool,
        close_bottom: bool,
    ) {
        let size = self.styles.body_size;
        let line = line_height(size);
        let descent = pt_to_mm(size * 0.25);
        let table_width: f32 = spec.col_widths.iter().sum();
        let left = self.left();

        let height = range.len() as f32 * line + 2.0 * spec.padding;
        let top = self.y;
        let bottom = top - height;
        // A page break below this segment also closes the box.
        let close_bottom = close_bottom || bottom - line - 2.0 * spec.padding < self.bottom();

        if let Some(color) = spec.background {
            self.fill_rect(left, bottom, table_width, height, color);
        }

        let mut cell_left = left + spec.padding;
        for (cell, width) in cells.iter().zip(spec.col_widths) {
            for (n, runs) in cell.iter().skip(range.start).take(range.len()).enumerate() {
                let baseline = top - spec.padding - line * (n + 1) as f32 + descent;
                let mut x = cell_left;
                for (text, face) in runs {
                    self.text(text, size, x, baseline, *face, self.styles.palette.text);
                    x += text_width(text, size, *face) + char_width(size, Face::Regular);
                }
            }
            cell_left += width;
        }

        if let Some((color, thickness)) = spec.outer_border {
            self.vline(left, bottom, top, color, thickness);
            self.vline(left + table_width, bottom, top, color, thickness);
            if first_on_page {
                self.hline(left, left + table_width, top, color, thickness);
            }
            if close_bottom {
                self.hline(left, left + table_width, bottom, color, thickness);
            }
        }
        if let Some((color, thickness)) = spec.inner_grid {
            self.vline(left + spec.col_widths[0], bottom, top, color, thickness);
            if !first_on_page {
                self.hline(left, left + table_width, top, color, thickness);
            }
        }

        self.y = bottom;
    }
}

/// Where a report for `summary` would be written inside `dir`.
pub fn default_destination(dir: &Path, summary: &SummaryView) -> PathBuf {
    dir.join(report_file_name(summary))
}
