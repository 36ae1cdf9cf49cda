use serde::{Deserialize, Serialize};

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub(crate) fn to_pdf(self) -> printpdf::Color {
        printpdf::Color::Rgb(printpdf::Rgb::new(
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
            None,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Title, rules and the image frame. Dark navy.
    pub primary: Rgb8,
    /// Section headers.
    pub accent: Rgb8,
    /// Body text.
    pub text: Rgb8,
    /// Table borders and grid lines.
    pub border: Rgb8,
    /// Patient profile background.
    pub panel: Rgb8,
    /// Letterhead block, captions and the closing notice.
    pub muted: Rgb8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Rgb8(0x2c, 0x3e, 0x50),
            accent: Rgb8(0xe0, 0x27, 0x93),
            text: Rgb8(0x2d, 0x34, 0x36),
            border: Rgb8(0xdf, 0xe6, 0xe9),
            panel: Rgb8(0xf8, 0xf9, 0xfa),
            muted: Rgb8(0x80, 0x80, 0x80),
        }
    }
}

/// Page geometry and type sizes for the screening report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Page width in millimetres (A4 portrait).
    pub page_width_mm: f32,

    /// Page height in millimetres.
    pub page_height_mm: f32,

    /// Margin on every side, in points.
    pub margin_pt: f32,

    /// Report title size in points.
    pub title_size: f32,

    /// Section header size in points.
    pub section_size: f32,

    /// Body and table text size in points.
    pub body_size: f32,

    /// Letterhead block, caption and notice size in points.
    pub small_size: f32,

    pub palette: Palette,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_pt: 50.0,
            title_size: 22.0,
            section_size: 12.0,
            body_size: 10.0,
            small_size: 10.0,
            palette: Palette::default(),
        }
    }
}

impl DocumentStyles {
    pub fn margin_mm(&self) -> f32 {
        self.margin_pt / POINTS_PER_MM
    }

    /// Usable width between the left and right margins.
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm()
    }
}

/// Institution block printed at the top of every report, plus the closing
/// confidentiality line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letterhead {
    pub institution: String,
    pub address: String,
    pub phone: String,
    pub notice: String,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            institution: "Jimma Medical Center".to_string(),
            address: "123 Health , NY".to_string(),
            phone: "Phone: +251965492118".to_string(),
            notice: "This is a confidential medical record. Generated by BCD Systems 2025."
                .to_string(),
        }
    }
}

pub(crate) fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}
