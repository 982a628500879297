use std::{ops::Range, path::Path};

use fontdue::FontSettings;
use tracing::debug;

use crate::{Color, Image, TesseraError, TesseraResult};

/// A contiguous range of codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSet {
    pub from: u32,
    pub to: u32,
}

impl CharSet {
    pub const ASCII: Self = Self::new(0..128);

    pub const fn new(range: Range<u32>) -> Self {
        Self {
            from: range.start,
            to: range.end,
        }
    }

    pub fn chars(&self) -> impl Iterator<Item = char> {
        (self.from..self.to).filter_map(char::from_u32)
    }
}

/// A TrueType or OpenType font rasterised at a fixed pixel size.
pub struct Font {
    font: fontdue::Font,
    size: f32,
}

impl Font {
    pub fn from_bytes(data: &[u8], size: f32) -> TesseraResult<Self> {
        let font = fontdue::Font::from_bytes(data, FontSettings::default())
            .map_err(TesseraError::Font)?;

        Ok(Self { font, size })
    }

    pub fn open(path: impl AsRef<Path>, size: f32) -> TesseraResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), size, "loading font");

        Self::from_bytes(&data, size)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.font.has_glyph(c)
    }

    fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map_or(self.size, |m| m.ascent.ceil())
    }

    pub fn line_height(&self) -> u32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map_or(self.size, |m| m.new_line_size)
            .ceil() as u32
    }

    /// Rasterises a single line of text onto a transparent image that is
    /// exactly as wide as the text advance.
    pub fn render_text(&self, text: &str, color: Color) -> Image {
        let mut advance = 0.0;
        let mut prev = None;
        let mut pens = Vec::with_capacity(text.len());

        for c in text.chars() {
            if let Some(kern) = prev.and_then(|p| self.font.horizontal_kern(p, c, self.size)) {
                advance += kern;
            }
            pens.push((c, advance));
            advance += self.font.metrics(c, self.size).advance_width;
            prev = Some(c);
        }

        let width = (advance.ceil() as u32).max(1);
        let height = self.line_height().max(1);
        let baseline = self.ascent() as i32;

        let mut image = Image::filled(width, height, Color::TRANSPARENT);
        for (c, pen) in pens {
            let (metrics, coverage) = self.font.rasterize(c, self.size);
            let x = pen.round() as i32 + metrics.xmin;
            let y = baseline - metrics.height as i32 - metrics.ymin;
            blit_coverage(&mut image, &coverage, metrics.width, x, y, color);
        }

        image
    }

    /// Draws `c` centred in the `tile x tile` cell at `(x, y)`.
    pub(crate) fn draw_glyph_centered(
        &self,
        image: &mut Image,
        c: char,
        x: u32,
        y: u32,
        tile: u32,
        color: Color,
    ) {
        let (metrics, coverage) = self.font.rasterize(c, self.size);
        let gx = x as i32 + (tile as i32 - metrics.width as i32) / 2;
        let gy = y as i32 + (tile as i32 - metrics.height as i32) / 2;

        blit_coverage(image, &coverage, metrics.width, gx, gy, color);
    }
}

/// Writes an 8-bit coverage bitmap as `color` scaled by coverage.
fn blit_coverage(image: &mut Image, coverage: &[u8], width: usize, x: i32, y: i32, color: Color) {
    if width == 0 {
        return;
    }

    for (row, line) in coverage.chunks_exact(width).enumerate() {
        for (col, &alpha) in line.iter().enumerate() {
            let (px, py) = (x + col as i32, y + row as i32);
            if alpha == 0 || px < 0 || py < 0 {
                continue;
            }

            let (px, py) = (px as u32, py as u32);
            let a = (color.a as u32 * alpha as u32 / 255) as u8;
            let existing = image.get_pixel(px, py).map_or(0, |p| p.a);
            if a > existing {
                image.put_pixel(px, py, Color { a, ..color });
            }
        }
    }
}
