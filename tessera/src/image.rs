use std::{
    ops::{Index, IndexMut},
    path::Path,
};

use tessera_math::Rect;

use crate::{Color, TesseraResult};

/// CPU-side RGBA8 pixel buffer, row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Decodes any format the `image` crate understands.
    pub fn from_bytes(data: &[u8]) -> TesseraResult<Self> {
        let image = image::load_from_memory(data)?.into_rgba8();
        let (width, height) = image.dimensions();

        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> TesseraResult<Self> {
        let image = image::open(path)?.into_rgba8();
        let (width, height) = image.dimensions();

        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// Wraps raw RGBA8 data. Missing trailing pixels are transparent and
    /// excess data is dropped.
    pub fn from_pixels(width: u32, height: u32, pixels: &[u8]) -> Self {
        let len = (width * height * 4) as usize;
        let mut buf = pixels[..pixels.len().min(len)].to_vec();
        buf.resize(len, 0);

        Self {
            width,
            height,
            pixels: buf,
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let pixels = std::iter::repeat(color.to_array())
            .take((width * height) as usize)
            .flatten()
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32).unwrap_or_default()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.offset(x, y)?;
        Some(*bytemuck::from_bytes(&self.pixels[i..i + 4]))
    }

    /// Writes a pixel. Coordinates outside the image are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(bytemuck::bytes_of(&color));
        }
    }

    pub fn fill(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(bytemuck::bytes_of(&color));
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> TesseraResult {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(((y * self.width + x) * 4) as usize)
        } else {
            None
        }
    }
}

impl Index<usize> for Image {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.pixels[index]
    }
}

impl IndexMut<usize> for Image {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.pixels[index]
    }
}
