use std::path::Path;

use tessera_math::Rect;
use tracing::debug;

use crate::{
    Color, Font, Image, Sprite, TesseraError, TesseraResult, Texture, Tileset,
};

/// Creates sprites from images, colours, text and a shared tileset.
pub struct SpriteFactory {
    tileset: Option<Tileset>,
    font: Option<Font>,
    text_color: Color,
}

impl Default for SpriteFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteFactory {
    pub fn new() -> Self {
        Self {
            tileset: None,
            font: None,
            text_color: Color::WHITE,
        }
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = Some(font);
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// Default colour for [`from_text`](Self::from_text).
    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn from_image(&self, path: impl AsRef<Path>) -> TesseraResult<Sprite> {
        let path = path.as_ref();
        let image = Image::open(path)?;
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "loaded image"
        );

        Ok(self.from_image_data(image))
    }

    /// Decodes an encoded image held in memory.
    pub fn from_bytes(&self, data: &[u8]) -> TesseraResult<Sprite> {
        Ok(self.from_image_data(Image::from_bytes(data)?))
    }

    pub fn from_image_data(&self, image: Image) -> Sprite {
        Sprite::new(Texture::new(image))
    }

    /// A solid sprite covering `rect`, positioned at its top-left.
    pub fn from_color(&self, color: Color, rect: Rect) -> Sprite {
        let image = Image::filled(rect.w() as u32, rect.h() as u32, color);
        let mut sprite = self.from_image_data(image);
        sprite.set_position(rect.topleft());
        sprite
    }

    /// A transparent sprite.
    pub fn create_sprite(&self, width: u32, height: u32) -> Sprite {
        self.from_image_data(Image::filled(width, height, Color::TRANSPARENT))
    }

    pub fn from_text(&self, text: &str, color: Option<Color>) -> TesseraResult<Sprite> {
        let font = self.font.as_ref().ok_or(TesseraError::MissingResource("font"))?;
        let image = font.render_text(text, color.unwrap_or(self.text_color));

        Ok(self.from_image_data(image))
    }

    /// Makes `texture` the tileset that character and tile sprites come from.
    pub fn load_tileset(&mut self, texture: Texture, tile_size: u32) -> TesseraResult<&Tileset> {
        let tileset = Tileset::new(texture, tile_size)?;
        Ok(self.tileset.insert(tileset))
    }

    pub fn set_tileset(&mut self, tileset: Tileset) {
        self.tileset = Some(tileset);
    }

    pub fn tileset(&self) -> Option<&Tileset> {
        self.tileset.as_ref()
    }

    pub fn get_tile_sprite(&self, index: u32) -> TesseraResult<Sprite> {
        self.require_tileset()?.tile_sprite(index)
    }

    /// A guest sprite for `c`, whose tile index is its codepoint.
    pub fn get_char_sprite(&self, c: char) -> TesseraResult<Sprite> {
        self.require_tileset()?.char_sprite(c)
    }

    fn require_tileset(&self) -> TesseraResult<&Tileset> {
        self.tileset
            .as_ref()
            .ok_or(TesseraError::MissingResource("tileset"))
    }
}
