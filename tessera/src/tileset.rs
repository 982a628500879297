use tessera_math::Rect;
use tracing::debug;

use crate::{CharSet, Color, Font, GeometryError, Image, Sprite, TesseraResult, Texture};

/// Pixel rectangle of tile `index` in a tileset `width` pixels wide.
///
/// Tiles are numbered row-major. The tile size must be non-zero and must
/// divide the width exactly. The returned row is not range checked; use
/// [`Tileset::tile_rect`] for that. Tiles whose pixel edges do not fit in an
/// `i32` are rejected.
pub fn tile_rect(index: u32, width: u32, tile_size: u32) -> Result<Rect, GeometryError> {
    if tile_size == 0 {
        return Err(GeometryError::ZeroTileSize);
    }

    if width == 0 || width % tile_size != 0 {
        return Err(GeometryError::NonDividingTileSize {
            tile_size,
            extent: width,
            axis: "width",
        });
    }

    let cols = width / tile_size;
    let (row, col) = (index / cols, index % cols);

    // Far edge of the tile along one axis; the whole tile must be addressable.
    let edge = |cells: u32| {
        cells
            .checked_add(1)
            .and_then(|n| n.checked_mul(tile_size))
            .and_then(|px| i32::try_from(px).ok())
    };
    let (Some(right), Some(bottom)) = (edge(col), edge(row)) else {
        return Err(GeometryError::TileOffsetOverflow { index, tile_size });
    };
    let t = tile_size as i32;

    Ok(Rect::new(right - t, bottom - t, t, t)?)
}

/// A texture partitioned into a grid of square tiles.
#[derive(Debug, Clone)]
pub struct Tileset {
    texture: Texture,
    tile_size: u32,
    cols: u32,
    rows: u32,
}

impl Tileset {
    pub fn new(texture: Texture, tile_size: u32) -> Result<Self, GeometryError> {
        if tile_size == 0 {
            return Err(GeometryError::ZeroTileSize);
        }

        for (extent, axis) in [(texture.width(), "width"), (texture.height(), "height")] {
            if extent == 0 || extent % tile_size != 0 {
                return Err(GeometryError::NonDividingTileSize {
                    tile_size,
                    extent,
                    axis,
                });
            }
        }

        let cols = texture.width() / tile_size;
        let rows = texture.height() / tile_size;
        debug!(cols, rows, tile_size, "created tileset");

        Ok(Self {
            texture,
            tile_size,
            cols,
            rows,
        })
    }

    /// Renders a charset into a 16 column grid of `tile_size` cells. A
    /// character's tile index is its codepoint, so cells below the charset
    /// start and glyphs the font lacks stay transparent.
    pub fn from_font(
        font: &Font,
        charset: CharSet,
        tile_size: u32,
        color: Color,
    ) -> TesseraResult<Self> {
        const COLS: u32 = 16;

        let rows = charset.to.div_ceil(COLS).max(1);
        let mut image = Image::filled(COLS * tile_size, rows * tile_size, Color::TRANSPARENT);

        for c in charset.chars() {
            if c.is_control() || !font.has_glyph(c) {
                continue;
            }

            let code = c as u32;
            let x = (code % COLS) * tile_size;
            let y = (code / COLS) * tile_size;
            font.draw_glyph_centered(&mut image, c, x, y, tile_size, color);
        }

        Ok(Self::new(Texture::new(image), tile_size)?)
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn len(&self) -> u32 {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tile_rect(&self, index: u32) -> Result<Rect, GeometryError> {
        let row = index / self.cols;
        if row >= self.rows {
            return Err(GeometryError::TileOutOfRange {
                index,
                row,
                rows: self.rows,
            });
        }

        tile_rect(index, self.texture.width(), self.tile_size)
    }

    /// A guest sprite showing tile `index`.
    pub fn tile_sprite(&self, index: u32) -> TesseraResult<Sprite> {
        let area = self.tile_rect(index)?;
        Sprite::guest(self.texture.clone(), area)
    }

    pub fn char_sprite(&self, c: char) -> TesseraResult<Sprite> {
        self.tile_sprite(c as u32)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tileset(w: u32, h: u32, tile_size: u32) -> Result<Tileset, GeometryError> {
        Tileset::new(Texture::new(Image::filled(w, h, Color::WHITE)), tile_size)
    }

    #[test]
    fn index_maps_to_row_and_column() {
        // 512 / 32 = 16 columns, so tile 17 is row 1, column 1.
        assert_eq!(
            Rect::new(32, 32, 32, 32).unwrap(),
            tile_rect(17, 512, 32).unwrap()
        );
        assert_eq!(Rect::new(480, 0, 32, 32).unwrap(), tile_rect(15, 512, 32).unwrap());
        assert_eq!(Rect::new(0, 32, 32, 32).unwrap(), tile_rect(16, 512, 32).unwrap());
    }

    #[test]
    fn invalid_tile_sizes_fail_fast() {
        assert_eq!(Err(GeometryError::ZeroTileSize), tile_rect(0, 512, 0));
        assert_eq!(
            Err(GeometryError::NonDividingTileSize {
                tile_size: 30,
                extent: 512,
                axis: "width"
            }),
            tile_rect(0, 512, 30)
        );
        assert!(matches!(
            tileset(64, 50, 16),
            Err(GeometryError::NonDividingTileSize { axis: "height", .. })
        ));
    }

    #[test]
    fn rows_are_range_checked() {
        let tileset = tileset(64, 32, 16).unwrap();
        assert_eq!(8, tileset.len());
        assert!(tileset.tile_rect(7).is_ok());
        assert_eq!(
            Err(GeometryError::TileOutOfRange {
                index: 8,
                row: 2,
                rows: 2
            }),
            tileset.tile_rect(8)
        );
    }

    #[test]
    fn huge_indices_are_rejected_without_wrapping() {
        assert_eq!(
            Err(GeometryError::TileOffsetOverflow {
                index: u32::MAX,
                tile_size: 32
            }),
            tile_rect(u32::MAX, 32, 32)
        );
        assert_eq!(
            Err(GeometryError::TileOffsetOverflow {
                index: 1 << 31,
                tile_size: 1
            }),
            tile_rect(1 << 31, 1, 1)
        );

        // The last tile whose bottom edge still fits in an i32.
        let last = (i32::MAX as u32) / 64 - 1;
        assert_eq!(
            Rect::new(0, last as i32 * 64, 64, 64).unwrap(),
            tile_rect(last, 64, 64).unwrap()
        );
        assert!(tile_rect(last + 1, 64, 64).is_err());

        let tileset = tileset(64, 64, 64).unwrap();
        assert_eq!(
            Err(GeometryError::TileOutOfRange {
                index: 1 << 31,
                row: 1 << 31,
                rows: 1
            }),
            tileset.tile_rect(1 << 31)
        );
        assert!(matches!(
            tileset.tile_rect(u32::MAX),
            Err(GeometryError::TileOutOfRange { .. })
        ));
    }

    #[test]
    fn tiles_exactly_cover_the_image() {
        let tileset = tileset(96, 64, 16).unwrap();
        let rects: Vec<Rect> = (0..tileset.len())
            .map(|i| tileset.tile_rect(i).unwrap())
            .collect();

        let covered: i64 = rects.iter().map(Rect::area).sum();
        assert_eq!(96 * 64, covered);

        let bounds = tileset.texture().bounds();
        for (i, a) in rects.iter().enumerate() {
            assert!(bounds.contains_rect(a));
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn tile_sprites_share_the_texture() {
        let tileset = tileset(64, 64, 32).unwrap();
        let sprite = tileset.tile_sprite(3).unwrap();

        assert!(sprite.is_guest());
        assert!(sprite.texture().ptr_eq(tileset.texture()));
        assert_eq!(Rect::new(32, 32, 32, 32).unwrap(), sprite.frame_rect());
        assert_eq!(Rect::new(0, 0, 32, 32).unwrap(), sprite.rect());
    }
}
