use tessera_math::{Rect, RectError};
use thiserror::Error;

use crate::ColorError;

pub type TesseraResult<T = ()> = Result<T, TesseraError>;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TesseraError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("render backend failure: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    #[error("platform failure: {message}")]
    Platform {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    #[error("font error: {0}")]
    Font(&'static str),

    #[error("{0} has not been loaded")]
    MissingResource(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("an image processing error occurred")]
    Image(#[from] image::ImageError),

    #[error("an i/o error occurred")]
    Io(#[from] std::io::Error),
}

impl TesseraError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause to a backend or platform error. Other
    /// variants already carry their source and are returned unchanged.
    pub fn with_source(self, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        match self {
            Self::Backend { message, .. } => Self::Backend {
                message,
                source: Some(Box::new(err)),
            },
            Self::Platform { message, .. } => Self::Platform {
                message,
                source: Some(Box::new(err)),
            },
            other => other,
        }
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}

impl From<RectError> for TesseraError {
    fn from(err: RectError) -> Self {
        Self::Geometry(err.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error(transparent)]
    Rect(#[from] RectError),

    #[error("tile size must be greater than zero")]
    ZeroTileSize,

    #[error("tile size {tile_size} does not evenly divide the tileset {axis} of {extent}px")]
    NonDividingTileSize {
        tile_size: u32,
        extent: u32,
        axis: &'static str,
    },

    #[error("tile {index} maps to row {row}, but the tileset only has {rows} rows")]
    TileOutOfRange { index: u32, row: u32, rows: u32 },

    #[error("tile {index} of size {tile_size} lies beyond the addressable pixel range")]
    TileOffsetOverflow { index: u32, tile_size: u32 },

    #[error("animation grid must be non-zero, got {cols}x{rows} cells of {col_w}x{row_h}px")]
    EmptyAnimationGrid {
        cols: u32,
        rows: u32,
        col_w: u32,
        row_h: u32,
    },

    #[error("starting frame ({col}, {row}) lies outside the {cols}x{rows} animation grid")]
    FrameOutsideGrid {
        col: u32,
        row: u32,
        cols: u32,
        rows: u32,
    },

    #[error("area {area} lies outside the {width}x{height} texture")]
    OutsideTexture { area: Rect, width: u32, height: u32 },

    #[error("sprite has no animation")]
    NotAnimated,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn backend_errors_are_distinguishable() {
        let err = TesseraError::backend("copy failed");
        assert!(err.is_backend());
        assert_eq!("render backend failure: copy failed", err.to_string());

        let err: TesseraError = GeometryError::ZeroTileSize.into();
        assert!(!err.is_backend());
    }

    #[test]
    fn with_source_keeps_message_and_exposes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "device lost");
        let err = TesseraError::backend("present failed").with_source(io);

        assert_eq!("render backend failure: present failed", err.to_string());
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(Some("device lost".to_string()), source);
    }

    #[test]
    fn rect_errors_convert_to_geometry_errors() {
        let err: TesseraError = RectError::NegativeSize { w: -2, h: 0 }.into();
        assert!(matches!(
            err,
            TesseraError::Geometry(GeometryError::Rect(RectError::NegativeSize { .. }))
        ));
    }
}
