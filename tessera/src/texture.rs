use std::{ops::Deref, sync::Arc};

use crate::Image;

/// Shared, immutable pixel data that sprites draw from.
///
/// Clones share the underlying image. The texture lives as long as any sprite
/// still refers to it.
#[derive(Debug, Clone)]
pub struct Texture {
    image: Arc<Image>,
}

impl Texture {
    pub fn new(image: Image) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Number of live handles to this texture.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.image)
    }

    pub fn ptr_eq(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }

    /// Stable identity for caches keyed by texture.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.image) as usize
    }
}

impl Deref for Texture {
    type Target = Image;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<Image> for Texture {
    fn from(image: Image) -> Self {
        Self::new(image)
    }
}
