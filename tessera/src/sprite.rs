use tessera_math::{Rect, Vec2i};

use crate::{Animation, Color, CopyOptions, GeometryError, TesseraResult, Texture};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };
}

/// Whether a sprite created its texture or borrows a region of someone
/// else's. Both hold a shared handle, so a guest never outlives its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner,
    Guest,
}

/// A drawable region of a texture placed on screen.
///
/// `rect` is where the sprite is drawn, `frame` is the part of the texture it
/// shows. For animated sprites the frame follows the animation.
#[derive(Debug, Clone)]
pub struct Sprite {
    rect: Rect,
    pub depth: i32,
    texture: Texture,
    ownership: Ownership,
    frame: Rect,
    animation: Option<Animation>,

    pub angle: f32,
    pub center: Option<Vec2i>,
    pub flip: Flip,
    pub color_mod: Color,
    pub alpha_mod: u8,
}

impl Sprite {
    /// A sprite showing the whole of a texture it owns.
    pub fn new(texture: Texture) -> Self {
        let frame = texture.bounds();
        Self::with_frame(texture, frame, Ownership::Owner)
    }

    /// A sprite showing `area` of a shared texture.
    pub fn guest(texture: Texture, area: Rect) -> TesseraResult<Self> {
        check_inside(&texture, area)?;
        Ok(Self::with_frame(texture, area, Ownership::Guest))
    }

    fn with_frame(texture: Texture, frame: Rect, ownership: Ownership) -> Self {
        Self {
            rect: Rect::from_size(frame.size()).unwrap_or_default(),
            depth: 0,
            texture,
            ownership,
            frame,
            animation: None,
            angle: 0.0,
            center: None,
            flip: Flip::NONE,
            color_mod: Color::WHITE,
            alpha_mod: 255,
        }
    }

    /// A guest sprite over `area`, given relative to this sprite's frame.
    pub fn subsprite(&self, area: Rect) -> TesseraResult<Sprite> {
        let area = area.translated(self.frame.topleft());
        if !self.frame.contains_rect(&area) {
            return Err(GeometryError::OutsideTexture {
                area,
                width: self.frame.w() as u32,
                height: self.frame.h() as u32,
            }
            .into());
        }

        let mut sprite = Sprite::guest(self.texture.clone(), area)?;
        sprite.depth = self.depth;
        Ok(sprite)
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn is_guest(&self) -> bool {
        self.ownership == Ownership::Guest
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn position(&self) -> Vec2i {
        self.rect.topleft()
    }

    pub fn size(&self) -> Vec2i {
        self.rect.size()
    }

    pub fn set_position(&mut self, position: Vec2i) -> &mut Self {
        self.rect.set_topleft(position);
        self
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.rect.move_by(dx, dy);
        self
    }

    /// Scales the on-screen size. The frame is unaffected.
    pub fn set_size(&mut self, w: i32, h: i32) -> TesseraResult<&mut Self> {
        self.rect.set_size(w, h)?;
        Ok(self)
    }

    /// `(x1, y1, x2, y2)` of the on-screen rectangle.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let r = self.rect;
        (r.left(), r.top(), r.right(), r.bottom())
    }

    pub fn frame_rect(&self) -> Rect {
        self.frame
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Turns the current frame into the first cell of a `cols x rows`
    /// animation grid and shrinks the sprite to one cell.
    pub fn set_animation(
        &mut self,
        cols: u32,
        rows: u32,
        col_w: u32,
        row_h: u32,
        col: u32,
        row: u32,
    ) -> TesseraResult<&mut Self> {
        let animation = Animation::new(cols, rows, col_w, row_h, col, row, self.frame.topleft())?;
        check_inside(&self.texture, animation.grid_rect())?;

        self.frame = animation.frame_rect();
        self.rect.set_size(col_w as i32, row_h as i32)?;
        self.animation = Some(animation);

        Ok(self)
    }

    pub fn clear_animation(&mut self) -> Option<Animation> {
        self.animation.take()
    }

    /// Advances the animation, wrapping at the grid edges. Returns whether the
    /// frame changed.
    pub fn step(&mut self, dcol: i32, drow: i32) -> TesseraResult<bool> {
        let animation = self.animation.as_mut().ok_or(GeometryError::NotAnimated)?;

        let stepped = animation.step(dcol, drow);
        if stepped {
            self.frame = animation.frame_rect();
        }

        Ok(stepped)
    }

    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            angle: self.angle,
            center: self.center,
            flip: self.flip,
            color_mod: self.color_mod,
            alpha_mod: self.alpha_mod,
        }
    }

    /// Destination rectangle after applying a batch offset.
    pub(crate) fn placed(&self, offset: Vec2i) -> Rect {
        self.rect.translated(offset)
    }
}

fn check_inside(texture: &Texture, area: Rect) -> Result<(), GeometryError> {
    if texture.bounds().contains_rect(&area) {
        Ok(())
    } else {
        Err(GeometryError::OutsideTexture {
            area,
            width: texture.width(),
            height: texture.height(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Image, TesseraError};
    use tessera_math::v2i;

    fn strip() -> Texture {
        Texture::new(Image::filled(320, 64, Color::WHITE))
    }

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    #[test]
    fn owned_sprite_shows_whole_texture() {
        let sprite = Sprite::new(strip());
        assert_eq!(Ownership::Owner, sprite.ownership());
        assert_eq!(rect(0, 0, 320, 64), sprite.frame_rect());
        assert_eq!(rect(0, 0, 320, 64), sprite.rect());
    }

    #[test]
    fn guest_area_must_lie_inside_texture() {
        assert!(Sprite::guest(strip(), rect(288, 32, 32, 32)).is_ok());
        assert!(matches!(
            Sprite::guest(strip(), rect(300, 0, 32, 32)),
            Err(TesseraError::Geometry(GeometryError::OutsideTexture { .. }))
        ));
    }

    #[test]
    fn guest_keeps_texture_alive() {
        let texture = strip();
        let guest = Sprite::guest(texture.clone(), rect(0, 0, 8, 8)).unwrap();
        drop(texture);

        assert_eq!(1, guest.texture().holders());
        assert_eq!(Some(Color::WHITE), guest.texture().get_pixel(0, 0));
    }

    #[test]
    fn subsprite_is_relative_to_frame() {
        let parent = Sprite::guest(strip(), rect(64, 0, 64, 64)).unwrap();
        let child = parent.subsprite(rect(16, 16, 16, 16)).unwrap();

        assert!(child.is_guest());
        assert_eq!(rect(80, 16, 16, 16), child.frame_rect());
        assert!(parent.subsprite(rect(60, 0, 16, 16)).is_err());
    }

    #[test]
    fn bounds_are_corner_coordinates() {
        let mut sprite = Sprite::guest(strip(), rect(0, 0, 32, 16)).unwrap();
        sprite.set_position(v2i(10, 20)).move_by(5, -5);
        assert_eq!((15, 15, 47, 31), sprite.bounds());
    }

    #[test]
    fn animation_resizes_sprite_and_steps_frames() {
        let mut sprite = Sprite::new(strip());
        sprite.set_animation(10, 2, 32, 32, 0, 0).unwrap();

        assert_eq!(v2i(32, 32), sprite.size());
        assert_eq!(rect(0, 0, 32, 32), sprite.frame_rect());

        assert!(sprite.step(1, 1).unwrap());
        assert_eq!(rect(32, 32, 32, 32), sprite.frame_rect());

        assert!(!sprite.step(0, 0).unwrap());
        assert_eq!(rect(32, 32, 32, 32), sprite.frame_rect());
    }

    #[test]
    fn animation_grid_must_fit_texture() {
        let mut sprite = Sprite::new(strip());
        assert!(sprite.set_animation(11, 2, 32, 32, 0, 0).is_err());
        assert!(sprite.animation().is_none());
    }

    #[test]
    fn stepping_without_animation_is_an_error() {
        let mut sprite = Sprite::new(strip());
        assert!(matches!(
            sprite.step(1, 0),
            Err(TesseraError::Geometry(GeometryError::NotAnimated))
        ));
    }

    #[test]
    fn copy_options_follow_sprite_state() {
        let mut sprite = Sprite::new(strip());
        sprite.angle = 90.0;
        sprite.flip.horizontal = true;
        sprite.alpha_mod = 128;

        let options = sprite.copy_options();
        assert_eq!(90.0, options.angle);
        assert!(options.flip.horizontal);
        assert_eq!(128, options.alpha_mod);
        assert_eq!(Color::WHITE, options.color_mod);
    }
}
