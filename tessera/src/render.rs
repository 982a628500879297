use tessera_math::{Rect, Vec2i};
use tracing::trace;

use crate::{Color, Flip, Sprite, TesseraResult, Texture};

/// How a texture region is transformed when copied to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyOptions {
    /// Clockwise rotation in degrees.
    pub angle: f32,
    /// Rotation pivot relative to the destination. Defaults to its centre.
    pub center: Option<Vec2i>,
    pub flip: Flip,
    pub color_mod: Color,
    pub alpha_mod: u8,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            angle: 0.0,
            center: None,
            flip: Flip::NONE,
            color_mod: Color::WHITE,
            alpha_mod: 255,
        }
    }
}

impl CopyOptions {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// The drawing primitives sprites are submitted to.
///
/// Errors from a backend mean the target could not be drawn to and are kept
/// apart from geometry errors by [`TesseraError::Backend`](crate::TesseraError).
pub trait RenderBackend {
    fn output_size(&self) -> Vec2i;

    fn clear(&mut self, color: Color) -> TesseraResult;

    /// Copies `src` of `texture` (all of it when `None`) into `dst`, scaling
    /// to fit.
    fn copy(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Rect,
        options: &CopyOptions,
    ) -> TesseraResult;

    fn fill(&mut self, rect: Rect, color: Color) -> TesseraResult;

    fn present(&mut self) -> TesseraResult;

    /// One pixel wide outline.
    fn draw_rect(&mut self, rect: Rect, color: Color) -> TesseraResult {
        if rect.is_empty() {
            return Ok(());
        }

        let (x, y, w, h): (i32, i32, i32, i32) = rect.into();
        self.fill(Rect::new(x, y, w, 1)?, color)?;
        self.fill(Rect::new(x, y + h - 1, w, 1)?, color)?;
        self.fill(Rect::new(x, y, 1, h)?, color)?;
        self.fill(Rect::new(x + w - 1, y, 1, h)?, color)
    }

    fn draw_line(&mut self, from: Vec2i, to: Vec2i, color: Color) -> TesseraResult {
        self.draw_points(&line_points(from, to), color)
    }

    fn draw_points(&mut self, points: &[Vec2i], color: Color) -> TesseraResult {
        for &p in points {
            self.fill(Rect::new(p.x, p.y, 1, 1)?, color)?;
        }
        Ok(())
    }
}

/// Bresenham rasterisation, endpoints included.
pub fn line_points(from: Vec2i, to: Vec2i) -> Vec<Vec2i> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut points = Vec::with_capacity((dx - dy) as usize + 1);
    let mut p = from;
    let mut err = dx + dy;

    loop {
        points.push(p);
        if p == to {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }

    points
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub skipped: usize,
}

/// Submits batches of sprites to a backend in depth order.
#[derive(Clone)]
pub struct SpriteRenderer {
    viewport: Option<Rect>,
    present: bool,
    sort_key: fn(&Sprite) -> i32,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self {
            viewport: None,
            present: false,
            sort_key: |sprite| sprite.depth,
        }
    }

    /// Sprites entirely outside `viewport` are skipped. Without a viewport
    /// the backend's output area is used.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Whether [`render`](Self::render) presents after drawing by default.
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    pub fn set_sort_key(&mut self, sort_key: fn(&Sprite) -> i32) {
        self.sort_key = sort_key;
    }

    /// Draws `sprites` back to front.
    ///
    /// The sort is stable, so sprites of equal depth keep their input order.
    /// `offset` shifts every sprite for this batch only. A backend failure
    /// aborts the batch.
    pub fn render<'a, B, I>(
        &self,
        backend: &mut B,
        sprites: I,
        offset: Option<Vec2i>,
        present: Option<bool>,
    ) -> TesseraResult<RenderStats>
    where
        B: RenderBackend + ?Sized,
        I: IntoIterator<Item = &'a Sprite>,
    {
        let mut sprites: Vec<&Sprite> = sprites.into_iter().collect();
        sprites.sort_by_key(|s| (self.sort_key)(s));

        let offset = offset.unwrap_or_default();
        let viewport = self.resolve_viewport(backend);
        let mut stats = RenderStats::default();

        for sprite in sprites {
            if self.draw(backend, sprite, offset, viewport)? {
                stats.drawn += 1;
            } else {
                stats.skipped += 1;
            }
        }

        if present.unwrap_or(self.present) {
            backend.present()?;
        }

        Ok(stats)
    }

    /// Draws one sprite, at `at` instead of its own position when given.
    /// Returns `false` when the sprite was outside the viewport.
    pub fn render_sprite<B>(
        &self,
        backend: &mut B,
        sprite: &Sprite,
        at: Option<Vec2i>,
    ) -> TesseraResult<bool>
    where
        B: RenderBackend + ?Sized,
    {
        let offset = at.map_or(Vec2i::ZERO, |at| at - sprite.position());
        let viewport = self.resolve_viewport(backend);

        self.draw(backend, sprite, offset, viewport)
    }

    fn resolve_viewport<B: RenderBackend + ?Sized>(&self, backend: &B) -> Rect {
        self.viewport
            .unwrap_or_else(|| Rect::from_size(backend.output_size()).unwrap_or_default())
    }

    fn draw<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        sprite: &Sprite,
        offset: Vec2i,
        viewport: Rect,
    ) -> TesseraResult<bool> {
        let dst = sprite.placed(offset);
        if !viewport.intersects(&dst) {
            trace!(%dst, %viewport, "skipping sprite outside viewport");
            return Ok(false);
        }

        backend.copy(
            sprite.texture(),
            Some(sprite.frame_rect()),
            dst,
            &sprite.copy_options(),
        )?;

        Ok(true)
    }
}

/// A call observed by [`RecordingBackend`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Clear(Color),
    Copy {
        texture: usize,
        src: Option<Rect>,
        dst: Rect,
    },
    Fill(Rect, Color),
    Present,
}

/// Backend double that records every call and can be told to fail.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct RecordingBackend {
    pub size: Vec2i,
    pub calls: Vec<Call>,
    pub fail_copy_at: Option<usize>,
    copies: usize,
}

#[cfg(test)]
impl RecordingBackend {
    pub fn new(w: i32, h: i32) -> Self {
        Self {
            size: Vec2i::new(w, h),
            calls: Vec::new(),
            fail_copy_at: None,
            copies: 0,
        }
    }

    pub fn copies(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Copy { dst, .. } => Some(*dst),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl RenderBackend for RecordingBackend {
    fn output_size(&self) -> Vec2i {
        self.size
    }

    fn clear(&mut self, color: Color) -> TesseraResult {
        self.calls.push(Call::Clear(color));
        Ok(())
    }

    fn copy(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Rect,
        _options: &CopyOptions,
    ) -> TesseraResult {
        if self.fail_copy_at == Some(self.copies) {
            return Err(crate::TesseraError::backend("copy rejected"));
        }
        self.copies += 1;

        self.calls.push(Call::Copy {
            texture: texture.id(),
            src,
            dst,
        });
        Ok(())
    }

    fn fill(&mut self, rect: Rect, color: Color) -> TesseraResult {
        self.calls.push(Call::Fill(rect, color));
        Ok(())
    }

    fn present(&mut self) -> TesseraResult {
        self.calls.push(Call::Present);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Image;
    use tessera_math::v2i;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    /// Sprites 8px wide laid out side by side so their draw order can be read
    /// back from the destination x.
    fn row_of_sprites(depths: &[i32]) -> Vec<Sprite> {
        let texture = Texture::new(Image::filled(8, 8, Color::WHITE));
        depths
            .iter()
            .enumerate()
            .map(|(i, &depth)| {
                let mut sprite = Sprite::new(texture.clone());
                sprite.depth = depth;
                sprite.set_position(v2i(i as i32 * 8, 0));
                sprite
            })
            .collect()
    }

    fn drawn_indices(backend: &RecordingBackend) -> Vec<i32> {
        backend.copies().iter().map(|r| r.x() / 8).collect()
    }

    #[test]
    fn sorts_by_depth_and_keeps_ties_in_order() {
        let sprites = row_of_sprites(&[3, 1, 3, 2]);
        let mut backend = RecordingBackend::new(100, 100);

        let stats = SpriteRenderer::new()
            .render(&mut backend, &sprites, None, None)
            .unwrap();

        assert_eq!(vec![1, 3, 0, 2], drawn_indices(&backend));
        assert_eq!(RenderStats { drawn: 4, skipped: 0 }, stats);
    }

    #[test]
    fn equal_depths_draw_in_insertion_order() {
        let sprites = row_of_sprites(&[5, 5, 5, 5, 5]);
        let mut backend = RecordingBackend::new(100, 100);

        SpriteRenderer::new()
            .render(&mut backend, &sprites, None, None)
            .unwrap();

        assert_eq!(vec![0, 1, 2, 3, 4], drawn_indices(&backend));
    }

    #[test]
    fn offset_applies_to_batch_only() {
        let sprites = row_of_sprites(&[0, 0]);
        let mut backend = RecordingBackend::new(100, 100);

        SpriteRenderer::new()
            .render(&mut backend, &sprites, Some(v2i(10, 20)), None)
            .unwrap();

        assert_eq!(vec![rect(10, 20, 8, 8), rect(18, 20, 8, 8)], backend.copies());
        assert_eq!(v2i(0, 0), sprites[0].position());
    }

    #[test]
    fn sprites_outside_viewport_are_skipped() {
        let sprites = row_of_sprites(&[0, 0, 0, 0]);
        let mut renderer = SpriteRenderer::new();
        renderer.set_viewport(Some(rect(8, 0, 12, 8)));
        let mut backend = RecordingBackend::new(100, 100);

        let stats = renderer
            .render(&mut backend, &sprites, None, None)
            .unwrap();

        // Sprite 2 straddles the right edge and is still drawn.
        assert_eq!(vec![1, 2], drawn_indices(&backend));
        assert_eq!(RenderStats { drawn: 2, skipped: 2 }, stats);
    }

    #[test]
    fn default_viewport_is_backend_output() {
        let sprites = row_of_sprites(&[0, 0, 0]);
        let mut backend = RecordingBackend::new(16, 16);

        let stats = SpriteRenderer::new()
            .render(&mut backend, &sprites, Some(v2i(-4, 0)), None)
            .unwrap();

        assert_eq!(RenderStats { drawn: 3, skipped: 0 }, stats);

        let mut backend = RecordingBackend::new(16, 16);
        let stats = SpriteRenderer::new()
            .render(&mut backend, &sprites, Some(v2i(0, 16)), None)
            .unwrap();
        assert_eq!(RenderStats { drawn: 0, skipped: 3 }, stats);
    }

    #[test]
    fn backend_failure_aborts_batch() {
        let sprites = row_of_sprites(&[0, 1, 2]);
        let mut backend = RecordingBackend::new(100, 100);
        backend.fail_copy_at = Some(1);

        let err = SpriteRenderer::new()
            .render(&mut backend, &sprites, None, Some(true))
            .unwrap_err();

        assert!(err.is_backend());
        assert_eq!(vec![0], drawn_indices(&backend));
        assert!(!backend.calls.contains(&Call::Present));
    }

    #[test]
    fn present_flag_defaults_to_renderer_setting() {
        let sprites = row_of_sprites(&[0]);
        let mut renderer = SpriteRenderer::new();

        let mut backend = RecordingBackend::new(10, 10);
        renderer.render(&mut backend, &sprites, None, None).unwrap();
        assert!(!backend.calls.contains(&Call::Present));

        renderer.set_present(true);
        let mut backend = RecordingBackend::new(10, 10);
        renderer.render(&mut backend, &sprites, None, None).unwrap();
        assert_eq!(Some(&Call::Present), backend.calls.last());

        let mut backend = RecordingBackend::new(10, 10);
        renderer
            .render(&mut backend, &sprites, None, Some(false))
            .unwrap();
        assert!(!backend.calls.contains(&Call::Present));
    }

    #[test]
    fn render_sprite_draws_at_override_position() {
        let sprites = row_of_sprites(&[0, 0]);
        let mut backend = RecordingBackend::new(100, 100);
        let renderer = SpriteRenderer::new();

        assert!(renderer
            .render_sprite(&mut backend, &sprites[1], Some(v2i(50, 50)))
            .unwrap());
        assert!(!renderer
            .render_sprite(&mut backend, &sprites[1], Some(v2i(200, 0)))
            .unwrap());
        assert_eq!(vec![rect(50, 50, 8, 8)], backend.copies());
    }

    #[test]
    fn frame_rect_is_used_as_source() {
        let texture = Texture::new(Image::filled(32, 32, Color::WHITE));
        let sprite = Sprite::guest(texture.clone(), rect(16, 0, 16, 16)).unwrap();
        let mut backend = RecordingBackend::new(100, 100);

        SpriteRenderer::new()
            .render(&mut backend, [&sprite], None, None)
            .unwrap();

        assert_eq!(
            vec![Call::Copy {
                texture: texture.id(),
                src: Some(rect(16, 0, 16, 16)),
                dst: rect(0, 0, 16, 16)
            }],
            backend.calls
        );
    }

    #[test]
    fn line_points_cover_both_endpoints() {
        assert_eq!(
            vec![v2i(0, 0), v2i(1, 0), v2i(2, 1), v2i(3, 1)],
            line_points(v2i(0, 0), v2i(3, 1))
        );
        assert_eq!(vec![v2i(2, 2)], line_points(v2i(2, 2), v2i(2, 2)));
        assert_eq!(4, line_points(v2i(0, 3), v2i(0, 0)).len());
    }

    #[test]
    fn outline_is_four_fills() {
        let mut backend = RecordingBackend::new(10, 10);
        backend.draw_rect(rect(1, 1, 4, 3), Color::RED).unwrap();

        assert_eq!(
            vec![
                Call::Fill(rect(1, 1, 4, 1), Color::RED),
                Call::Fill(rect(1, 3, 4, 1), Color::RED),
                Call::Fill(rect(1, 1, 1, 3), Color::RED),
                Call::Fill(rect(4, 1, 1, 3), Color::RED),
            ],
            backend.calls
        );
    }
}
