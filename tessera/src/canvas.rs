use tessera_math::{rotate_about, v2, Rect, Vec2i};

use crate::{Color, CopyOptions, Image, RenderBackend, TesseraError, TesseraResult, Texture};

/// Software render target.
///
/// Drawing goes to a back buffer; [`present`](RenderBackend::present) copies
/// it to the front buffer, which is what a window or snapshot reads.
#[derive(Debug, Clone)]
pub struct Canvas {
    target: Image,
    front: Image,
    frames: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Image::filled(width, height, Color::TRANSPARENT),
            front: Image::filled(width, height, Color::TRANSPARENT),
            frames: 0,
        }
    }

    /// Resizes both buffers, discarding their contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.target.width(), self.target.height()) {
            *self = Self {
                frames: self.frames,
                ..Self::new(width, height)
            };
        }
    }

    pub fn target(&self) -> &Image {
        &self.target
    }

    pub fn front(&self) -> &Image {
        &self.front
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        self.target.bounds().intersection(&rect)
    }

    fn blend(&mut self, x: u32, y: u32, src: Color) {
        if src.a == 0 {
            return;
        }

        let dst = self.target.get_pixel(x, y).unwrap_or_default();
        self.target.put_pixel(x, y, blend_over(src, dst));
    }
}

/// Porter-Duff source-over on straight alpha.
fn blend_over(src: Color, dst: Color) -> Color {
    if src.a == 255 {
        return src;
    }

    let sa = src.a as u32;
    let da = dst.a as u32 * (255 - sa) / 255;
    let out_a = sa + da;
    if out_a == 0 {
        return Color::TRANSPARENT;
    }

    let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da) / out_a) as u8;
    Color::rgba(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        out_a as u8,
    )
}

fn modulate(texel: Color, options: &CopyOptions) -> Color {
    let scale = |c: u8, m: u8| (c as u32 * m as u32 / 255) as u8;
    Color::rgba(
        scale(texel.r, options.color_mod.r),
        scale(texel.g, options.color_mod.g),
        scale(texel.b, options.color_mod.b),
        scale(scale(texel.a, options.color_mod.a), options.alpha_mod),
    )
}

impl RenderBackend for Canvas {
    fn output_size(&self) -> Vec2i {
        self.target.bounds().size()
    }

    fn clear(&mut self, color: Color) -> TesseraResult {
        self.target.fill(color);
        Ok(())
    }

    fn copy(
        &mut self,
        texture: &Texture,
        src: Option<Rect>,
        dst: Rect,
        options: &CopyOptions,
    ) -> TesseraResult {
        let src = src.unwrap_or_else(|| texture.bounds());
        if !texture.bounds().contains_rect(&src) {
            return Err(TesseraError::backend(format!(
                "source {src} lies outside the {}x{} texture",
                texture.width(),
                texture.height()
            )));
        }

        if src.is_empty() || dst.is_empty() {
            return Ok(());
        }

        let pivot = match options.center {
            Some(c) => dst.topleft().as_vec2() + c.as_vec2(),
            None => dst.topleft().as_vec2() + dst.size().as_vec2() / 2.0,
        };

        // Destination pixels the rotated rectangle can touch.
        let corners = [
            v2(dst.left() as f32, dst.top() as f32),
            v2(dst.right() as f32, dst.top() as f32),
            v2(dst.left() as f32, dst.bottom() as f32),
            v2(dst.right() as f32, dst.bottom() as f32),
        ]
        .map(|p| rotate_about(p, pivot, options.angle));

        let min = corners.iter().fold(corners[0], |a, &b| a.min(b)).floor();
        let max = corners.iter().fold(corners[0], |a, &b| a.max(b)).ceil();
        let reach = Rect::new(
            min.x as i32,
            min.y as i32,
            (max.x - min.x) as i32,
            (max.y - min.y) as i32,
        )?;

        let Some(area) = self.clip(reach) else {
            return Ok(());
        };

        let scale_x = src.w() as f32 / dst.w() as f32;
        let scale_y = src.h() as f32 / dst.h() as f32;

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let centre = v2(x as f32 + 0.5, y as f32 + 0.5);
                let local = rotate_about(centre, pivot, -options.angle);

                let lx = local.x - dst.left() as f32;
                let ly = local.y - dst.top() as f32;
                if lx < 0.0 || ly < 0.0 || lx >= dst.w() as f32 || ly >= dst.h() as f32 {
                    continue;
                }

                let mut u = ((lx * scale_x) as i32).min(src.w() - 1);
                let mut v = ((ly * scale_y) as i32).min(src.h() - 1);
                if options.flip.horizontal {
                    u = src.w() - 1 - u;
                }
                if options.flip.vertical {
                    v = src.h() - 1 - v;
                }

                let texel = texture
                    .get_pixel((src.x() + u) as u32, (src.y() + v) as u32)
                    .unwrap_or_default();
                self.blend(x as u32, y as u32, modulate(texel, options));
            }
        }

        Ok(())
    }

    fn fill(&mut self, rect: Rect, color: Color) -> TesseraResult {
        let Some(area) = self.clip(rect) else {
            return Ok(());
        };

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                self.blend(x as u32, y as u32, color);
            }
        }

        Ok(())
    }

    fn present(&mut self) -> TesseraResult {
        self.front.pixels_mut().copy_from_slice(self.target.pixels());
        self.frames += 1;
        Ok(())
    }
}
