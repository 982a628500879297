use std::process::ExitCode;

use tessera::{Color, Config, Context, Image, RenderBackend, Scene, Sprite, TesseraResult};
use tessera_math::v2i;

const FRAMES: u32 = 10;

/// A square cycling through a strip of hues, one frame per update.
struct Spinner {
    sprite: Sprite,
}

impl Spinner {
    fn new(ctx: &mut Context) -> TesseraResult<Self> {
        let size = ctx.tile_size();
        let mut strip = Image::filled(size * FRAMES, size, Color::TRANSPARENT);
        for frame in 0..FRAMES {
            let hue = 360.0 * frame as f32 / FRAMES as f32;
            let color = Color::from_hsva(hue, 100.0, 100.0, 100.0)?;
            for y in 0..size {
                for x in 0..size {
                    strip.put_pixel(frame * size + x, y, color);
                }
            }
        }

        let mut sprite = ctx.factory.from_image_data(strip);
        sprite.set_animation(FRAMES, 1, size, size, 0, 0)?;
        sprite.set_position(v2i(128, 128));

        Ok(Self { sprite })
    }
}

impl Scene for Spinner {
    fn on_update(&mut self, ctx: &mut Context, target: &mut dyn RenderBackend) -> TesseraResult {
        self.sprite.step(1, 0)?;
        ctx.sprite_renderer.render_sprite(target, &self.sprite, None)?;
        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = Config::load_or_default("tessera.json");
    config.manager.screen_width.get_or_insert(640);
    config.manager.screen_height.get_or_insert(480);
    config.manager.limit_fps.get_or_insert(10);

    tessera::run(config, Spinner::new)
}
