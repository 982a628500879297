use std::process::ExitCode;

use tessera::{
    Color, Config, Context, RenderBackend, Scene, Sprite, TesseraResult,
};
use tessera_math::Rect;
use tracing::info;

/// Two squares and the gap between them.
struct Rects {
    sprites: Vec<Sprite>,
}

impl Rects {
    fn new(ctx: &mut Context) -> TesseraResult<Self> {
        let a = Rect::new(600, 10, 100, 100)?;
        let b = Rect::new(400, 400, 100, 100)?;
        let gap = a.gap(&b);
        info!(%a, %b, %gap, "gap between rects");

        let sprites = [(Color::RED, a), (Color::GREEN, b), (Color::BLUE, gap)]
            .into_iter()
            .map(|(color, rect)| ctx.factory.from_color(color, rect))
            .collect();

        Ok(Self { sprites })
    }
}

impl Scene for Rects {
    fn on_update(&mut self, ctx: &mut Context, target: &mut dyn RenderBackend) -> TesseraResult {
        ctx.sprite_renderer.render(target, &self.sprites, None, None)?;
        Ok(())
    }

    fn ignore_regular_update(&self) -> bool {
        true
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = Config::load_or_default("tessera.json");
    config.manager.screen_width.get_or_insert(800);
    config.manager.screen_height.get_or_insert(600);

    tessera::run(config, Rects::new)
}
