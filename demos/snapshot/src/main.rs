//! Renders a frame without a window and saves it as a PNG.
//!
//! Usage: `snapshot [OUTPUT]`, writing `snapshot.png` by default.

use std::process::ExitCode;

use tessera::{
    Canvas, Color, RenderBackend, SpriteFactory, SpriteRenderer, TesseraResult,
};
use tessera_math::{v2i, Rect};
use tracing::{error, info};

fn render(path: &str) -> TesseraResult {
    let factory = SpriteFactory::new();
    let mut canvas = Canvas::new(256, 256);
    canvas.clear(Color::rgb(24, 24, 32))?;

    let a = Rect::new(16, 16, 64, 64)?;
    let b = Rect::new(160, 128, 80, 48)?;
    let mut sprites = vec![
        factory.from_color(Color::RED, a),
        factory.from_color(Color::GREEN, b),
        factory.from_color(Color::BLUE, a.gap(&b)),
    ];

    // Half transparent and tilted, drawn on top of everything else.
    let mut overlay = factory.from_color(Color::YELLOW, Rect::new(96, 96, 64, 64)?);
    overlay.depth = 1;
    overlay.angle = 30.0;
    overlay.alpha_mod = 128;
    sprites.push(overlay);

    let mut renderer = SpriteRenderer::new();
    renderer.set_present(true);
    let stats = renderer.render(&mut canvas, &sprites, None, None)?;

    canvas.draw_line(v2i(0, 255), v2i(255, 0), Color::WHITE)?;
    canvas.draw_rect(Rect::new(0, 0, 256, 256)?, Color::MAGENTA)?;
    canvas.present()?;

    canvas.front().save(path)?;
    info!(path, drawn = stats.drawn, skipped = stats.skipped, "saved snapshot");

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "snapshot.png".to_string());

    match render(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "snapshot failed");
            ExitCode::FAILURE
        }
    }
}
