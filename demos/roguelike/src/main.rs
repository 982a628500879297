use std::process::ExitCode;

use tessera::{
    CharSet, Color, Config, Context, Image, Key, KeyboardState, RenderBackend, Scene, Sprite,
    SpriteSet, TesseraResult, Texture, Tileset,
};
use tessera_math::v2i;
use tracing::{debug, info};

/// Moves an `@` around a walled room with the arrow keys. Shift moves two
/// tiles at a time.
struct RogueLike {
    map: SpriteSet,
    player: Sprite,
}

impl RogueLike {
    fn new(ctx: &mut Context) -> TesseraResult<Self> {
        if ctx.factory.tileset().is_none() {
            let tileset = match ctx.factory.font() {
                Some(font) => {
                    Tileset::from_font(font, CharSet::ASCII, ctx.tile_size(), Color::WHITE)?
                }
                None => block_tileset(ctx.tile_size())?,
            };
            ctx.factory.set_tileset(tileset);
        }

        let (cols, rows) = (ctx.cols() as i32, ctx.rows() as i32);
        let mut map = SpriteSet::new();
        for row in 0..rows {
            for col in 0..cols {
                let edge = row == 0 || col == 0 || row == rows - 1 || col == cols - 1;
                let mut tile = ctx.factory.get_char_sprite(if edge { '#' } else { '.' })?;
                tile.set_position(ctx.tile_position(col, row));
                map.add(tile);
            }
        }
        debug!(tiles = map.len(), "built map");

        let mut player = ctx.factory.get_char_sprite('@')?;
        player.depth = 1;
        player.set_position(ctx.tile_position(cols / 2, rows / 2));

        Ok(Self { map, player })
    }
}

impl Scene for RogueLike {
    fn on_update(&mut self, ctx: &mut Context, target: &mut dyn RenderBackend) -> TesseraResult {
        let sprites = self.map.iter().chain([&self.player]);
        ctx.sprite_renderer.render(target, sprites, None, None)?;
        Ok(())
    }

    fn on_key_release(&mut self, ctx: &mut Context, key: Key, keyboard: KeyboardState) {
        let tile = ctx.tile_size() as i32;
        let step = if keyboard.shift() { 2 } else { 1 };
        let (dcol, drow) = match key {
            Key::Escape => {
                ctx.quit();
                return;
            }
            Key::Up => (0, -step),
            Key::Down => (0, step),
            Key::Left => (-step, 0),
            Key::Right => (step, 0),
            _ => return,
        };

        // Walls line the screen edge.
        let to = self.player.position() + v2i(dcol, drow) * tile;
        let (col, row) = (to.x / tile, to.y / tile);
        if col > 0 && row > 0 && col < ctx.cols() as i32 - 1 && row < ctx.rows() as i32 - 1 {
            self.player.set_position(to);
            info!(col, row, "moved");
        }
    }
}

/// A stand-in tileset for when no tileset or font is configured: `#` is a
/// wall block, `.` a floor dot and `@` a filled disc.
fn block_tileset(tile_size: u32) -> TesseraResult<Tileset> {
    let mut image = Image::filled(16 * tile_size, 8 * tile_size, Color::TRANSPARENT);
    let mut paint = |c: char, color: Color, inside: &dyn Fn(i32, i32) -> bool| {
        let (x0, y0) = ((c as u32 % 16) * tile_size, (c as u32 / 16) * tile_size);
        let half = tile_size as i32 / 2;
        for y in 0..tile_size {
            for x in 0..tile_size {
                if inside(x as i32 - half, y as i32 - half) {
                    image.put_pixel(x0 + x, y0 + y, color);
                }
            }
        }
    };

    let r = tile_size as i32 / 2;
    paint('#', Color::rgb(120, 110, 100), &|x, y| x > -r && y > -r);
    paint('.', Color::rgb(80, 80, 80), &|x, y| x * x + y * y <= 4);
    paint('@', Color::YELLOW, &|x, y| x * x + y * y < (r - 2) * (r - 2));

    Ok(Tileset::new(Texture::new(image), tile_size)?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = Config::load_or_default("tessera.json");
    config.manager.screen_width.get_or_insert(800);
    config.manager.screen_height.get_or_insert(608);
    config.manager.title.get_or_insert_with(|| "Rogue".to_string());

    tessera::run(config, RogueLike::new)
}
