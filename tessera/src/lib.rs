//! Tile-based 2D sprite toolkit: tilesets, animated sprites, depth-sorted
//! batch rendering and a scene manager driven by a window event loop.

use std::process::ExitCode;

pub use tessera_math::{v2i, Rect, RectError, Vec2i};

pub use crate::image::Image;
pub use animation::Animation;
pub use app::App;
pub use canvas::Canvas;
pub use color::{Color, ColorError};
pub use config::{Config, ManagerConfig, ResourcesConfig, Settings};
pub use error::{GeometryError, TesseraError, TesseraResult};
pub use events::{Event, EventHandler, HandlerId};
pub use factory::SpriteFactory;
pub use font::{CharSet, Font};
pub use gen_vec::{GenIdx, GenVec};
pub use gpu::WindowPresenter;
pub use input::{Key, KeyboardState, MouseButton, MouseButtons};
pub use manager::Manager;
pub use render::{line_points, CopyOptions, RenderBackend, RenderStats, SpriteRenderer};
pub use scene::{Context, EmptyScene, Scene, SpriteId, SpriteSet};
pub use sprite::{Flip, Ownership, Sprite};
pub use texture::Texture;
pub use tileset::{tile_rect, Tileset};
pub use time::Clock;

mod animation;
mod app;
mod canvas;
mod color;
pub mod config;
mod error;
mod events;
mod factory;
mod font;
mod gen_vec;
mod gpu;
mod image;
mod input;
mod manager;
mod render;
mod scene;
mod sprite;
mod sys;
mod texture;
mod tileset;
mod time;

/// Runs `build`'s scene in a window configured by `config`, reporting any
/// error on stderr.
pub fn run<S, F>(config: Config, build: F) -> ExitCode
where
    S: Scene + 'static,
    F: FnOnce(&mut Context) -> TesseraResult<S>,
{
    match App::new(config).run(build) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
