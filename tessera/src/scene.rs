use tessera_math::{v2i, Vec2i};

use crate::{
    gen_vec::{GenIdx, GenVec},
    Key, KeyboardState, MouseButton, MouseButtons, RenderBackend, Sprite, SpriteFactory,
    SpriteRenderer, TesseraResult,
};

/// Live sprites of a scene, addressed by generational ids.
pub type SpriteSet = GenVec<Sprite>;
pub type SpriteId = GenIdx;

/// Everything a scene may use from its manager, handed to every callback.
pub struct Context {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) tile_size: u32,
    pub factory: SpriteFactory,
    pub sprite_renderer: SpriteRenderer,
    pub(crate) keyboard: KeyboardState,
    pub(crate) mouse: Vec2i,
    pub(crate) buttons: MouseButtons,
    pub(crate) alive: bool,
}

impl Context {
    pub(crate) fn new(width: u32, height: u32, tile_size: u32, factory: SpriteFactory) -> Self {
        Self {
            width,
            height,
            tile_size,
            factory,
            sprite_renderer: SpriteRenderer::new(),
            keyboard: KeyboardState::default(),
            mouse: Vec2i::ZERO,
            buttons: MouseButtons::default(),
            alive: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Whole tiles that fit across the screen.
    pub fn cols(&self) -> u32 {
        self.width / self.tile_size
    }

    /// Whole tiles that fit down the screen.
    pub fn rows(&self) -> u32 {
        self.height / self.tile_size
    }

    /// Pixel position of the tile at `(col, row)`.
    pub fn tile_position(&self, col: i32, row: i32) -> Vec2i {
        v2i(col, row) * self.tile_size as i32
    }

    pub fn keyboard(&self) -> KeyboardState {
        self.keyboard
    }

    pub fn mouse_position(&self) -> Vec2i {
        self.mouse
    }

    pub fn mouse_buttons(&self) -> MouseButtons {
        self.buttons
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Stops the main loop after the current event.
    pub fn quit(&mut self) {
        self.alive = false;
    }
}

/// One unit of game state. Every callback has a no-op default except
/// [`on_key_release`](Scene::on_key_release), which quits on Escape.
#[allow(unused_variables)]
pub trait Scene {
    fn on_key_press(&mut self, ctx: &mut Context, key: Key, keyboard: KeyboardState) {}

    fn on_key_release(&mut self, ctx: &mut Context, key: Key, keyboard: KeyboardState) {
        if key == Key::Escape {
            ctx.quit();
        }
    }

    /// The mouse moved with `button` held.
    fn on_mouse_drag(
        &mut self,
        ctx: &mut Context,
        position: Vec2i,
        delta: Vec2i,
        button: MouseButton,
    ) {
    }

    /// The mouse moved with no button held.
    fn on_mouse_motion(&mut self, ctx: &mut Context, position: Vec2i, delta: Vec2i) {}

    fn on_mouse_press(
        &mut self,
        ctx: &mut Context,
        position: Vec2i,
        button: MouseButton,
        double: bool,
    ) {
    }

    /// Positive `y` scrolls away from the user.
    fn on_mouse_scroll(&mut self, ctx: &mut Context, offset: Vec2i) {}

    /// Draws the scene. The target is already cleared and is presented
    /// afterwards.
    fn on_update(&mut self, ctx: &mut Context, target: &mut dyn RenderBackend) -> TesseraResult {
        Ok(())
    }

    /// Scenes that redraw only in response to events return `true` to skip
    /// the per-frame update.
    fn ignore_regular_update(&self) -> bool {
        false
    }
}

/// A scene with no behaviour beyond the defaults.
#[derive(Debug, Default)]
pub struct EmptyScene;

impl Scene for EmptyScene {}
