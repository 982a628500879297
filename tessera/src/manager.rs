use std::time::Duration;

use tessera_math::{v2i, Vec2i};
use tracing::{debug, info};

use crate::{
    Clock, Color, Context, Event, Font, Image, RenderBackend, Scene, Settings, SpriteFactory,
    TesseraResult, Texture,
};

const FPS_COLOR: Color = Color::rgb(127, 225, 127);

/// Runs the active scene: routes events to it and drives its updates.
pub struct Manager {
    ctx: Context,
    scene: Option<Box<dyn Scene>>,
    window_color: Color,
    limit_fps: Option<u32>,
    show_fps: bool,
    clock: Clock,
}

impl Manager {
    /// Builds a manager, loading the tileset and font named in `settings`.
    pub fn new(settings: &Settings) -> TesseraResult<Self> {
        let mut factory = SpriteFactory::new();

        if let Some(path) = &settings.font {
            factory.set_font(Font::open(path, settings.font_size)?);
        }

        if let Some(path) = &settings.tileset {
            let image = Image::open(path)?;
            debug!(path = %path.display(), "loading tileset");
            factory.load_tileset(Texture::new(image), settings.tile_size)?;
        }

        Ok(Self::with_factory(settings, factory))
    }

    /// Builds a manager around an already prepared factory.
    pub fn with_factory(settings: &Settings, factory: SpriteFactory) -> Self {
        let ctx = Context::new(settings.width, settings.height, settings.tile_size, factory);
        info!(
            width = settings.width,
            height = settings.height,
            cols = ctx.cols(),
            rows = ctx.rows(),
            "manager ready"
        );

        Self {
            ctx,
            scene: None,
            window_color: settings.window_color,
            limit_fps: settings.limit_fps,
            show_fps: settings.show_fps,
            clock: Clock::new(),
        }
    }

    /// Replaces the active scene with one built against this manager's
    /// context.
    pub fn set_scene<S, F>(&mut self, build: F) -> TesseraResult
    where
        S: Scene + 'static,
        F: FnOnce(&mut Context) -> TesseraResult<S>,
    {
        let scene = build(&mut self.ctx)?;
        self.scene = Some(Box::new(scene));
        Ok(())
    }

    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn is_alive(&self) -> bool {
        self.ctx.alive
    }

    pub fn quit(&mut self) {
        self.ctx.quit();
    }

    pub fn window_color(&self) -> Color {
        self.window_color
    }

    /// Waits out the frame-rate cap and returns the last frame's duration.
    pub fn tick(&mut self) -> Duration {
        self.clock.tick(self.limit_fps)
    }

    pub fn fps(&self) -> Option<f32> {
        self.clock.fps()
    }

    /// Routes one event to the active scene.
    ///
    /// Quit stops the manager even without a scene. Regaining focus redraws
    /// immediately, which is why the render target is needed here.
    pub fn dispatch(&mut self, event: Event, target: &mut dyn RenderBackend) -> TesseraResult {
        match event {
            Event::Quit => {
                self.ctx.alive = false;
                return Ok(());
            }
            Event::Resized { width, height } => {
                self.ctx.width = width;
                self.ctx.height = height;
                return Ok(());
            }
            Event::FocusGained if self.scene.is_some() => return self.update(target),
            _ => {}
        }

        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        let ctx = &mut self.ctx;

        match event {
            Event::MouseMotion { position, buttons } => {
                let delta = position - ctx.mouse;
                ctx.mouse = position;
                ctx.buttons = buttons;

                match buttons.primary() {
                    Some(button) => scene.on_mouse_drag(ctx, position, delta, button),
                    None => scene.on_mouse_motion(ctx, position, delta),
                }
            }

            Event::MouseButtonDown {
                position,
                button,
                clicks,
            } => {
                ctx.mouse = position;
                ctx.buttons.set(button, true);
                scene.on_mouse_press(ctx, position, button, clicks > 1);
            }

            Event::MouseButtonUp { position, button } => {
                ctx.mouse = position;
                ctx.buttons.set(button, false);
            }

            Event::MouseWheel { offset } => scene.on_mouse_scroll(ctx, offset),

            Event::KeyDown { key } => {
                let keyboard = *ctx.keyboard.process(key, true);
                scene.on_key_press(ctx, key, keyboard);
            }

            Event::KeyUp { key } => {
                let keyboard = *ctx.keyboard.process(key, false);
                scene.on_key_release(ctx, key, keyboard);
            }

            Event::Quit | Event::Resized { .. } | Event::FocusGained => {}
        }

        Ok(())
    }

    /// Clears the target, lets the scene draw, overlays the frame rate and
    /// presents.
    pub fn update(&mut self, target: &mut dyn RenderBackend) -> TesseraResult {
        if !self.ctx.alive {
            return Ok(());
        }

        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        if scene.ignore_regular_update() {
            return Ok(());
        }

        target.clear(self.window_color)?;
        scene.on_update(&mut self.ctx, target)?;
        if self.show_fps {
            self.draw_fps(target)?;
        }
        target.present()
    }

    fn draw_fps(&mut self, target: &mut dyn RenderBackend) -> TesseraResult {
        let (Some(fps), Some(_)) = (self.clock.fps(), self.ctx.factory.font()) else {
            return Ok(());
        };

        let text = format!("FPS: {:03}", fps.round() as u32);
        let sprite = self.ctx.factory.from_text(&text, Some(FPS_COLOR))?;
        let at = v2i(self.ctx.width as i32 - sprite.size().x, 0);

        self.ctx.sprite_renderer.render_sprite(target, &sprite, Some(at))?;
        Ok(())
    }

    /// Seeds the mouse position so the first motion event has a sensible
    /// delta.
    pub fn set_mouse_position(&mut self, position: Vec2i) {
        self.ctx.mouse = position;
    }
}
