use std::sync::Arc;

use tracing::{error, info};
use winit::{
    event::{Event as WinitEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoopWindowTarget},
    window::Window,
};

use crate::{
    gpu::WindowPresenter,
    sys::{self, InputTranslator},
    Config, Context, Manager, Scene, Settings, TesseraResult,
};

/// A windowed application running one scene.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Opens the window, builds the scene and runs until the scene quits or
    /// the window is closed.
    ///
    /// Backend failures drop the current frame and are logged. Any other
    /// error stops the loop and is returned.
    pub fn run<S, F>(self, build: F) -> TesseraResult
    where
        S: Scene + 'static,
        F: FnOnce(&mut Context) -> TesseraResult<S>,
    {
        let el = sys::create_event_loop()?;
        let settings = self.config.resolve(sys::display_size(&el))?;
        info!(
            title = %settings.title,
            width = settings.width,
            height = settings.height,
            "starting"
        );

        let mut manager = Manager::new(&settings)?;
        manager.set_scene(build)?;

        let mut presenter = WindowPresenter::new(settings.width, settings.height, true)?;
        let mut window: Option<Arc<Window>> = None;
        let mut input = InputTranslator::default();

        let mut result = Ok(());
        el.run(|event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            let step = match event {
                WinitEvent::Resumed => {
                    resume(&settings, elwt, &mut window, &mut presenter)
                }

                WinitEvent::Suspended => {
                    presenter.suspend();
                    Ok(())
                }

                WinitEvent::WindowEvent { event, .. } => {
                    handle_window_event(&event, &mut input, &mut manager, &mut presenter)
                }

                WinitEvent::AboutToWait => {
                    manager.tick();
                    manager.update(&mut presenter)
                }

                _ => Ok(()),
            };

            match step {
                Err(err) if err.is_backend() => error!(%err, "dropping frame"),
                Err(err) => {
                    result = Err(err);
                    elwt.exit();
                }
                Ok(()) => {}
            }

            if !manager.is_alive() {
                elwt.exit();
            }
        })?;

        info!(frames = presenter.canvas().frames(), "stopped");
        result
    }
}

fn resume(
    settings: &Settings,
    elwt: &EventLoopWindowTarget<()>,
    window: &mut Option<Arc<Window>>,
    presenter: &mut WindowPresenter,
) -> TesseraResult {
    let window = match window {
        Some(window) => window.clone(),
        None => window
            .insert(Arc::new(sys::create_window(settings, elwt)?))
            .clone(),
    };

    presenter.resume(window)
}

fn handle_window_event(
    event: &WindowEvent,
    input: &mut InputTranslator,
    manager: &mut Manager,
    presenter: &mut WindowPresenter,
) -> TesseraResult {
    if let WindowEvent::Resized(size) = event {
        presenter.resize(size.width, size.height)?;
    }

    match input.translate(event) {
        Some(event) => manager.dispatch(event, presenter),
        None => Ok(()),
    }
}
