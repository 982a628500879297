use std::time::{Duration, Instant};

use tessera_math::{v2i, Vec2i};
use winit::{
    dpi::PhysicalSize,
    error::{EventLoopError, OsError},
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder, EventLoopWindowTarget},
    keyboard::{self, KeyLocation, NamedKey},
    window::{Window, WindowBuilder},
};

use crate::{Event, Key, MouseButton, MouseButtons, Settings, TesseraError, TesseraResult};

const DOUBLE_CLICK: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_SLOP: i32 = 4;
const WHEEL_LINE_PIXELS: f64 = 20.0;

pub(crate) fn create_event_loop() -> TesseraResult<EventLoop<()>> {
    Ok(EventLoopBuilder::new().build()?)
}

pub(crate) fn create_window(
    settings: &Settings,
    elwt: &EventLoopWindowTarget<()>,
) -> TesseraResult<Window> {
    let window = WindowBuilder::new()
        .with_inner_size(PhysicalSize::new(settings.width, settings.height))
        .with_title(&settings.title)
        .with_resizable(true)
        .build(elwt)?;

    Ok(window)
}

/// Size of the primary display in physical pixels, if the platform reports
/// one.
pub(crate) fn display_size(elwt: &EventLoopWindowTarget<()>) -> Option<(u32, u32)> {
    elwt.primary_monitor().map(|monitor| monitor.size().into())
}

/// Turns winit window events into [`Event`]s, tracking the pointer state
/// winit leaves to the application.
#[derive(Debug, Default)]
pub(crate) struct InputTranslator {
    position: Vec2i,
    buttons: MouseButtons,
    last_click: Option<(MouseButton, Instant, Vec2i)>,
}

impl InputTranslator {
    pub(crate) fn translate(&mut self, event: &WindowEvent) -> Option<Event> {
        match event {
            WindowEvent::CloseRequested => Some(Event::Quit),

            WindowEvent::Focused(true) => Some(Event::FocusGained),

            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => Some(Event::Resized {
                width: size.width,
                height: size.height,
            }),

            WindowEvent::CursorMoved { position, .. } => {
                self.position = v2i(position.x as i32, position.y as i32);
                Some(Event::MouseMotion {
                    position: self.position,
                    buttons: self.buttons,
                })
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(*button)?;
                let pressed = *state == ElementState::Pressed;
                self.buttons.set(button, pressed);

                if pressed {
                    let clicks = self.click(button, Instant::now());
                    Some(Event::MouseButtonDown {
                        position: self.position,
                        button,
                        clicks,
                    })
                } else {
                    Some(Event::MouseButtonUp {
                        position: self.position,
                        button,
                    })
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let offset = match *delta {
                    MouseScrollDelta::LineDelta(x, y) => v2i(x.round() as i32, y.round() as i32),
                    MouseScrollDelta::PixelDelta(p) => v2i(
                        (p.x / WHEEL_LINE_PIXELS).round() as i32,
                        (p.y / WHEEL_LINE_PIXELS).round() as i32,
                    ),
                };
                (offset != Vec2i::ZERO).then_some(Event::MouseWheel { offset })
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        location,
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let key = map_key(logical_key, *location);
                match state {
                    ElementState::Pressed if !repeat || !key.is_modifier() => {
                        Some(Event::KeyDown { key })
                    }
                    ElementState::Pressed => None,
                    ElementState::Released => Some(Event::KeyUp { key }),
                }
            }

            _ => None,
        }
    }

    /// Counts a press as the second of a double click when the same button
    /// went down nearby shortly before.
    fn click(&mut self, button: MouseButton, now: Instant) -> u8 {
        let clicks = match self.last_click {
            Some((last, at, position))
                if last == button
                    && now.duration_since(at) <= DOUBLE_CLICK
                    && near(position, self.position) =>
            {
                2
            }
            _ => 1,
        };

        // A double click consumes the first press so a third starts over.
        self.last_click = (clicks == 1).then_some((button, now, self.position));
        clicks
    }
}

fn near(a: Vec2i, b: Vec2i) -> bool {
    let d = a - b;
    d.x.abs() <= DOUBLE_CLICK_SLOP && d.y.abs() <= DOUBLE_CLICK_SLOP
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

pub(crate) fn map_key(key: &keyboard::Key, location: KeyLocation) -> Key {
    let right = location == KeyLocation::Right;

    match key {
        keyboard::Key::Character(s) => s
            .chars()
            .next()
            .map_or(Key::Other, |c| Key::Char(c.to_ascii_lowercase())),

        keyboard::Key::Named(named) => match named {
            NamedKey::Space => Key::Char(' '),
            NamedKey::Escape => Key::Escape,
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::Insert => Key::Insert,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            NamedKey::Control if right => Key::RCtrl,
            NamedKey::Control => Key::LCtrl,
            NamedKey::Shift if right => Key::RShift,
            NamedKey::Shift => Key::LShift,
            NamedKey::Alt if right => Key::RAlt,
            NamedKey::Alt => Key::LAlt,
            NamedKey::CapsLock => Key::CapsLock,
            NamedKey::NumLock => Key::NumLock,
            NamedKey::ScrollLock => Key::ScrollLock,
            NamedKey::F1 => Key::F(1),
            NamedKey::F2 => Key::F(2),
            NamedKey::F3 => Key::F(3),
            NamedKey::F4 => Key::F(4),
            NamedKey::F5 => Key::F(5),
            NamedKey::F6 => Key::F(6),
            NamedKey::F7 => Key::F(7),
            NamedKey::F8 => Key::F(8),
            NamedKey::F9 => Key::F(9),
            NamedKey::F10 => Key::F(10),
            NamedKey::F11 => Key::F(11),
            NamedKey::F12 => Key::F(12),
            _ => Key::Other,
        },

        _ => Key::Other,
    }
}

impl From<EventLoopError> for TesseraError {
    fn from(err: EventLoopError) -> Self {
        TesseraError::platform("failed to run event loop").with_source(err)
    }
}

impl From<OsError> for TesseraError {
    fn from(err: OsError) -> Self {
        TesseraError::platform("failed to perform os action").with_source(err)
    }
}
