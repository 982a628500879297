use tessera_math::Vec2i;

use crate::{Key, MouseButton, MouseButtons};

/// Backend-independent input and window events, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Quit,
    FocusGained,
    Resized {
        width: u32,
        height: u32,
    },
    MouseMotion {
        position: Vec2i,
        buttons: MouseButtons,
    },
    MouseButtonDown {
        position: Vec2i,
        button: MouseButton,
        /// 1 for a single click, 2 for a double click.
        clicks: u8,
    },
    MouseButtonUp {
        position: Vec2i,
        button: MouseButton,
    },
    MouseWheel {
        offset: Vec2i,
    },
    KeyDown {
        key: Key,
    },
    KeyUp {
        key: Key,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Callback<S, A, R> = Box<dyn FnMut(&S, &A) -> R>;

/// An ordered list of callbacks that all receive the same sender.
///
/// ```
/// # use tessera::EventHandler;
/// let mut on_score: EventHandler<&str, u32, String> = EventHandler::new("player one");
/// on_score.add(|who, points| format!("{who} +{points}"));
/// assert_eq!(vec!["player one +5".to_string()], on_score.call(&5));
/// ```
pub struct EventHandler<S, A, R = ()> {
    sender: S,
    next_id: u64,
    callbacks: Vec<(HandlerId, Callback<S, A, R>)>,
}

impl<S, A, R> EventHandler<S, A, R> {
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn add(&mut self, callback: impl FnMut(&S, &A) -> R + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if the callback was already removed.
    pub fn remove(&mut self, id: HandlerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cid, _)| *cid != id);
        self.callbacks.len() != before
    }

    /// Runs every callback in the order they were added.
    pub fn call(&mut self, args: &A) -> Vec<R> {
        let sender = &self.sender;
        self.callbacks
            .iter_mut()
            .map(|(_, callback)| callback(sender, args))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn callbacks_run_in_insertion_order() {
        let mut handler = EventHandler::new(10);
        handler.add(|s: &i32, a: &i32| s + a);
        handler.add(|s: &i32, a: &i32| s * a);

        assert_eq!(vec![13, 30], handler.call(&3));
        assert_eq!(2, handler.len());
    }

    #[test]
    fn removed_callbacks_stop_running() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut handler: EventHandler<&str, u8> = EventHandler::new("sender");

        let log = seen.clone();
        let first = handler.add(move |_, a| log.borrow_mut().push(("first", *a)));
        let log = seen.clone();
        handler.add(move |_, a| log.borrow_mut().push(("second", *a)));

        handler.call(&1);
        assert!(handler.remove(first));
        assert!(!handler.remove(first));
        handler.call(&2);

        assert_eq!(
            vec![("first", 1), ("second", 1), ("second", 2)],
            *seen.borrow()
        );
        assert_eq!(1, handler.len());
    }

    #[test]
    fn empty_handler_returns_nothing() {
        let mut handler: EventHandler<(), ()> = EventHandler::new(());
        assert!(handler.is_empty());
        assert!(handler.call(&()).is_empty());
    }
}
