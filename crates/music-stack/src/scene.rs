//! Scoped registrations for music that lasts as long as a scene.

use crate::element::MusicStackElement;
use crate::error::Result;
use crate::key::PriorityKey;
use crate::stack::SharedMusicStack;
use std::sync::Arc;
use tracing::warn;

/// Keeps an element on a shared stack until released or dropped.
///
/// Registration happens on construction and removal happens exactly once,
/// either through [`SceneMusic::release`] or when the handle is dropped.
#[must_use = "dropping a SceneMusic removes its music from the stack"]
pub struct SceneMusic {
    stack: SharedMusicStack,
    key: PriorityKey,
    registered: bool,
}

impl SceneMusic {
    pub fn register(stack: &SharedMusicStack, element: Arc<dyn MusicStackElement>) -> Result<Self> {
        let key = stack.lock().add(element)?;
        Ok(Self {
            stack: Arc::clone(stack),
            key,
            registered: true,
        })
    }

    pub fn key(&self) -> PriorityKey {
        self.key
    }

    /// Remove the element from the stack now.
    pub fn release(mut self) -> Result<()> {
        self.registered = false;
        self.stack.lock().remove(self.key)
    }
}

impl Drop for SceneMusic {
    fn drop(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;
        if let Err(err) = self.stack.lock().remove(self.key) {
            warn!("Scene music could not leave the stack: {}", err);
        }
    }
}
