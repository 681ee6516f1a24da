//! Component-scoped stack registrations.
//!
//! Spawning an entity with [`SceneBackgroundMusic`] registers its element on
//! the [`ActiveMusicStack`]; despawning the entity or removing the component
//! unregisters it again. Inserting a component with a different element
//! replaces the registration.

use crate::stack::ActiveMusicStack;
use bevy::prelude::*;
use music_stack::{MusicStackElement, PriorityKey};
use std::collections::HashMap;
use std::sync::Arc;

/// Background music requested for as long as the entity carries this component.
#[derive(Component, Clone)]
pub struct SceneBackgroundMusic {
    element: Arc<dyn MusicStackElement>,
}

impl SceneBackgroundMusic {
    pub fn new(element: impl MusicStackElement + 'static) -> Self {
        Self {
            element: Arc::new(element),
        }
    }

    pub fn from_arc(element: Arc<dyn MusicStackElement>) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Arc<dyn MusicStackElement> {
        &self.element
    }
}

impl std::fmt::Debug for SceneBackgroundMusic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneBackgroundMusic")
            .field("priority", &self.element.priority())
            .field(
                "music",
                &self.element.music_asset().map(|asset| asset.music_id()),
            )
            .finish()
    }
}

/// Stack keys of the registered [`SceneBackgroundMusic`] components.
#[derive(Resource, Default)]
pub struct SceneMusicKeys {
    keys: HashMap<Entity, Registration>,
}

struct Registration {
    key: PriorityKey,
    element: Arc<dyn MusicStackElement>,
}

impl SceneMusicKeys {
    pub fn get(&self, entity: Entity) -> Option<PriorityKey> {
        self.keys.get(&entity).map(|registration| registration.key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for SceneMusicKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.keys.iter().map(|(entity, registration)| (entity, registration.key)))
            .finish()
    }
}

fn unregister(stack: &mut ActiveMusicStack, entity: Entity, key: PriorityKey) {
    if let Err(err) = stack.remove(key) {
        warn!("Scene music of {:?} was already gone: {}", entity, err);
    }
}

/// Unregister components that were removed or whose entity was despawned.
pub fn release_scene_music(
    mut removed: RemovedComponents<SceneBackgroundMusic>,
    mut keys: ResMut<SceneMusicKeys>,
    mut stack: ResMut<ActiveMusicStack>,
) {
    for entity in removed.read() {
        if let Some(registration) = keys.keys.remove(&entity) {
            unregister(&mut stack, entity, registration.key);
        }
    }
}

/// Register added components and re-register replaced ones.
pub fn register_scene_music(
    changed: Query<(Entity, &SceneBackgroundMusic), Changed<SceneBackgroundMusic>>,
    mut keys: ResMut<SceneMusicKeys>,
    mut stack: ResMut<ActiveMusicStack>,
) {
    for (entity, music) in &changed {
        if let Some(registration) = keys.keys.get(&entity) {
            // Mutable access without a new element keeps the registration.
            if Arc::ptr_eq(&registration.element, &music.element) {
                continue;
            }
        }
        if let Some(registration) = keys.keys.remove(&entity) {
            unregister(&mut stack, entity, registration.key);
        }
        match stack.add(Arc::clone(&music.element)) {
            Ok(key) => {
                debug!("Scene music of {:?} registered as {}", entity, key);
                keys.keys.insert(
                    entity,
                    Registration {
                        key,
                        element: Arc::clone(&music.element),
                    },
                );
            }
            Err(err) => error!("Failed to register scene music of {:?}: {}", entity, err),
        }
    }
}
