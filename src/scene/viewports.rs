//! Registry of the host's viewport containers and the scenes bound to them.

use std::fmt;

use rustc_hash::FxHashMap;

use super::Scene;
use crate::options::Options;
use crate::util::color::Color;

/// Name of a host viewport container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

impl ContainerId {
    /// Container with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Container name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What [`Viewports::create`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new scene is now bound to the container.
    Created,
    /// A scene already occupied the container; nothing changed.
    AlreadyBound,
    /// The host never declared this container; nothing changed.
    MissingContainer,
}

struct ContainerSlot {
    size: (u32, u32),
    scene: Option<Scene>,
}

/// The host's viewport containers, each holding at most one scene.
#[derive(Default)]
pub struct Viewports {
    slots: FxHashMap<ContainerId, ContainerSlot>,
}

impl Viewports {
    /// Registry with no containers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce that the host has a container of the given size.
    /// Re-declaring an existing container only updates its size.
    pub fn declare(&mut self, container: ContainerId, width: u32, height: u32) {
        match self.slots.get_mut(&container) {
            Some(slot) => {
                slot.size = (width, height);
                if let Some(scene) = slot.scene.as_mut() {
                    scene.resize(width, height);
                }
            }
            None => {
                let _ = self.slots.insert(
                    container,
                    ContainerSlot {
                        size: (width, height),
                        scene: None,
                    },
                );
            }
        }
    }

    /// Whether the host declared `container`.
    #[must_use]
    pub fn has_container(&self, container: &ContainerId) -> bool {
        self.slots.contains_key(container)
    }

    /// Bind a new scene to `container` unless it is missing or occupied.
    pub fn create(
        &mut self,
        container: &ContainerId,
        theme: Color,
        options: &Options,
        seed: u64,
    ) -> CreateOutcome {
        let Some(slot) = self.slots.get_mut(container) else {
            log::debug!("no container '{container}', scene not created");
            return CreateOutcome::MissingContainer;
        };
        if slot.scene.is_some() {
            return CreateOutcome::AlreadyBound;
        }
        slot.scene = Some(Scene::new(
            container.clone(),
            theme,
            slot.size,
            options,
            seed,
        ));
        CreateOutcome::Created
    }

    /// Resize a container and its scene, if any.
    pub fn resize(&mut self, container: &ContainerId, width: u32, height: u32) {
        if let Some(slot) = self.slots.get_mut(container) {
            slot.size = (width, height);
            if let Some(scene) = slot.scene.as_mut() {
                scene.resize(width, height);
            }
        }
    }

    /// Scene bound to `container`.
    #[must_use]
    pub fn scene(&self, container: &ContainerId) -> Option<&Scene> {
        self.slots.get(container).and_then(|s| s.scene.as_ref())
    }

    /// Mutable scene bound to `container`.
    pub fn scene_mut(&mut self, container: &ContainerId) -> Option<&mut Scene> {
        self.slots.get_mut(container).and_then(|s| s.scene.as_mut())
    }

    /// Every bound scene.
    pub fn scenes_mut(&mut self) -> impl Iterator<Item = &mut Scene> {
        self.slots.values_mut().filter_map(|s| s.scene.as_mut())
    }

    /// Number of bound scenes.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.slots.values().filter(|s| s.scene.is_some()).count()
    }
}
