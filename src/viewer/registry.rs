use thiserror::Error;

use super::instance::ViewerInstance;
use super::state::ViewerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("A viewer with id '{0}' is already mounted")]
    DuplicateId(ViewerId),

    #[error("Cannot mount more than {max} viewers")]
    Full { max: usize },
}

/// Mounted viewers, in display order, keyed by id
pub struct ViewerRegistry {
    instances: Vec<ViewerInstance>,
    /// Index of the viewer that receives input
    active: usize,
    max_viewers: usize,
}

impl ViewerRegistry {
    pub fn new(max_viewers: usize) -> Self {
        Self {
            instances: Vec::new(),
            active: 0,
            max_viewers,
        }
    }

    /// Mount an instance. The first mounted instance becomes active.
    pub fn mount(&mut self, instance: ViewerInstance) -> Result<usize, RegistryError> {
        if self.contains(instance.id()) {
            return Err(RegistryError::DuplicateId(instance.id().clone()));
        }
        if self.instances.len() >= self.max_viewers {
            return Err(RegistryError::Full {
                max: self.max_viewers,
            });
        }

        self.instances.push(instance);
        Ok(self.instances.len() - 1)
    }

    /// Unmount a viewer, discarding its state
    pub fn unmount(&mut self, id: &ViewerId) -> Option<ViewerInstance> {
        let index = self.position(id)?;
        let removed = self.instances.remove(index);

        // Adjust active viewer if needed
        if self.active >= self.instances.len() {
            self.active = self.instances.len().saturating_sub(1);
        } else if self.active > index {
            self.active -= 1;
        }

        tracing::info!(viewer_id = %id, "Unmounted viewer");
        Some(removed)
    }

    pub fn contains(&self, id: &ViewerId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &ViewerId) -> Option<usize> {
        self.instances.iter().position(|i| i.id() == id)
    }

    pub fn get(&self, id: &ViewerId) -> Option<&ViewerInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    pub fn get_mut(&mut self, id: &ViewerId) -> Option<&mut ViewerInstance> {
        self.instances.iter_mut().find(|i| i.id() == id)
    }

    /// Switch to a specific viewer
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index < self.instances.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Switch to the next viewer
    pub fn next_viewer(&mut self) {
        if !self.instances.is_empty() {
            self.active = (self.active + 1) % self.instances.len();
        }
    }

    /// Switch to the previous viewer
    pub fn prev_viewer(&mut self) {
        if !self.instances.is_empty() {
            self.active = if self.active == 0 {
                self.instances.len() - 1
            } else {
                self.active - 1
            };
        }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&ViewerInstance> {
        self.instances.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut ViewerInstance> {
        self.instances.get_mut(self.active)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn can_mount(&self) -> bool {
        self.instances.len() < self.max_viewers
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewerInstance> {
        self.instances.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ViewerInstance> {
        self.instances.iter_mut()
    }

    /// Tab names for display
    pub fn tab_names(&self) -> Vec<String> {
        self.instances.iter().map(ViewerInstance::tab_name).collect()
    }
}
