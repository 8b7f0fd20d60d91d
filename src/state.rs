use crate::config::SessionConfig;
use crate::data::mask::SetMask;
use crate::data::model::{Attribute, Dataset, Set, Subset};
use crate::data::subsets::enumerate_subsets;
use crate::error::SessionError;

// ---------------------------------------------------------------------------
// Change notification
// ---------------------------------------------------------------------------

/// Emitted to subscribers whenever the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DatasetReplaced { name: String },
    SetToggled { set: SetMask, active: bool },
    SubsetsInvalidated { generation: u64 },
    SubsetsUpdated { generation: u64, count: usize },
}

pub type Listener = Box<dyn FnMut(&SessionEvent)>;

// ---------------------------------------------------------------------------
// Enumeration sequencing
// ---------------------------------------------------------------------------

/// A snapshot of the active selection that can be enumerated away from the
/// session and committed back with [`Session::commit_subsets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationRequest {
    pub generation: u64,
    pub active: Vec<SetMask>,
}

impl EnumerationRequest {
    pub fn run(&self, dataset: &Dataset) -> Vec<Subset> {
        enumerate_subsets(&self.active, &dataset.row_masks)
    }
}

struct SubsetCache {
    generation: u64,
    subsets: Vec<Subset>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One loaded dataset plus its active-set selection and derived subsets.
pub struct Session {
    dataset: Dataset,
    config: SessionConfig,
    /// Active set identifiers in activation order.
    active: Vec<SetMask>,
    /// Bumped on every change that makes cached subsets stale.
    generation: u64,
    cache: Option<SubsetCache>,
    listeners: Vec<Listener>,
}

impl Session {
    /// Take ownership of a dataset and activate its leading sets.
    pub fn new(dataset: Dataset, config: SessionConfig) -> Self {
        let mut session = Session {
            dataset,
            config: config.clamped(),
            active: Vec::new(),
            generation: 0,
            cache: None,
            listeners: Vec::new(),
        };
        session.apply_default_selection();
        session
    }

    /// Swap in a freshly loaded dataset, discarding selection and subsets.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        log::info!("Switching dataset '{}' -> '{}'", self.dataset.name, dataset.name);
        self.dataset = dataset;
        self.apply_default_selection();
        self.invalidate();
        let name = self.dataset.name.clone();
        self.emit(SessionEvent::DatasetReplaced { name });
    }

    fn apply_default_selection(&mut self) {
        self.active.clear();
        let limit = self.config.default_active_sets.min(self.config.max_active_sets);
        for (position, set) in self.dataset.sets.iter_mut().enumerate() {
            set.active = position < limit;
            if set.active {
                self.active.push(set.id);
            }
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sets(&self) -> &[Set] {
        &self.dataset.sets
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.dataset.attributes
    }

    /// Active sets in activation order.
    pub fn active_sets(&self) -> Vec<&Set> {
        self.active
            .iter()
            .filter_map(|id| self.dataset.set(*id))
            .collect()
    }

    pub fn active_ids(&self) -> &[SetMask] {
        &self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Flip a set between active and inactive. Returns the new state.
    ///
    /// Activation appends to the active order; deactivation removes the set
    /// and keeps the relative order of the rest. Cached subsets are dropped.
    pub fn toggle_set(&mut self, id: SetMask) -> Result<bool, SessionError> {
        let max = self.config.max_active_sets;
        let currently_active = self.active.len();
        let set = self
            .dataset
            .sets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SessionError::UnknownSet(id))?;

        if set.active {
            set.active = false;
            self.active.retain(|active| *active != id);
        } else {
            if currently_active >= max {
                return Err(SessionError::TooManyActiveSets { max });
            }
            set.active = true;
            self.active.push(id);
        }
        let active = set.active;

        log::debug!("Set {} ({}) is now {}", id, set.name, if active { "active" } else { "inactive" });
        self.emit(SessionEvent::SetToggled { set: id, active });
        self.invalidate();
        Ok(active)
    }

    /// Adding sets to a loaded dataset is not supported.
    pub fn add_set(&mut self, _set: Set) -> Result<(), SessionError> {
        log::warn!("add_set is not implemented");
        Err(SessionError::Unsupported("add_set"))
    }

    /// Removing sets from a loaded dataset is not supported.
    pub fn remove_set(&mut self, _id: SetMask) -> Result<(), SessionError> {
        log::warn!("remove_set is not implemented");
        Err(SessionError::Unsupported("remove_set"))
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.cache = None;
        let generation = self.generation;
        self.emit(SessionEvent::SubsetsInvalidated { generation });
    }

    /// Snapshot the current selection for enumeration.
    pub fn begin_enumeration(&self) -> EnumerationRequest {
        EnumerationRequest {
            generation: self.generation,
            active: self.active.clone(),
        }
    }

    /// Apply enumeration results if they belong to the current generation.
    /// Returns `false` and discards `subsets` when they are stale.
    pub fn commit_subsets(&mut self, generation: u64, subsets: Vec<Subset>) -> bool {
        if generation != self.generation {
            log::debug!("Discarding subsets of generation {generation}, current is {}", self.generation);
            return false;
        }
        let count = subsets.len();
        self.cache = Some(SubsetCache { generation, subsets });
        self.emit(SessionEvent::SubsetsUpdated { generation, count });
        true
    }

    /// Subsets for the current selection, enumerating if stale.
    pub fn subsets(&mut self) -> &[Subset] {
        let fresh = self
            .cache
            .as_ref()
            .is_some_and(|cache| cache.generation == self.generation);
        if !fresh {
            let request = self.begin_enumeration();
            let subsets = request.run(&self.dataset);
            self.commit_subsets(request.generation, subsets);
        }
        match &self.cache {
            Some(cache) => &cache.subsets,
            None => &[],
        }
    }
}
