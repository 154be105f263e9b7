// ── Selected-entity cache ──
//
// A single slot remembering the event or country the user last opened, so
// the next screen can skip a round trip. Purely advisory: every reader
// must cope with it being empty or holding the other kind.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use eventual_api::{Country, Event};

#[derive(Debug, Clone, PartialEq)]
pub enum SelectedEntity {
    Event(Event),
    Country(Country),
}

impl SelectedEntity {
    pub fn id(&self) -> &str {
        match self {
            Self::Event(e) => &e.id,
            Self::Country(c) => &c.id,
        }
    }
}

/// Lock-free single-item cache shared by all screens.
#[derive(Debug, Clone, Default)]
pub struct SelectionCache {
    slot: Arc<ArcSwapOption<SelectedEntity>>,
}

impl SelectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<SelectedEntity>> {
        self.slot.load_full()
    }

    /// Replace whatever was selected.
    pub fn set(&self, entity: SelectedEntity) {
        self.slot.store(Some(Arc::new(entity)));
    }

    pub fn clear(&self) {
        self.slot.store(None);
    }

    /// The selected event, if the slot holds one.
    pub fn event(&self) -> Option<Event> {
        match self.get().as_deref() {
            Some(SelectedEntity::Event(e)) => Some(e.clone()),
            _ => None,
        }
    }

    /// The selected country, if the slot holds one.
    pub fn country(&self) -> Option<Country> {
        match self.get().as_deref() {
            Some(SelectedEntity::Country(c)) => Some(c.clone()),
            _ => None,
        }
    }
}
