//! First-call-wins player slot.

use bridge_traits::audio::AudioGraph;
use once_cell::sync::OnceCell;

use crate::builder::PlayerAvailability;
use crate::error::Result;

/// Holds at most one player for its lifetime.
///
/// The first caller runs its initialiser; concurrent callers block until it
/// settles and never run theirs. A failed initialisation leaves the cell
/// empty, and the next caller tries again.
pub struct PlayerCell<G: AudioGraph> {
    slot: OnceCell<PlayerAvailability<G>>,
}

impl<G: AudioGraph> PlayerCell<G> {
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Option<&PlayerAvailability<G>> {
        self.slot.get()
    }

    pub fn get_or_init<F>(&self, init: F) -> Result<&PlayerAvailability<G>>
    where
        F: FnOnce() -> Result<PlayerAvailability<G>>,
    {
        self.slot.get_or_try_init(init)
    }
}

impl<G: AudioGraph> Default for PlayerCell<G> {
    fn default() -> Self {
        Self::new()
    }
}
