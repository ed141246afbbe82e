//! Entities that can live in a synchronized list.

use std::fmt::Debug;

use amc_api_models::{Charger, Client, EntityId};

/// A row type managed by a [`crate::list::ListController`].
pub trait ListEntity: Clone + Debug + Send + Sync + 'static {
    /// Plural resource name, used in metrics labels and fallback messages.
    const KIND: &'static str;

    /// Server identifier.
    fn id(&self) -> EntityId;

    /// Combine a server response with the row it replaces.
    ///
    /// Fields present in `self` (the response) win. Nested relations the
    /// response omits are carried over from `previous`.
    #[must_use]
    fn merge_update(self, previous: &Self) -> Self;
}

impl ListEntity for Client {
    const KIND: &'static str = "clients";

    fn id(&self) -> EntityId {
        self.id
    }

    fn merge_update(mut self, previous: &Self) -> Self {
        if self.chargers.is_none() {
            self.chargers.clone_from(&previous.chargers);
        }
        if self.total_chargers.is_none() {
            self.total_chargers = previous.total_chargers;
        }
        self
    }
}

impl ListEntity for Charger {
    const KIND: &'static str = "chargers";

    fn id(&self) -> EntityId {
        self.id
    }

    fn merge_update(mut self, previous: &Self) -> Self {
        if self.client.is_none() {
            self.client.clone_from(&previous.client);
        }
        self
    }
}
