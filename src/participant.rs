//! Participant identities and the registry that owns them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A person taking part in shared expenses.
///
/// Immutable once registered; splits and expenses hold it by `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Unique participant identifier.
    pub id: String,

    /// Display name used in reports.
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Lookup table of registered participants, kept in registration order.
#[derive(Debug, Default, Clone)]
pub struct ParticipantRegistry {
    participants: Vec<Arc<Participant>>,
    by_id: HashMap<String, usize>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant. The caller must check [`ParticipantRegistry::get`]
    /// first; ids are unique.
    pub fn insert(&mut self, participant: Participant) -> Arc<Participant> {
        debug_assert!(!self.by_id.contains_key(&participant.id));

        let participant = Arc::new(participant);
        self.by_id
            .insert(participant.id.clone(), self.participants.len());
        self.participants.push(Arc::clone(&participant));
        participant
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Participant>> {
        self.by_id.get(id).map(|&idx| &self.participants[idx])
    }

    /// Iterates participants in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Participant>> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
