use super::ParticipantId;
use serde::{
    Deserialize,
    Serialize,
};

/// Participants ordered by how recently they became the active speaker,
/// most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentActiveParticipants(Vec<ParticipantId>);

impl RecentActiveParticipants {
    pub fn index_of(&self, id: &ParticipantId) -> Option<usize> {
        self.0.iter().position(|recent| recent == id)
    }

    /// Moves `id` to the front, inserting it if it was not tracked yet.
    pub fn promote(&mut self, id: ParticipantId) {
        self.remove(&id);
        self.0.insert(0, id);
    }

    pub fn remove(&mut self, id: &ParticipantId) {
        self.0.retain(|recent| recent != id);
    }

    pub fn truncate(&mut self, max: usize) {
        self.0.truncate(max);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ParticipantId> for RecentActiveParticipants {
    fn from_iter<T: IntoIterator<Item = ParticipantId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
