use super::{
    Participant,
    ParticipantId,
};
use serde::{
    Deserialize,
    Serialize,
};
use view_policy_config::ParticipantsConfig;

/// The conference roster: at most one local participant plus the remote
/// participants in the order they joined.
///
/// Insertion order is the only order the store guarantees, every derived
/// ordering starts from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local: Option<Participant>,
    #[serde(default)]
    remote: Vec<Participant>,
}

impl ParticipantStore {
    /// Adds a participant, replacing an existing entry with the same id in place.
    pub fn join(&mut self, participant: Participant) {
        if participant.local {
            self.local = Some(participant);
            return;
        }
        match self.remote.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant,
            None => self.remote.push(participant),
        }
    }

    /// Applies `f` to the participant with the given id. Returns false if unknown.
    pub fn update(&mut self, id: &ParticipantId, f: impl FnOnce(&mut Participant)) -> bool {
        match self.get_mut(id) {
            Some(participant) => {
                f(participant);
                true
            }
            None => false,
        }
    }

    pub fn leave(&mut self, id: &ParticipantId) -> Option<Participant> {
        if self.local.as_ref().is_some_and(|p| &p.id == id) {
            return self.local.take();
        }
        let index = self.remote.iter().position(|p| &p.id == id)?;
        Some(self.remote.remove(index))
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.remote
            .iter()
            .find(|p| &p.id == id)
            .or_else(|| self.local.as_ref().filter(|p| &p.id == id))
    }

    fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        if self.local.as_ref().is_some_and(|p| &p.id == id) {
            return self.local.as_mut();
        }
        self.remote.iter_mut().find(|p| &p.id == id)
    }

    pub fn local(&self) -> Option<&Participant> {
        self.local.as_ref()
    }

    pub fn remote(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.remote.iter().filter(|p| !p.local)
    }

    fn all(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.local.iter().chain(self.remote.iter())
    }

    /// Participants excluding fake ones, the local participant included.
    pub fn count(&self) -> usize {
        self.remote_count() - self.fake_participants().count() + usize::from(self.local.is_some())
    }

    pub fn count_with_fake(&self) -> usize {
        self.remote_count() + usize::from(self.local.is_some())
    }

    pub fn remote_count(&self) -> usize {
        self.remote.len()
    }

    pub fn fake_participants(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.remote.iter().filter(|p| p.is_fake_participant)
    }

    pub fn pinned(&self) -> Option<&Participant> {
        self.all().find(|p| p.pinned)
    }

    pub fn pin(&mut self, id: Option<&ParticipantId>) {
        for participant in self.local.iter_mut().chain(self.remote.iter_mut()) {
            participant.pinned = Some(&participant.id) == id;
        }
    }

    pub fn dominant_speaker(&self) -> Option<&Participant> {
        self.all().find(|p| p.dominant_speaker)
    }

    /// Moves the dominant speaker flag, at most one participant carries it.
    pub fn set_dominant_speaker(&mut self, id: Option<&ParticipantId>) {
        for participant in self.local.iter_mut().chain(self.remote.iter_mut()) {
            participant.dominant_speaker = Some(&participant.id) == id;
        }
    }

    /// Participants with a raised hand, earliest first.
    pub fn raised_hands_queue(&self) -> Vec<&Participant> {
        let mut queue = self.all().filter(|p| p.has_raised_hand()).collect::<Vec<_>>();
        queue.sort_by_key(|p| p.raised_hand_timestamp);
        queue
    }

    pub fn everyone_is_moderator(&self) -> bool {
        let mut humans = self.all().filter(|p| !p.is_fake_participant).peekable();
        humans.peek().is_some() && humans.all(Participant::is_moderator)
    }

    pub fn display_name(&self, id: &ParticipantId, defaults: &ParticipantsConfig) -> String {
        match self.get(id) {
            Some(Participant { name: Some(name), .. }) => name.clone(),
            Some(participant) if participant.local => defaults.default_local_display_name.clone(),
            _ => defaults.default_remote_display_name.clone(),
        }
    }

    pub fn presence_status(&self, id: &ParticipantId) -> Option<&str> {
        self.get(id)?.presence.as_deref()
    }

    /// Participants pinned outside the filmstrip, the local one first.
    pub fn presenters(&self, prefix: &str) -> Vec<&Participant> {
        self.all().filter(|p| p.name_starts_with(prefix)).collect()
    }

    pub fn is_local_presenter(&self, prefix: &str) -> bool {
        self.local.as_ref().is_some_and(|p| p.name_starts_with(prefix))
    }
}
