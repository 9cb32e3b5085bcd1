use derive_more::{
    Deref,
    Display,
    From,
};
use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    EnumIter,
    EnumString,
};
use url::Url;

mod recent;
mod store;

pub use recent::RecentActiveParticipants;
pub use store::ParticipantStore;

/// Display names are cut to this many characters.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, EnumIter, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParticipantRole {
    Moderator,
    Participant,
    Visitor,
    #[default]
    None,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, EnumIter, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Active,
    Inactive,
    Interrupted,
    Restoring,
}

/// A roster entry, either the local user or a remote participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub local: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: ParticipantRole,
    #[serde(default)]
    pub connection_status: ConnectionStatus,
    #[serde(default)]
    pub dominant_speaker: bool,
    #[serde(default)]
    pub pinned: bool,
    /// Milliseconds since the conference started when the hand went up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raised_hand_timestamp: Option<u64>,
    /// Synthetic entries such as shared videos or bots.
    #[serde(default)]
    pub is_fake_participant: bool,
    /// Dial-in participants bridged by the SIP gateway.
    #[serde(default)]
    pub is_jigasi: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<String>,
}

impl Participant {
    pub fn remote(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn local(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            local: true,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl ToString) -> Self {
        self.name = normalize_display_name(&name.to_string());
        self
    }

    /// Takes over the fields of `update`. Dominant speaker, pin and raised
    /// hand are driven by their own actions and stay as they are.
    pub fn apply_update(&mut self, update: &Participant) {
        *self = Participant {
            dominant_speaker: self.dominant_speaker,
            pinned: self.pinned,
            raised_hand_timestamp: self.raised_hand_timestamp,
            ..update.clone()
        };
    }

    pub fn has_raised_hand(&self) -> bool {
        self.raised_hand_timestamp.is_some()
    }

    pub fn is_moderator(&self) -> bool {
        self.role == ParticipantRole::Moderator
    }

    pub fn is_active(&self) -> bool {
        self.connection_status == ConnectionStatus::Active
    }

    /// Remote humans, i.e. neither the local user nor a synthetic entry.
    pub fn is_remote_human(&self) -> bool {
        !self.local && !self.is_fake_participant
    }

    pub fn name_starts_with(&self, prefix: &str) -> bool {
        self.name.as_deref().is_some_and(|name| name.starts_with(prefix))
    }
}

/// Trims a display name and limits its length. Blank names become `None`.
pub fn normalize_display_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.chars().take(MAX_DISPLAY_NAME_LENGTH).collect())
}
