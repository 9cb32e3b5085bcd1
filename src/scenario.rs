use color_eyre::Result;
use eyre::Context as _;
use serde::Deserialize;
use std::path::Path;
use view_policy_core::Action;

/// Timed actions replayed against an in-memory media engine.
///
/// ```yaml
/// engine_last_n: -1
/// steps:
///   - action:
///       conference-joined:
///         name: room
///   - at_ms: 200
///     action:
///       set-audio-only: true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    /// Value the engine reports before the first update.
    #[serde(default = "uncapped")]
    pub engine_last_n: i32,
    /// Make the engine reject every `set_last_n` call.
    #[serde(default)]
    pub fail_set_last_n: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn uncapped() -> i32 {
    -1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Offset from the start of the replay.
    #[serde(default)]
    pub at_ms: u64,
    #[serde(with = "serde_yml::with::singleton_map_recursive")]
    pub action: Action,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read scenario {path:?}"))?;
        Self::from_yaml(&content).wrap_err_with(|| format!("Invalid scenario {path:?}"))
    }

    /// Parses a scenario. Steps are ordered by time, steps at the same time
    /// keep their file order.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut scenario: Self = serde_yml::from_str(content)?;
        scenario.steps.sort_by_key(|step| step.at_ms);
        Ok(scenario)
    }

    pub fn duration_ms(&self) -> u64 {
        self.steps.last().map(|step| step.at_ms).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use view_policy_core::participant::Participant;

    #[test]
    fn steps_are_sorted_by_time() {
        let scenario = Scenario::from_yaml(
            r#"
fail_set_last_n: true
steps:
  - at_ms: 500
    action:
      set-car-mode: true
  - action:
      conference-joined:
        name: room
  - at_ms: 500
    action:
      participant-joined:
        id: bob
        name: Bob
"#,
        )
        .unwrap();

        assert_eq!(scenario.engine_last_n, -1);
        assert!(scenario.fail_set_last_n);
        assert_eq!(scenario.duration_ms(), 500);
        assert_eq!(
            scenario.steps.iter().map(|step| step.action.clone()).collect::<Vec<_>>(),
            vec![
                Action::ConferenceJoined { name: "room".into() },
                Action::SetCarMode(true),
                Action::ParticipantJoined(Participant::remote("bob").with_name("Bob")),
            ]
        );
    }

    #[test]
    fn bundled_scenarios_parse() {
        let scenario = Scenario::from_yaml(include_str!("../scenarios/burst.yaml")).unwrap();
        assert_eq!(scenario.steps.len(), 13);
        assert_eq!(scenario.duration_ms(), 900);
    }

    #[test]
    fn unknown_actions_are_rejected() {
        assert!(Scenario::from_yaml("steps:\n  - action: warp-drive\n").is_err());
    }
}
