//! Scripted command runs and RON file loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::session::Command;

/// A command to apply before a given frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Zero-based frame index the command fires before
    pub frame: u64,
    pub command: Command,
}

/// Commands replayed against a session, loaded from RON files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Load script from RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;

        let script = ron::from_str(&content)
            .with_context(|| format!("Failed to parse RON script: {}", path.display()))?;

        Ok(script)
    }

    /// Save script to RON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize script to RON")?;

        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write script file: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// Commands scheduled for `frame`, in file order
    pub fn commands_at(&self, frame: u64) -> impl Iterator<Item = Command> + '_ {
        self.steps
            .iter()
            .filter(move |step| step.frame == frame)
            .map(|step| step.command)
    }

    /// Last frame any step fires on
    pub fn last_frame(&self) -> Option<u64> {
        self.steps.iter().map(|step| step.frame).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainbox_core::simulation::Material;

    #[test]
    fn test_parse_script() {
        let ron = r#"(
            steps: [
                (frame: 0, command: Select(Water)),
                (frame: 0, command: Paint(x: 10, y: 4)),
                (frame: 5, command: GrowBrush(coarse: true)),
                (frame: 9, command: TogglePause),
            ],
        )"#;

        let script: Script = ron::from_str(ron).unwrap();

        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.commands_at(0).collect::<Vec<_>>(),
            vec![Command::Select(Material::Water), Command::Paint { x: 10, y: 4 }]
        );
        assert_eq!(script.commands_at(1).count(), 0);
        assert_eq!(script.last_frame(), Some(9));
    }

    #[test]
    fn test_missing_steps_is_empty_script() {
        let script: Script = ron::from_str("()").unwrap();
        assert!(script.steps.is_empty());
        assert_eq!(script.last_frame(), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drop.ron");
        let script = Script {
            steps: vec![
                ScriptStep {
                    frame: 2,
                    command: Command::ShrinkBrush { coarse: false },
                },
                ScriptStep {
                    frame: 3,
                    command: Command::Reset,
                },
            ],
        };

        script.to_file(&path).unwrap();
        let loaded = Script::from_file(&path).unwrap();

        assert_eq!(loaded, script);
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(steps: [(frame: \"soon\")])").unwrap();

        let err = Script::from_file(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.ron"));
    }
}
