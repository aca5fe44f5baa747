//! Persisted light/dark preference and the palette it selects.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeState {
    #[default]
    Light,
    Dark,
}

impl ThemeState {
    pub fn opposite(self) -> Self {
        match self {
            ThemeState::Light => ThemeState::Dark,
            ThemeState::Dark => ThemeState::Light,
        }
    }

    /// Icon shown on the theme toggle: the sun offers a way out of dark mode.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeState::Light => "\u{263E}", // ☾
            ThemeState::Dark => "\u{2600}",  // ☀
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeState::Light => Palette {
                background: Color::White,
                text: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                price: Color::Green,
                highlight: Color::LightBlue,
            },
            ThemeState::Dark => Palette {
                background: Color::Black,
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                price: Color::LightGreen,
                highlight: Color::DarkGray,
            },
        }
    }
}

/// Colors used across the whole frame for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub price: Color,
    pub highlight: Color,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct PreferenceFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<ThemeState>,
}

/// Default location of the preferences file.
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("catalog-browser").join("preferences.json"))
}

// ---------------------------------------------------------------------------
// ThemePreference
// ---------------------------------------------------------------------------

/// Reads and writes the persisted theme and tracks the one currently applied
/// to the display.
pub struct ThemePreference {
    path: Option<PathBuf>,
    applied: ThemeState,
}

impl ThemePreference {
    /// `path` of `None` keeps the preference in memory only.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            applied: ThemeState::default(),
        }
    }

    /// The persisted theme, or `None` if it was never set. An unreadable or
    /// corrupt file counts as never set.
    pub fn get(&self) -> Option<ThemeState> {
        let path = self.path.as_ref()?;
        if !path.exists() {
            return None;
        }
        match read_preferences(path) {
            Ok(prefs) => prefs.theme,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring preferences file: {e:#}");
                None
            }
        }
    }

    /// Apply `theme` to the display and persist it. The display changes even
    /// if the write fails.
    pub fn set(&mut self, theme: ThemeState) -> Result<()> {
        self.applied = theme;
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_preferences(path, &PreferenceFile { theme: Some(theme) })
    }

    /// Apply a stored dark preference. Light and unset leave the default
    /// presentation as it is.
    pub fn apply_on_startup(&mut self) -> ThemeState {
        if self.get() == Some(ThemeState::Dark) {
            self.applied = ThemeState::Dark;
        }
        self.applied
    }

    /// The theme currently shown.
    pub fn current(&self) -> ThemeState {
        self.applied
    }
}

fn read_preferences(path: &Path) -> Result<PreferenceFile> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| "parsing preferences JSON")
}

/// Write to a temp file and rename so a crash never leaves half a file.
fn write_preferences(path: &Path, prefs: &PreferenceFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, serde_json::to_string(prefs)?)
        .with_context(|| format!("writing {}", temp_path.display()))?;
    fs::rename(&temp_path, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "catalog_theme_test_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn teardown(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&ThemeState::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<ThemeState>("\"light\"").unwrap(),
            ThemeState::Light
        );
    }

    #[test]
    fn test_get_unset() {
        let dir = setup_temp_dir("unset");
        let pref = ThemePreference::new(Some(dir.join("prefs.json")));
        assert_eq!(pref.get(), None);
        teardown(&dir);
    }

    #[test]
    fn test_set_persists_across_instances() {
        let dir = setup_temp_dir("persist");
        let path = dir.join("nested").join("prefs.json");

        let mut pref = ThemePreference::new(Some(path.clone()));
        pref.set(ThemeState::Dark).unwrap();
        assert_eq!(pref.current(), ThemeState::Dark);

        let reopened = ThemePreference::new(Some(path));
        assert_eq!(reopened.get(), Some(ThemeState::Dark));
        teardown(&dir);
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let dir = setup_temp_dir("toggle");
        let mut pref = ThemePreference::new(Some(dir.join("prefs.json")));
        pref.set(ThemeState::Light).unwrap();
        let initial = pref.get();

        let next = pref.current().opposite();
        pref.set(next).unwrap();
        assert_eq!(pref.get(), Some(ThemeState::Dark));
        let next = pref.current().opposite();
        pref.set(next).unwrap();

        assert_eq!(pref.get(), initial);
        teardown(&dir);
    }

    #[test]
    fn test_apply_on_startup() {
        let dir = setup_temp_dir("startup");
        let path = dir.join("prefs.json");

        let mut fresh = ThemePreference::new(Some(path.clone()));
        assert_eq!(fresh.apply_on_startup(), ThemeState::Light);

        fs::write(&path, r#"{"theme":"light"}"#).unwrap();
        let mut light = ThemePreference::new(Some(path.clone()));
        assert_eq!(light.apply_on_startup(), ThemeState::Light);

        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let mut dark = ThemePreference::new(Some(path));
        assert_eq!(dark.apply_on_startup(), ThemeState::Dark);
        assert_eq!(dark.current().toggle_icon(), "\u{2600}");
        teardown(&dir);
    }

    #[test]
    fn test_corrupt_file_reads_as_unset() {
        let dir = setup_temp_dir("corrupt");
        let path = dir.join("prefs.json");
        fs::write(&path, "{not json").unwrap();
        let pref = ThemePreference::new(Some(path));
        assert_eq!(pref.get(), None);
        teardown(&dir);
    }

    #[test]
    fn test_in_memory_preference() {
        let mut pref = ThemePreference::new(None);
        pref.set(ThemeState::Dark).unwrap();
        assert_eq!(pref.current(), ThemeState::Dark);
        assert_eq!(pref.get(), None);
    }
}
