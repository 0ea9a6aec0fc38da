//! Per-effect tuning and the persisted player settings record.
//!
//! The record lives in `~/.kraken-player.toml`. Every field is optional on
//! disk; accessors fill in defaults so a missing or partial file behaves
//! like a fresh install.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const QUANTITY_RANGE: RangeInclusive<u32> = 5..=100;
pub const SIZE_RANGE: RangeInclusive<u32> = 1..=20;
pub const SPEED_RANGE: RangeInclusive<u32> = 1..=100;

const DEFAULT_VOLUME: u32 = 80;

const SETTINGS_TEMPLATE: &str = r#"# kraken-player settings

# Master volume shown in the status line (0-100)
# volume = 80

# Ambient effect: none, bubbles, rain, stars, embers, dust, snow, fireflies
# effect = "bubbles"

# Visualizer: none, bars, wave, circle
# visualizer = "none"

# shuffle = false
# Repeat mode: off, all, one
# repeat = "off"

# =============================================================================
# Per-effect tuning (quantity 5-100, size 1-20, speed 1-100)
# =============================================================================
# Missing entries fall back to the built-in defaults.
# For stars, quantity scales how often a new star appears.

# [effects.bubbles]
# quantity = 20
# size = 10
# speed = 40
"#;

/// Ambient particle styles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    None,
    Bubbles,
    Rain,
    Stars,
    Embers,
    Dust,
    Snow,
    Fireflies,
}

impl EffectKind {
    pub const COUNT: usize = 8;

    pub const ALL: [EffectKind; Self::COUNT] = [
        EffectKind::None,
        EffectKind::Bubbles,
        EffectKind::Rain,
        EffectKind::Stars,
        EffectKind::Embers,
        EffectKind::Dust,
        EffectKind::Snow,
        EffectKind::Fireflies,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Identifier used in the settings file
    pub fn id(self) -> &'static str {
        match self {
            EffectKind::None => "none",
            EffectKind::Bubbles => "bubbles",
            EffectKind::Rain => "rain",
            EffectKind::Stars => "stars",
            EffectKind::Embers => "embers",
            EffectKind::Dust => "dust",
            EffectKind::Snow => "snow",
            EffectKind::Fireflies => "fireflies",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::None => "None",
            EffectKind::Bubbles => "Bubbles",
            EffectKind::Rain => "Rain",
            EffectKind::Stars => "Shooting Stars",
            EffectKind::Embers => "Embers",
            EffectKind::Dust => "Dust",
            EffectKind::Snow => "Snow",
            EffectKind::Fireflies => "Fireflies",
        }
    }

    /// Steady-state effects hold their population at `quantity`
    pub fn is_steady_state(self) -> bool {
        !matches!(self, EffectKind::None | EffectKind::Stars)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Frequency visualizer projections
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizerMode {
    #[default]
    None,
    Bars,
    Wave,
    Circle,
}

impl VisualizerMode {
    pub const ALL: [VisualizerMode; 4] = [
        VisualizerMode::None,
        VisualizerMode::Bars,
        VisualizerMode::Wave,
        VisualizerMode::Circle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VisualizerMode::None => "None",
            VisualizerMode::Bars => "Bars",
            VisualizerMode::Wave => "Wave",
            VisualizerMode::Circle => "Circle",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Playlist repeat behaviour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// off -> all -> one -> off
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

/// Quantity, size and speed for one effect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSettings {
    pub quantity: u32,
    pub size: u32,
    pub speed: u32,
}

impl EffectSettings {
    /// Build a record, clamping every field into its slider range
    pub fn new(quantity: u32, size: u32, speed: u32) -> Self {
        Self {
            quantity: clamp_to(quantity, &QUANTITY_RANGE),
            size: clamp_to(size, &SIZE_RANGE),
            speed: clamp_to(speed, &SPEED_RANGE),
        }
    }

    pub fn defaults_for(kind: EffectKind) -> Self {
        let (quantity, size, speed) = match kind {
            EffectKind::None => (25, 8, 30),
            EffectKind::Bubbles => (20, 10, 40),
            EffectKind::Rain => (60, 8, 50),
            EffectKind::Stars => (50, 10, 50),
            EffectKind::Embers => (15, 8, 25),
            EffectKind::Dust => (30, 6, 20),
            EffectKind::Snow => (40, 10, 30),
            EffectKind::Fireflies => (12, 10, 30),
        };
        Self {
            quantity,
            size,
            speed,
        }
    }

    /// 1-20 slider mapped so that 10 is natural size
    pub fn size_scale(&self) -> f32 {
        self.size as f32 / 10.0
    }

    /// 1-100 slider mapped so that 50 is natural speed
    pub fn speed_scale(&self) -> f32 {
        self.speed as f32 / 50.0
    }
}

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

/// Exactly one settings record per effect
#[derive(Clone, Debug, PartialEq)]
pub struct EffectTable {
    entries: [EffectSettings; EffectKind::COUNT],
}

impl Default for EffectTable {
    fn default() -> Self {
        Self {
            entries: EffectKind::ALL.map(EffectSettings::defaults_for),
        }
    }
}

impl EffectTable {
    pub fn get(&self, kind: EffectKind) -> EffectSettings {
        self.entries[kind.index()]
    }

    pub fn set(&mut self, kind: EffectKind, settings: EffectSettings) {
        self.entries[kind.index()] =
            EffectSettings::new(settings.quantity, settings.size, settings.speed);
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, EffectSettings)> + '_ {
        EffectKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }
}

/// On-disk shape of one effect's record; absent fields keep the default
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StoredEffectSettings {
    pub quantity: Option<u32>,
    pub size: Option<u32>,
    pub speed: Option<u32>,
}

/// The flat settings record persisted between sessions
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PlayerSettings {
    pub volume: Option<u32>,
    pub effect: Option<EffectKind>,
    pub visualizer: Option<VisualizerMode>,
    pub shuffle: Option<bool>,
    pub repeat: Option<RepeatMode>,

    // Keyed by effect id ("bubbles", "rain", ...)
    pub effects: Option<BTreeMap<String, StoredEffectSettings>>,
}

impl PlayerSettings {
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".kraken-player.toml"))
    }

    /// Load from the default location, falling back to defaults on any error
    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            match fs::write(&path, SETTINGS_TEMPLATE) {
                Ok(()) => log::info!("Created settings template at {:?}", path),
                Err(e) => log::warn!("Could not create settings template at {:?}: {}", path, e),
            }
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            match self.save_to(&path) {
                Ok(()) => log::debug!("Settings saved to {:?}", path),
                Err(e) => log::warn!("Could not save settings: {:#}", e),
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string(self).context("encoding settings")?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }

    pub fn volume(&self) -> u32 {
        self.volume.unwrap_or(DEFAULT_VOLUME).min(100)
    }

    pub fn effect(&self) -> EffectKind {
        self.effect.unwrap_or(EffectKind::Bubbles)
    }

    pub fn visualizer(&self) -> VisualizerMode {
        self.visualizer.unwrap_or_default()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle.unwrap_or(false)
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat.unwrap_or_default()
    }

    /// Per-effect settings with saved fields layered over the defaults
    pub fn effect_table(&self) -> EffectTable {
        let mut table = EffectTable::default();
        let Some(stored) = &self.effects else {
            return table;
        };

        for (id, saved) in stored {
            let Some(kind) = EffectKind::from_id(id) else {
                log::warn!("Unknown effect '{}' in settings, skipping", id);
                continue;
            };
            let base = table.get(kind);
            table.set(
                kind,
                EffectSettings::new(
                    saved.quantity.unwrap_or(base.quantity),
                    saved.size.unwrap_or(base.size),
                    saved.speed.unwrap_or(base.speed),
                ),
            );
        }
        table
    }

    /// Store every effect's record, including ones never touched
    pub fn set_effect_table(&mut self, table: &EffectTable) {
        let stored = table
            .iter()
            .map(|(kind, s)| {
                (
                    kind.id().to_string(),
                    StoredEffectSettings {
                        quantity: Some(s.quantity),
                        size: Some(s.size),
                        speed: Some(s.speed),
                    },
                )
            })
            .collect();
        self.effects = Some(stored);
    }
}
