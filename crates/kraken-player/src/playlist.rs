//! Track list built from command-line paths, with shuffle and repeat.

use anyhow::{Context, Result};
use kraken_fx::RepeatMode;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

pub const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "flac", "wav", "ogg", "m4a", "aac", "wma", "opus"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Every audio file under `dir`, sorted by path
fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    for entry in entries {
        let path = entry.with_context(|| format!("listing {}", dir.display()))?.path();
        if path.is_dir() {
            match scan_dir(&path) {
                Ok(mut nested) => found.append(&mut nested),
                Err(e) => log::warn!("Skipping {:#}", e),
            }
        } else if is_audio_file(&path) {
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}

#[derive(Default)]
pub struct Playlist {
    tracks: Vec<PathBuf>,
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
}

impl Playlist {
    pub fn new(tracks: Vec<PathBuf>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    /// Files are taken as given if they look like audio; directories are
    /// scanned recursively. Unreadable paths are logged and skipped.
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let mut tracks = Vec::new();
        for path in paths {
            if path.is_dir() {
                match scan_dir(path) {
                    Ok(mut found) => tracks.append(&mut found),
                    Err(e) => log::warn!("Skipping {:#}", e),
                }
            } else if is_audio_file(path) && path.exists() {
                tracks.push(path.clone());
            } else {
                log::warn!("Not an audio file: {}", path.display());
            }
        }
        log::info!("Playlist: {} tracks", tracks.len());
        Self::new(tracks)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.map(|i| self.tracks[i].as_path())
    }

    /// Display title: the file name without its extension
    pub fn title(&self) -> Option<String> {
        self.current()
            .and_then(|p| p.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    /// Load the first track (a random one when shuffling)
    pub fn start<R: Rng>(&mut self, rng: &mut R) -> Option<&Path> {
        if self.is_empty() {
            return None;
        }
        let index = if self.shuffle { rng.random_range(0..self.len()) } else { 0 };
        self.select(index)
    }

    pub fn select(&mut self, index: usize) -> Option<&Path> {
        if index >= self.len() {
            return None;
        }
        self.current = Some(index);
        self.current()
    }

    pub fn next<R: Rng>(&mut self, rng: &mut R) -> Option<&Path> {
        let index = self.step(rng, 1)?;
        self.select(index)
    }

    pub fn previous<R: Rng>(&mut self, rng: &mut R) -> Option<&Path> {
        let index = self.step(rng, -1)?;
        self.select(index)
    }

    /// What plays when the current track finishes; `None` stops playback
    #[allow(dead_code)] // no decoder reports track end yet
    pub fn on_track_end<R: Rng>(&mut self, rng: &mut R) -> Option<&Path> {
        let index = self.current?;
        match self.repeat {
            RepeatMode::One => self.select(index),
            RepeatMode::All => self.next(rng),
            RepeatMode::Off if index + 1 < self.len() || self.shuffle => self.next(rng),
            RepeatMode::Off => {
                self.current = None;
                None
            }
        }
    }

    fn step<R: Rng>(&self, rng: &mut R, direction: isize) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        if self.shuffle {
            return Some(rng.random_range(0..len));
        }
        let index = match self.current {
            Some(i) => (i as isize + direction).rem_euclid(len as isize) as usize,
            None => 0,
        };
        Some(index)
    }
}
