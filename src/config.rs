use crate::model::{DEFAULT_HOLE_COUNT, MAX_HOLE_COUNT};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) hole_count: usize,
    pub(crate) respawn_delay_ms: u64,
    pub(crate) round_secs: u64,
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    /// Fixed seed for reproducible frog placement; entropy when unset.
    pub(crate) seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hole_count: DEFAULT_HOLE_COUNT,
            respawn_delay_ms: 700,
            round_secs: 20,
            fps_cap: 30,
            enable_color: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Pulls every field back into its supported range.
    pub(crate) fn sanitized(mut self) -> Self {
        if self.hole_count == 0 {
            self.hole_count = DEFAULT_HOLE_COUNT;
        }
        self.hole_count = self.hole_count.min(MAX_HOLE_COUNT);
        self.respawn_delay_ms = self.respawn_delay_ms.clamp(50, 10_000);
        self.round_secs = self.round_secs.clamp(1, 600);
        self.fps_cap = self.fps_cap.clamp(10, 240);
        self
    }

    pub(crate) fn rules(&self) -> Rules {
        Rules {
            hole_count: self.hole_count,
            respawn_delay: Duration::from_millis(self.respawn_delay_ms),
            round_duration: Duration::from_secs(self.round_secs),
        }
    }
}

/// Timing and board size the game controller runs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rules {
    pub(crate) hole_count: usize,
    pub(crate) respawn_delay: Duration,
    pub(crate) round_duration: Duration,
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "whackafrog", "Whackafrog")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data directory {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("whackafrog.log"),
    })
}

/// Where the settings in use came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SettingsOrigin {
    File,
    Missing,
    /// The file exists but could not be parsed; it is left alone for the user to fix.
    Malformed,
}

pub(crate) fn load_settings(path: &Path) -> (Settings, SettingsOrigin) {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return (Settings::default(), SettingsOrigin::Missing),
    };
    match serde_json::from_str::<Settings>(&raw) {
        Ok(s) => (s.sanitized(), SettingsOrigin::File),
        Err(e) => {
            warn!("ignoring malformed settings at {}: {}", path.display(), e);
            (Settings::default(), SettingsOrigin::Malformed)
        }
    }
}

/// Writes settings back on exit unless that would clobber a file we could not read.
/// Returns whether anything was written.
pub(crate) fn persist_settings(path: &Path, s: &Settings, origin: SettingsOrigin) -> Result<bool> {
    if origin == SettingsOrigin::Malformed {
        warn!("not overwriting malformed settings at {}", path.display());
        return Ok(false);
    }
    save_settings_atomic(path, s)?;
    Ok(true)
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("could not write {}", tmp.display()))?;
    if path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
