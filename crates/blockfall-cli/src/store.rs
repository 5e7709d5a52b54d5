use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use blockfall_engine::SessionSnapshot;

use crate::util;

/// The two files a player keeps between runs: the resumable session and the
/// best score ever reached.
///
/// Reads never fail: a missing or unreadable file means there is nothing to
/// resume and the high score is 0. Writes report errors to the caller.
#[derive(Debug, Clone)]
pub(crate) struct Store {
    save_file: PathBuf,
    highscore_file: PathBuf,
}

impl Store {
    pub(crate) fn new(save_file: PathBuf, highscore_file: PathBuf) -> Self {
        Self {
            save_file,
            highscore_file,
        }
    }

    pub(crate) fn save_file(&self) -> &Path {
        &self.save_file
    }

    pub(crate) fn load_session(&self) -> Option<SessionSnapshot> {
        util::read_json_file("save", &self.save_file).ok()
    }

    pub(crate) fn save_session(&self, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        util::write_json_file("save", &self.save_file, snapshot)
    }

    /// Removes the save file. A file that is already gone is not an error.
    pub(crate) fn discard_session(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.save_file) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err).with_context(|| {
                format!("Failed to remove save file: {}", self.save_file.display())
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn load_highscore(&self) -> u64 {
        Self::read_highscore(&self.highscore_file)
    }

    pub(crate) fn read_highscore(path: &Path) -> u64 {
        fs::read_to_string(path)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Stores `score` if it beats the recorded high score.
    ///
    /// Returns whether the file was updated.
    pub(crate) fn record_highscore(&self, score: u64) -> anyhow::Result<bool> {
        if score <= self.load_highscore() {
            return Ok(false);
        }
        fs::write(&self.highscore_file, score.to_string()).with_context(|| {
            format!(
                "Failed to write high score file: {}",
                self.highscore_file.display()
            )
        })?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::Board;
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &Path) -> Store {
        Store::new(dir.join("savegame.json"), dir.join("highscore.txt"))
    }

    #[test]
    fn test_missing_files_mean_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.load_session(), None);
        assert_eq!(store.load_highscore(), 0);
        store.discard_session().unwrap();
    }

    #[test]
    fn test_session_roundtrip_and_discard() {
        let dir = TempDir::new().unwrap();
        let store = store_in(dir.path());
        let mut rows = vec![".........."; Board::ROWS];
        rows[19] = "01234.56..";
        let snapshot = SessionSnapshot {
            board: Board::parse_rows(&rows).unwrap(),
            score: 600,
            level: 2,
        };

        store.save_session(&snapshot).unwrap();
        assert_eq!(store.load_session(), Some(snapshot));

        store.discard_session().unwrap();
        assert!(!store.save_file().exists());
        assert_eq!(store.load_session(), None);
    }

    #[test]
    fn test_corrupt_save_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = store_in(dir.path());
        let save_file = dir.path().join("savegame.json");
        fs::write(&save_file, "{ \"board\": [\"...\"], \"score\": 1 }").unwrap();
        assert_eq!(store.load_session(), None);
        fs::write(&save_file, "not json").unwrap();
        assert_eq!(store.load_session(), None);
    }

    #[test]
    fn test_highscore_only_grows() {
        let dir = TempDir::new().unwrap();
        let store = store_in(dir.path());

        assert!(store.record_highscore(300).unwrap());
        assert_eq!(fs::read_to_string(dir.path().join("highscore.txt")).unwrap(), "300");
        assert!(!store.record_highscore(300).unwrap());
        assert!(!store.record_highscore(200).unwrap());
        assert_eq!(store.load_highscore(), 300);
        assert!(store.record_highscore(1200).unwrap());
        assert_eq!(store.load_highscore(), 1200);
    }

    #[test]
    fn test_garbage_highscore_reads_as_zero() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("highscore.txt"), "lots").unwrap();
        assert_eq!(store_in(dir.path()).load_highscore(), 0);

        fs::write(dir.path().join("highscore.txt"), "450\n").unwrap();
        assert_eq!(store_in(dir.path()).load_highscore(), 450);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(
            dir.path().join("no/such/dir/save.json"),
            dir.path().join("hs.txt"),
        );
        let err = store.save_session(&SessionSnapshot::default()).unwrap_err();
        assert!(format!("{err:#}").contains("save file"), "{err:#}");
    }
}
