//! Battlefield payload loader.
//!
//! Fields are stored as raw two-layer blobs, one file per map id. The
//! loader is deliberately lenient: a missing or unreadable file yields
//! `None`, and the engine substitutes its all-passable default field — a
//! bad map should degrade the battlefield, not abort the battle.

use std::path::PathBuf;

/// Loader for raw battlefield payloads.
pub struct FieldLoader {
    dir: PathBuf,
}

impl FieldLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path for a map id.
    pub fn path_for(&self, map: u16) -> PathBuf {
        self.dir.join(format!("field_{map:03}.bin"))
    }

    /// Reads the raw payload for a map id, or `None` when unavailable.
    pub fn payload(&self, map: u16) -> Option<Vec<u8>> {
        let path = self.path_for(map);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(
                    "battlefield payload {} unreadable ({e}); falling back to default field",
                    path.display()
                );
                None
            }
        }
    }
}
