use std::env;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::schema;
use crate::time;

/// Database file name inside the data directory.
pub const DB_FILE: &str = "baselines.db";

/// Default data directory: `~/.motion-trainer`.
pub fn default_base_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".motion-trainer")
}

/// A calibrated baseline as the caller keeps it between sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBaseline {
    pub exercise_id: String,
    pub baseline_angle: i32,
    /// UTC date the baseline was saved, `YYYY-MM-DD`.
    pub saved_at: String,
}

/// Baselines keyed by exercise id. One row per exercise; saving overwrites.
pub struct BaselineStore {
    conn: Connection,
}

impl BaselineStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        tracing::debug!("opened baseline store at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Open `<base_dir>/baselines.db`, creating the directory if needed.
    /// `None` uses [`default_base_dir`].
    pub fn open_default(base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(default_base_dir);
        std::fs::create_dir_all(&base)?;
        Self::open(&base.join(DB_FILE))
    }

    /// Record `baseline_angle` for `exercise_id`, stamped with today's date.
    pub fn save(&self, exercise_id: &str, baseline_angle: i32) -> Result<StoredBaseline> {
        self.save_dated(exercise_id, baseline_angle, &time::today())
    }

    /// Record a baseline with an explicit `YYYY-MM-DD` save date.
    pub fn save_dated(
        &self,
        exercise_id: &str,
        baseline_angle: i32,
        saved_at: &str,
    ) -> Result<StoredBaseline> {
        if motion_core::registry::get(exercise_id).is_none() {
            return Err(StoreError::InvalidData(format!(
                "unknown exercise: {exercise_id}"
            )));
        }
        if motion_core::calibration::validate_baseline(baseline_angle).is_err() {
            return Err(StoreError::InvalidData(format!(
                "baseline angle out of range: {baseline_angle}"
            )));
        }
        if !time::is_valid_date(saved_at) {
            return Err(StoreError::InvalidData(format!("bad save date: {saved_at}")));
        }
        self.conn.execute(
            "INSERT INTO baselines (exercise_id, baseline_angle, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(exercise_id) DO UPDATE SET
                 baseline_angle = excluded.baseline_angle,
                 saved_at = excluded.saved_at",
            params![exercise_id, baseline_angle, saved_at],
        )?;
        tracing::info!(exercise = exercise_id, baseline = baseline_angle, "baseline saved");
        Ok(StoredBaseline {
            exercise_id: exercise_id.to_string(),
            baseline_angle,
            saved_at: saved_at.to_string(),
        })
    }

    pub fn load(&self, exercise_id: &str) -> Result<Option<StoredBaseline>> {
        let row = self
            .conn
            .query_row(
                "SELECT exercise_id, baseline_angle, saved_at FROM baselines WHERE exercise_id = ?1",
                [exercise_id],
                Self::row_to_baseline,
            )
            .optional()?;
        Ok(row)
    }

    /// All stored baselines ordered by exercise id.
    pub fn list(&self) -> Result<Vec<StoredBaseline>> {
        let mut stmt = self.conn.prepare(
            "SELECT exercise_id, baseline_angle, saved_at FROM baselines ORDER BY exercise_id",
        )?;
        let rows = stmt
            .query_map([], Self::row_to_baseline)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Remove one exercise's baseline. Returns whether a row existed.
    pub fn clear(&self, exercise_id: &str) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM baselines WHERE exercise_id = ?1", [exercise_id])?;
        if n > 0 {
            tracing::info!(exercise = exercise_id, "baseline cleared");
        }
        Ok(n > 0)
    }

    /// Remove every stored baseline. Returns how many were removed.
    pub fn clear_all(&self) -> Result<usize> {
        let n = self.conn.execute("DELETE FROM baselines", [])?;
        tracing::info!(count = n, "all baselines cleared");
        Ok(n)
    }

    fn row_to_baseline(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredBaseline> {
        Ok(StoredBaseline {
            exercise_id: row.get(0)?,
            baseline_angle: row.get(1)?,
            saved_at: row.get(2)?,
        })
    }
}
