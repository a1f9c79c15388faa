use crate::config::AppPaths;
use crate::domain::FarmState;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

const PUSH_DELAY_MS: u64 = 800;
const PULL_DELAY_MS: u64 = 1200;

pub fn farm_file_path(paths: &AppPaths) -> PathBuf {
    paths.data_dir.join("farm.json")
}

/// Loads the working state; a missing file is an empty farm.
pub fn load_state(paths: &AppPaths) -> Result<FarmState> {
    let path = farm_file_path(paths);
    if !path.exists() {
        return Ok(FarmState::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn save_state(paths: &AppPaths, state: &FarmState) -> Result<()> {
    fs::create_dir_all(&paths.data_dir)
        .with_context(|| format!("Failed to create data dir {}", paths.data_dir.display()))?;

    let json = serde_json::to_string_pretty(state)?;
    atomic_write(&farm_file_path(paths), json.as_bytes())
}

fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .context("atomic_write requires a parent dir")?;

    let tmp = parent.join(format!(
        ".{}.tmp",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("farmbook")
    ));

    {
        let mut f = fs::File::create(&tmp)
            .with_context(|| format!("Failed to create temp file {}", tmp.display()))?;
        f.write_all(contents)
            .with_context(|| format!("Failed to write temp file {}", tmp.display()))?;
        f.sync_all()
            .with_context(|| format!("Failed to sync temp file {}", tmp.display()))?;
    }

    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Identity keys are case-insensitive and whitespace-trimmed.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Simulated cloud storage: a local SQLite key-value table holding one full
/// state blob per identity. Last write wins, whole state replaced at once.
pub struct CloudStore {
    conn: Connection,
}

impl CloudStore {
    pub fn open(paths: &AppPaths) -> Result<(Self, PathBuf)> {
        fs::create_dir_all(&paths.data_dir)
            .with_context(|| format!("Failed to create data dir {}", paths.data_dir.display()))?;

        let db_path = paths.data_dir.join("cloud.sqlite3");
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open DB {}", db_path.display()))?;

        let store = Self { conn };
        store.migrate()?;
        Ok((store, db_path))
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS farm_states (
                identity TEXT PRIMARY KEY,
                payload_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub fn push_state(
        &self,
        identity: &str,
        state: &FarmState,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let key = normalize_identity(identity);
        let json = serde_json::to_string(state)?;

        simulate_latency(PUSH_DELAY_MS, "Pushing farm data to the cloud...");

        self.conn.execute(
            r#"
            INSERT INTO farm_states (identity, payload_json, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(identity) DO UPDATE SET
                payload_json = excluded.payload_json,
                updated_at = excluded.updated_at
            "#,
            params![key, json, now.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn pull_state(&self, identity: &str) -> Result<Option<FarmState>> {
        let key = normalize_identity(identity);

        simulate_latency(PULL_DELAY_MS, "Pulling farm data from the cloud...");

        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT payload_json FROM farm_states WHERE identity = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = row else {
            return Ok(None);
        };

        let state: FarmState =
            serde_json::from_str(&json).context("Invalid payload_json in farm_states")?;
        Ok(Some(state))
    }
}

/// Pretends the KV store sits behind a network. FARMBOOK_NET_DELAY_MS
/// overrides the built-in delay; tests set it to 0.
fn simulate_latency(default_ms: u64, msg: &str) {
    let ms = std::env::var("FARMBOOK_NET_DELAY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_ms);
    if ms == 0 {
        return;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(msg.to_string());

    std::thread::sleep(Duration::from_millis(ms));
    pb.finish_and_clear();
}
