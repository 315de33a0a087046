use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::parser::impact::ImpactLevel;
use crate::parser::Event;

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {path}"))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS snapshots (
            id          INTEGER PRIMARY KEY,
            source_url  TEXT NOT NULL,
            fetched_at  TEXT NOT NULL,
            event_count INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_snapshots_fetched ON snapshots(fetched_at);

        CREATE TABLE IF NOT EXISTS snapshot_events (
            snapshot_id INTEGER NOT NULL REFERENCES snapshots(id) ON DELETE CASCADE,
            position    INTEGER NOT NULL,
            date        TEXT,
            time        TEXT,
            currency    TEXT NOT NULL,
            event       TEXT NOT NULL,
            impact      TEXT NOT NULL CHECK(impact IN ('High','Medium','Low','Holiday')),
            actual      TEXT NOT NULL,
            forecast    TEXT NOT NULL,
            previous    TEXT NOT NULL,
            PRIMARY KEY (snapshot_id, position)
        );
        ",
    )?;
    Ok(())
}

pub struct Snapshot {
    pub id: i64,
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
    pub events: Vec<Event>,
}

impl Snapshot {
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.fetched_at
    }
}

/// Store one parsed calendar. Events keep their output order via `position`.
pub fn save_snapshot(
    conn: &Connection,
    source_url: &str,
    fetched_at: DateTime<Utc>,
    events: &[Event],
) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO snapshots (source_url, fetched_at, event_count) VALUES (?1, ?2, ?3)",
        rusqlite::params![source_url, fetched_at.to_rfc3339(), events.len() as i64],
    )?;
    let id = tx.last_insert_rowid();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO snapshot_events
             (snapshot_id, position, date, time, currency, event, impact, actual, forecast, previous)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for (pos, e) in events.iter().enumerate() {
            stmt.execute(rusqlite::params![
                id, pos as i64, e.date, e.time, e.currency, e.event,
                e.impact.as_str(), e.actual, e.forecast, e.previous,
            ])?;
        }
    }
    tx.commit()?;
    Ok(id)
}

pub fn latest_snapshot(conn: &Connection) -> Result<Option<Snapshot>> {
    latest_matching(conn, None)
}

/// Latest snapshot taken from `source_url`.
pub fn latest_snapshot_for(conn: &Connection, source_url: &str) -> Result<Option<Snapshot>> {
    latest_matching(conn, Some(source_url))
}

fn latest_matching(conn: &Connection, source_url: Option<&str>) -> Result<Option<Snapshot>> {
    let head = conn
        .query_row(
            "SELECT id, source_url, fetched_at FROM snapshots
             WHERE ?1 IS NULL OR source_url = ?1
             ORDER BY fetched_at DESC, id DESC LIMIT 1",
            [source_url],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
        )
        .optional()?;

    let Some((id, source_url, fetched_at)) = head else {
        return Ok(None);
    };
    let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
        .with_context(|| format!("Bad fetched_at on snapshot {id}: {fetched_at}"))?
        .with_timezone(&Utc);

    Ok(Some(Snapshot {
        id,
        source_url,
        fetched_at,
        events: load_events(conn, id)?,
    }))
}

fn load_events(conn: &Connection, snapshot_id: i64) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT date, time, currency, event, impact, actual, forecast, previous
         FROM snapshot_events WHERE snapshot_id = ?1 ORDER BY position",
    )?;
    let rows = stmt
        .query_map([snapshot_id], |row| {
            Ok((
                Event {
                    date: row.get(0)?,
                    time: row.get(1)?,
                    currency: row.get(2)?,
                    event: row.get(3)?,
                    impact: ImpactLevel::default(),
                    actual: row.get(5)?,
                    forecast: row.get(6)?,
                    previous: row.get(7)?,
                },
                row.get::<_, String>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(mut event, impact)| -> Result<Event> {
            event.impact = impact.parse::<ImpactLevel>().map_err(|e| anyhow!(e))?;
            Ok(event)
        })
        .collect()
}
