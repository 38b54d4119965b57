//! SQLite-backed compare store.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    core::range::AlignmentWindow,
    metrics::CompareStats,
    types::{ComparedItemId, RefId, TourId},
};

use super::{
    CompareStore, NewComparedTour, PersistError, PersistResult, RefTourRow, StoredComparedTour,
};

const STATS_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatsEnvelope {
    format_version: u16,
    stats: CompareStats,
}

/// SQLite implementation of [`CompareStore`].
pub struct SqliteCompareStore {
    conn: Connection,
}

impl SqliteCompareStore {
    /// Opens or creates a store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Creates a reference tour row and returns its generated id.
    pub fn insert_ref_tour(
        &mut self,
        tour_id: TourId,
        title: &str,
        window: AlignmentWindow,
    ) -> PersistResult<RefId> {
        self.conn.execute(
            "INSERT INTO reference_tour(tour_id, title, start_index, end_index)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                tour_id,
                title,
                window.first() as i64,
                window.last() as i64
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Deletes a reference tour together with its stored comparisons.
    pub fn delete_ref_tour(&mut self, ref_id: RefId) -> PersistResult<bool> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM compared_tour WHERE ref_id = ?1",
            params![ref_id],
        )?;
        let count = tx.execute(
            "DELETE FROM reference_tour WHERE ref_id = ?1",
            params![ref_id],
        )?;
        tx.commit()?;
        Ok(count > 0)
    }
}

impl CompareStore for SqliteCompareStore {
    fn insert_compared(&mut self, row: &NewComparedTour) -> PersistResult<ComparedItemId> {
        let payload = serde_json::to_vec(&StatsEnvelope {
            format_version: STATS_FORMAT_VERSION,
            stats: row.stats,
        })?;
        self.conn.execute(
            "INSERT INTO compared_tour
                (ref_id, tour_id, year, doy, start_index, end_index, min_altitude_diff, ts_ms, stats)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                row.ref_id,
                row.tour_id,
                row.year,
                i64::from(row.doy),
                row.window.first() as i64,
                row.window.last() as i64,
                f64::from(row.min_altitude_diff),
                now_ms() as i64,
                payload,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_compared(
        &mut self,
        item_id: ComparedItemId,
        window: AlignmentWindow,
        stats: &CompareStats,
    ) -> PersistResult<()> {
        let payload = serde_json::to_vec(&StatsEnvelope {
            format_version: STATS_FORMAT_VERSION,
            stats: *stats,
        })?;
        let count = self.conn.execute(
            "UPDATE compared_tour SET start_index = ?2, end_index = ?3, stats = ?4
             WHERE item_id = ?1",
            params![
                item_id,
                window.first() as i64,
                window.last() as i64,
                payload
            ],
        )?;
        if count == 0 {
            return Err(PersistError::MissingCompared(item_id));
        }
        Ok(())
    }

    fn delete_compared(&mut self, item_id: ComparedItemId) -> PersistResult<bool> {
        let count = self.conn.execute(
            "DELETE FROM compared_tour WHERE item_id = ?1",
            params![item_id],
        )?;
        Ok(count > 0)
    }

    fn fetch_ref_tours(&self) -> PersistResult<Vec<RefTourRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT ref_id, tour_id, title, start_index, end_index
             FROM reference_tour ORDER BY ref_id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RefTourRow {
                ref_id: row.get(0)?,
                tour_id: row.get(1)?,
                title: row.get(2)?,
                start_index: row.get::<_, i64>(3)? as usize,
                end_index: row.get::<_, i64>(4)? as usize,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn fetch_compared(&self, ref_id: RefId) -> PersistResult<Vec<StoredComparedTour>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, tour_id, year, doy, start_index, end_index, min_altitude_diff, stats
             FROM compared_tour WHERE ref_id = ?1 ORDER BY item_id ASC",
        )?;

        let rows = stmt.query_map(params![ref_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i32>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, Vec<u8>>(7)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (item_id, tour_id, year, doy, start, end, min_diff, payload) = row?;
            let stats = decode_stats_payload(&payload)?;
            let window = AlignmentWindow::new(start as usize, end as usize)?;
            out.push(StoredComparedTour {
                item_id,
                ref_id,
                tour_id,
                year,
                doy: doy as u16,
                window,
                min_altitude_diff: min_diff as f32,
                stats,
            });
        }
        Ok(out)
    }
}

fn decode_stats_payload(payload: &[u8]) -> PersistResult<CompareStats> {
    let env: StatsEnvelope = serde_json::from_slice(payload)?;
    if env.format_version != STATS_FORMAT_VERSION {
        return Err(PersistError::Message(format!(
            "unsupported stats format version: {}",
            env.format_version
        )));
    }
    Ok(env.stats)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
