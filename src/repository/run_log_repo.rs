// ==========================================
// 考试排程系统 - 排考运行记录仓储
// ==========================================
// 职责: schedule_run 表读写,运行留痕
// ==========================================

use crate::domain::exam::ScheduleRun;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// ScheduleRunRepository - 运行记录仓储
// ==========================================
pub struct ScheduleRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRunRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 落一条运行记录
    pub fn insert(&self, run: &ScheduleRun) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO schedule_run
                (run_id, started_at, start_date, succeeded, failed, total, config_snapshot, details_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                run.run_id,
                run.started_at.format(DATETIME_FMT).to_string(),
                run.start_date.format(DATE_FMT).to_string(),
                run.succeeded,
                run.failed,
                run.total,
                run.config_snapshot,
                run.details_json,
            ],
        )?;
        Ok(())
    }

    /// 运行记录总数
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM schedule_run", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 最近若干条运行记录(按开始时间倒序)
    pub fn list_recent(&self, limit: i64) -> RepositoryResult<Vec<ScheduleRun>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, started_at, start_date, succeeded, failed, total,
                   config_snapshot, details_json
            FROM schedule_run
            ORDER BY started_at DESC, run_id
            LIMIT ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                let started_raw: String = row.get(1)?;
                let date_raw: String = row.get(2)?;
                Ok(ScheduleRun {
                    run_id: row.get(0)?,
                    started_at: NaiveDateTime::parse_from_str(&started_raw, DATETIME_FMT)
                        .unwrap_or_else(|_| {
                            NaiveDate::from_ymd_opt(1970, 1, 1)
                                .unwrap()
                                .and_hms_opt(0, 0, 0)
                                .unwrap()
                        }),
                    start_date: NaiveDate::parse_from_str(&date_raw, DATE_FMT)
                        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
                    succeeded: row.get(3)?,
                    failed: row.get(4)?,
                    total: row.get(5)?,
                    config_snapshot: row.get(6)?,
                    details_json: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<ScheduleRun>>>()?;
        Ok(rows)
    }
}
