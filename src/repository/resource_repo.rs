// ==========================================
// 考试排程系统 - 排考资源数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::resources::{Professor, Room};
use crate::domain::types::RoomKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// ProfessorRepository - 教师仓储
// ==========================================
pub struct ProfessorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProfessorRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入教师,返回分配的 id
    pub fn insert(
        &self,
        name: &str,
        specialty: &str,
        department_id: i64,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO professor (name, specialty, department_id)
            VALUES (?1, ?2, ?3)
            "#,
            params![name, specialty, department_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询全部教师(按 id 稳定排序,选择器在此顺序上做院系优先重排)
    pub fn list_all(&self) -> RepositoryResult<Vec<Professor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, specialty, department_id
            FROM professor
            ORDER BY id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Professor {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    specialty: row.get(2)?,
                    department_id: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<Professor>>>()?;
        Ok(rows)
    }
}

// ==========================================
// RoomRepository - 教室仓储
// ==========================================
pub struct RoomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RoomRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入教室,返回分配的 id
    pub fn insert(
        &self,
        name: &str,
        capacity: i64,
        kind: RoomKind,
        building: &str,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO room (name, capacity, kind, building)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![name, capacity, kind.to_string(), building],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询全部教室(按 id 稳定排序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, capacity, kind, building
            FROM room
            ORDER BY id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                let kind_raw: String = row.get(3)?;
                Ok(Room {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    capacity: row.get(2)?,
                    // CHECK 约束保证存储值合法,解析失败时按小教室兜底
                    kind: RoomKind::parse(&kind_raw).unwrap_or(RoomKind::Classroom),
                    building: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<Room>>>()?;
        Ok(rows)
    }
}
