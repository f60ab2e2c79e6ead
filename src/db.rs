// ==========================================
// 考试排程系统 - SQLite 连接与模式初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为,避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 五大硬约束在存储边界独立兜底(唯一索引 + 触发器),
//   与引擎层校验互为双保险,人工改数同样受约束
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout(毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 触发器拒绝写入时的消息前缀,错误映射依赖该约定
pub const CONSTRAINT_MSG_PREFIX: &str = "CONSTRAINT_";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先放在系统数据目录下,取不到时退回当前目录。
pub fn get_default_db_path() -> String {
    let mut path: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("exam-scheduler");
    path.push("exam_scheduler.db");
    path.to_string_lossy().to_string()
}

/// 读取 schema_version(若表不存在则返回 None)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化全部表、唯一索引与约束触发器(幂等)
///
/// 存储层约束与排程引擎的五大硬约束一一对应:
/// 1. 一门课程至多一场考试     → exam.module_id 唯一索引
/// 2. 教室容量 ≥ 专业在读人数  → BEFORE INSERT/UPDATE 触发器
/// 3. 同专业考试时间不重叠     → BEFORE INSERT/UPDATE 触发器
/// 4. 同教师考试时间不重叠     → BEFORE INSERT/UPDATE 触发器
/// 5. 同教室考试时间不重叠     → BEFORE INSERT/UPDATE 触发器
///
/// 时间重叠判定为同日半开区间: startA < endB AND startB < endA,
/// start_time 存 'HH:MM' 文本,触发器内换算为当日分钟数比较。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

// 表结构与触发器 DDL
//
// 触发器拒绝消息统一为 CONSTRAINT_ 前缀 + 违反类型,
// 仓储层错误映射按该消息还原出类型化的 ConstraintViolation。
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_scope (
    scope_id TEXT PRIMARY KEY,
    scope_type TEXT NOT NULL,
    scope_key TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(scope_type, scope_key)
);

INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
VALUES ('global', 'GLOBAL', 'global');

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS department (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS formation (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    level TEXT NOT NULL,
    expected_module_count INTEGER NOT NULL DEFAULT 0,
    department_id INTEGER NOT NULL REFERENCES department(id)
);

CREATE TABLE IF NOT EXISTS module (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    credit_weight INTEGER NOT NULL DEFAULT 0,
    formation_id INTEGER NOT NULL REFERENCES formation(id),
    prerequisite_module_id INTEGER REFERENCES module(id)
);

CREATE TABLE IF NOT EXISTS professor (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    specialty TEXT NOT NULL DEFAULT '',
    department_id INTEGER NOT NULL REFERENCES department(id)
);

CREATE TABLE IF NOT EXISTS student (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    promotion_year INTEGER NOT NULL DEFAULT 0,
    formation_id INTEGER NOT NULL REFERENCES formation(id)
);

CREATE TABLE IF NOT EXISTS room (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    capacity INTEGER NOT NULL CHECK (capacity > 0),
    kind TEXT NOT NULL CHECK (kind IN ('LECTURE_HALL', 'CLASSROOM')),
    building TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS exam (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    exam_date TEXT NOT NULL,
    start_time TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
    module_id INTEGER NOT NULL REFERENCES module(id),
    professor_id INTEGER NOT NULL REFERENCES professor(id),
    room_id INTEGER NOT NULL REFERENCES room(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_exam_module_unique ON exam(module_id);
CREATE INDEX IF NOT EXISTS idx_exam_date ON exam(exam_date);

CREATE TABLE IF NOT EXISTS schedule_run (
    run_id TEXT PRIMARY KEY,
    started_at TEXT NOT NULL,
    start_date TEXT NOT NULL,
    succeeded INTEGER NOT NULL,
    failed INTEGER NOT NULL,
    total INTEGER NOT NULL,
    config_snapshot TEXT NOT NULL,
    details_json TEXT NOT NULL
);

-- 约束2: 教室容量 ≥ 专业在读人数
CREATE TRIGGER IF NOT EXISTS trg_exam_capacity_insert
BEFORE INSERT ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_INSUFFICIENT_CAPACITY')
    WHERE (
        SELECT COUNT(*)
        FROM student s
        JOIN module m ON m.formation_id = s.formation_id
        WHERE m.id = NEW.module_id
    ) > (SELECT r.capacity FROM room r WHERE r.id = NEW.room_id);
END;

CREATE TRIGGER IF NOT EXISTS trg_exam_capacity_update
BEFORE UPDATE ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_INSUFFICIENT_CAPACITY')
    WHERE (
        SELECT COUNT(*)
        FROM student s
        JOIN module m ON m.formation_id = s.formation_id
        WHERE m.id = NEW.module_id
    ) > (SELECT r.capacity FROM room r WHERE r.id = NEW.room_id);
END;

-- 约束3: 同专业考试时间不重叠
CREATE TRIGGER IF NOT EXISTS trg_exam_student_overlap_insert
BEFORE INSERT ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_STUDENT_OVERLAP')
    WHERE EXISTS (
        SELECT 1
        FROM exam e
        JOIN module m1 ON m1.id = e.module_id
        JOIN module m2 ON m2.id = NEW.module_id
        WHERE e.exam_date = NEW.exam_date
          AND m1.formation_id = m2.formation_id
          AND (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(NEW.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(e.start_time, 4, 2) AS INTEGER)) + e.duration_minutes
          AND (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(e.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(NEW.start_time, 4, 2) AS INTEGER)) + NEW.duration_minutes
    );
END;

CREATE TRIGGER IF NOT EXISTS trg_exam_student_overlap_update
BEFORE UPDATE ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_STUDENT_OVERLAP')
    WHERE EXISTS (
        SELECT 1
        FROM exam e
        JOIN module m1 ON m1.id = e.module_id
        JOIN module m2 ON m2.id = NEW.module_id
        WHERE e.id <> OLD.id
          AND e.exam_date = NEW.exam_date
          AND m1.formation_id = m2.formation_id
          AND (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(NEW.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(e.start_time, 4, 2) AS INTEGER)) + e.duration_minutes
          AND (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(e.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(NEW.start_time, 4, 2) AS INTEGER)) + NEW.duration_minutes
    );
END;

-- 约束4: 同教师考试时间不重叠
CREATE TRIGGER IF NOT EXISTS trg_exam_professor_overlap_insert
BEFORE INSERT ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_PROFESSOR_OVERLAP')
    WHERE EXISTS (
        SELECT 1
        FROM exam e
        WHERE e.exam_date = NEW.exam_date
          AND e.professor_id = NEW.professor_id
          AND (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(NEW.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(e.start_time, 4, 2) AS INTEGER)) + e.duration_minutes
          AND (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(e.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(NEW.start_time, 4, 2) AS INTEGER)) + NEW.duration_minutes
    );
END;

CREATE TRIGGER IF NOT EXISTS trg_exam_professor_overlap_update
BEFORE UPDATE ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_PROFESSOR_OVERLAP')
    WHERE EXISTS (
        SELECT 1
        FROM exam e
        WHERE e.id <> OLD.id
          AND e.exam_date = NEW.exam_date
          AND e.professor_id = NEW.professor_id
          AND (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(NEW.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(e.start_time, 4, 2) AS INTEGER)) + e.duration_minutes
          AND (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(e.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(NEW.start_time, 4, 2) AS INTEGER)) + NEW.duration_minutes
    );
END;

-- 约束5: 同教室考试时间不重叠
CREATE TRIGGER IF NOT EXISTS trg_exam_room_overlap_insert
BEFORE INSERT ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_ROOM_OVERLAP')
    WHERE EXISTS (
        SELECT 1
        FROM exam e
        WHERE e.exam_date = NEW.exam_date
          AND e.room_id = NEW.room_id
          AND (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(NEW.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(e.start_time, 4, 2) AS INTEGER)) + e.duration_minutes
          AND (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(e.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(NEW.start_time, 4, 2) AS INTEGER)) + NEW.duration_minutes
    );
END;

CREATE TRIGGER IF NOT EXISTS trg_exam_room_overlap_update
BEFORE UPDATE ON exam
BEGIN
    SELECT RAISE(ABORT, 'CONSTRAINT_ROOM_OVERLAP')
    WHERE EXISTS (
        SELECT 1
        FROM exam e
        WHERE e.id <> OLD.id
          AND e.exam_date = NEW.exam_date
          AND e.room_id = NEW.room_id
          AND (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(NEW.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(e.start_time, 4, 2) AS INTEGER)) + e.duration_minutes
          AND (CAST(substr(e.start_time, 1, 2) AS INTEGER) * 60
               + CAST(substr(e.start_time, 4, 2) AS INTEGER))
              < (CAST(substr(NEW.start_time, 1, 2) AS INTEGER) * 60
                 + CAST(substr(NEW.start_time, 4, 2) AS INTEGER)) + NEW.duration_minutes
    );
END;
"#;

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        // 再次初始化不报错
        init_schema(&conn).unwrap();

        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }

    #[test]
    fn test_schema_version_absent_without_init() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }
}
