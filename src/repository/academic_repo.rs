// ==========================================
// 考试排程系统 - 教学组织数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::domain::academic::{Department, Formation, Module, Student, UnscheduledModule};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// DepartmentRepository - 院系仓储
// ==========================================
pub struct DepartmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入院系,返回分配的 id
    pub fn insert(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO department (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询全部院系(按 id 稳定排序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM department ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Department {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<Department>>>()?;
        Ok(rows)
    }
}

// ==========================================
// FormationRepository - 专业仓储
// ==========================================
pub struct FormationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FormationRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入专业,返回分配的 id
    pub fn insert(
        &self,
        name: &str,
        level: &str,
        expected_module_count: i32,
        department_id: i64,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO formation (name, level, expected_module_count, department_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![name, level, expected_module_count, department_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 id 查询专业
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Formation>> {
        let conn = self.get_conn()?;
        let formation = conn
            .query_row(
                r#"
                SELECT id, name, level, expected_module_count, department_id
                FROM formation
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Formation {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        level: row.get(2)?,
                        expected_module_count: row.get(3)?,
                        department_id: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(formation)
    }

    /// 查询全部专业(按 id 稳定排序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Formation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, level, expected_module_count, department_id
            FROM formation
            ORDER BY id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Formation {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    level: row.get(2)?,
                    expected_module_count: row.get(3)?,
                    department_id: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<Formation>>>()?;
        Ok(rows)
    }

    /// 专业在读学生数
    ///
    /// 排程容量判定的依据: 专业全体学生默认参加该专业每场考试。
    pub fn count_students(&self, formation_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM student WHERE formation_id = ?1",
            params![formation_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ==========================================
// ModuleRepository - 课程仓储
// ==========================================
pub struct ModuleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ModuleRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入课程,返回分配的 id
    pub fn insert(
        &self,
        name: &str,
        credit_weight: i32,
        formation_id: i64,
        prerequisite_module_id: Option<i64>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO module (name, credit_weight, formation_id, prerequisite_module_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![name, credit_weight, formation_id, prerequisite_module_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 id 查询课程
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Module>> {
        let conn = self.get_conn()?;
        let module = conn
            .query_row(
                r#"
                SELECT id, name, credit_weight, formation_id, prerequisite_module_id
                FROM module
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Module {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        credit_weight: row.get(2)?,
                        formation_id: row.get(3)?,
                        prerequisite_module_id: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(module)
    }

    /// 按专业查询课程列表
    pub fn list_by_formation(&self, formation_id: i64) -> RepositoryResult<Vec<Module>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, credit_weight, formation_id, prerequisite_module_id
            FROM module
            WHERE formation_id = ?1
            ORDER BY id
            "#,
        )?;
        let rows = stmt
            .query_map(params![formation_id], |row| {
                Ok(Module {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    credit_weight: row.get(2)?,
                    formation_id: row.get(3)?,
                    prerequisite_module_id: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<Module>>>()?;
        Ok(rows)
    }

    /// 查询全部尚无考试的课程(排程引擎的输入)
    ///
    /// 一次性联查出课程所属专业/院系与专业在读人数,
    /// 按课程 id 升序保证运行可复现。
    pub fn list_unscheduled(&self) -> RepositoryResult<Vec<UnscheduledModule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                m.id,
                m.name,
                m.formation_id,
                f.department_id,
                (SELECT COUNT(*) FROM student s WHERE s.formation_id = f.id) AS student_count
            FROM module m
            JOIN formation f ON f.id = m.formation_id
            WHERE m.id NOT IN (SELECT module_id FROM exam)
            ORDER BY m.id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(UnscheduledModule {
                    module_id: row.get(0)?,
                    module_name: row.get(1)?,
                    formation_id: row.get(2)?,
                    department_id: row.get(3)?,
                    student_count: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<UnscheduledModule>>>()?;
        Ok(rows)
    }
}

// ==========================================
// StudentRepository - 学生仓储
// ==========================================
pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入学生,返回分配的 id
    pub fn insert(
        &self,
        name: &str,
        promotion_year: i32,
        formation_id: i64,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO student (name, promotion_year, formation_id)
            VALUES (?1, ?2, ?3)
            "#,
            params![name, promotion_year, formation_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按专业查询学生列表
    pub fn list_by_formation(&self, formation_id: i64) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, promotion_year, formation_id
            FROM student
            WHERE formation_id = ?1
            ORDER BY id
            "#,
        )?;
        let rows = stmt
            .query_map(params![formation_id], |row| {
                Ok(Student {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    promotion_year: row.get(2)?,
                    formation_id: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<Student>>>()?;
        Ok(rows)
    }
}
