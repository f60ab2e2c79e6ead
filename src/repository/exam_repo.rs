// ==========================================
// 考试排程系统 - 考试数据仓储
// ==========================================
// 职责: exam 表读写 + 面向展示的联查/KPI
// 红线: 写入路径不绕过存储层约束触发器,
//       触发器拒绝经错误映射返回类型化 ConstraintViolation
// ==========================================

use crate::domain::exam::{CommittedExam, Exam, ExamDetails, NewExam};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 日期列存储格式
const DATE_FMT: &str = "%Y-%m-%d";
/// 时刻列存储格式(触发器按 'HH:MM' 截取换算分钟数)
const TIME_FMT: &str = "%H:%M";

// ==========================================
// ExamFilter - 动态查询过滤条件
// ==========================================

/// 考试查询过滤条件(全部可选,按需拼接 WHERE)
#[derive(Debug, Clone, Default)]
pub struct ExamFilter {
    pub department_id: Option<i64>,
    pub formation_id: Option<i64>,
    pub professor_id: Option<i64>,
}

// ==========================================
// 聚合统计行
// ==========================================

/// 教室占用统计(KPI)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOccupancyRow {
    pub room_name: String,
    pub exam_count: i64,
}

/// 教师监考量统计(KPI)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessorLoadRow {
    pub professor_name: String,
    pub exam_count: i64,
}

// ==========================================
// ExamRepository - 考试仓储
// ==========================================
pub struct ExamRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ExamRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入路径
    // ==========================================

    /// 创建考试
    ///
    /// 存储层在此独立复核五大硬约束(唯一索引 + 触发器);
    /// 被拒绝时返回 RepositoryError::ConstraintViolation,
    /// 调用方(编排器)将其视为候选级失败继续搜索。
    pub fn create(&self, new_exam: &NewExam) -> RepositoryResult<Exam> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO exam (exam_date, start_time, duration_minutes, module_id, professor_id, room_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                new_exam.exam_date.format(DATE_FMT).to_string(),
                new_exam.start_time.format(TIME_FMT).to_string(),
                new_exam.duration_minutes,
                new_exam.module_id,
                new_exam.professor_id,
                new_exam.room_id,
            ],
        )?;

        Ok(Exam {
            id: conn.last_insert_rowid(),
            exam_date: new_exam.exam_date,
            start_time: new_exam.start_time,
            duration_minutes: new_exam.duration_minutes,
            module_id: new_exam.module_id,
            professor_id: new_exam.professor_id,
            room_id: new_exam.room_id,
        })
    }

    /// 更新考试(人工改考路径,触发器同样兜底校验)
    pub fn update(&self, exam: &Exam) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE exam
            SET exam_date = ?1, start_time = ?2, duration_minutes = ?3,
                module_id = ?4, professor_id = ?5, room_id = ?6
            WHERE id = ?7
            "#,
            params![
                exam.exam_date.format(DATE_FMT).to_string(),
                exam.start_time.format(TIME_FMT).to_string(),
                exam.duration_minutes,
                exam.module_id,
                exam.professor_id,
                exam.room_id,
                exam.id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Exam".to_string(),
                id: exam.id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除考试
    pub fn delete(&self, exam_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM exam WHERE id = ?1", params![exam_id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Exam".to_string(),
                id: exam_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 读取路径
    // ==========================================

    /// 按 id 查询考试
    pub fn find_by_id(&self, exam_id: i64) -> RepositoryResult<Option<Exam>> {
        let conn = self.get_conn()?;
        let exam = conn
            .query_row(
                r#"
                SELECT id, exam_date, start_time, duration_minutes, module_id, professor_id, room_id
                FROM exam
                WHERE id = ?1
                "#,
                params![exam_id],
                map_exam_row,
            )
            .optional()?;
        Ok(exam)
    }

    /// 考试总数
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM exam", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 查询全部已落位考试(冲突视图)
    ///
    /// 联查课程取得所属专业,供约束校验引擎构建三类冲突集。
    pub fn list_committed(&self) -> RepositoryResult<Vec<CommittedExam>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.exam_date, e.start_time, e.duration_minutes,
                   e.module_id, m.formation_id, e.professor_id, e.room_id
            FROM exam e
            JOIN module m ON m.id = e.module_id
            ORDER BY e.exam_date, e.start_time, e.id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                let date_raw: String = row.get(0)?;
                let time_raw: String = row.get(1)?;
                Ok(CommittedExam {
                    exam_date: parse_date(&date_raw),
                    start_time: parse_time(&time_raw),
                    duration_minutes: row.get(2)?,
                    module_id: row.get(3)?,
                    formation_id: row.get(4)?,
                    professor_id: row.get(5)?,
                    room_id: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<CommittedExam>>>()?;
        Ok(rows)
    }

    /// 按过滤条件查询考试明细(管理端列表)
    pub fn list_with_details(&self, filter: &ExamFilter) -> RepositoryResult<Vec<ExamDetails>> {
        let conn = self.get_conn()?;

        let mut sql = String::from(
            r#"
            SELECT e.id, e.exam_date, e.start_time, e.duration_minutes,
                   m.name, f.name, d.name, p.name, r.name
            FROM exam e
            JOIN module m ON m.id = e.module_id
            JOIN formation f ON f.id = m.formation_id
            JOIN department d ON d.id = f.department_id
            JOIN professor p ON p.id = e.professor_id
            JOIN room r ON r.id = e.room_id
            WHERE 1=1
            "#,
        );

        // 按提供的过滤条件拼接 WHERE(参数化)
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(department_id) = filter.department_id {
            sql.push_str(&format!(" AND f.department_id = ?{}", bind_values.len() + 1));
            bind_values.push(Value::Integer(department_id));
        }
        if let Some(formation_id) = filter.formation_id {
            sql.push_str(&format!(" AND f.id = ?{}", bind_values.len() + 1));
            bind_values.push(Value::Integer(formation_id));
        }
        if let Some(professor_id) = filter.professor_id {
            sql.push_str(&format!(" AND p.id = ?{}", bind_values.len() + 1));
            bind_values.push(Value::Integer(professor_id));
        }
        sql.push_str(" ORDER BY e.exam_date, e.start_time, e.id");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(bind_values.into_iter()), map_details_row)?
            .collect::<SqliteResult<Vec<ExamDetails>>>()?;
        Ok(rows)
    }

    /// 查询指定教师监考的考试明细(教师端视图)
    pub fn list_by_professor(&self, professor_id: i64) -> RepositoryResult<Vec<ExamDetails>> {
        self.list_with_details(&ExamFilter {
            professor_id: Some(professor_id),
            ..ExamFilter::default()
        })
    }

    /// 查询指定专业的考试明细(学生端视图)
    pub fn list_by_formation(&self, formation_id: i64) -> RepositoryResult<Vec<ExamDetails>> {
        self.list_with_details(&ExamFilter {
            formation_id: Some(formation_id),
            ..ExamFilter::default()
        })
    }

    // ==========================================
    // KPI 统计
    // ==========================================

    /// 各教室考试场次(含零场次教室,按场次降序)
    pub fn room_occupancy(&self) -> RepositoryResult<Vec<RoomOccupancyRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.name, COUNT(e.id) AS exam_count
            FROM room r
            LEFT JOIN exam e ON e.room_id = r.id
            GROUP BY r.id, r.name
            ORDER BY exam_count DESC, r.id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RoomOccupancyRow {
                    room_name: row.get(0)?,
                    exam_count: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<RoomOccupancyRow>>>()?;
        Ok(rows)
    }

    /// 各教师监考场次(含零场次教师,按场次降序)
    pub fn exams_per_professor(&self) -> RepositoryResult<Vec<ProfessorLoadRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT p.name, COUNT(e.id) AS exam_count
            FROM professor p
            LEFT JOIN exam e ON e.professor_id = p.id
            GROUP BY p.id, p.name
            ORDER BY exam_count DESC, p.id
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ProfessorLoadRow {
                    professor_name: row.get(0)?,
                    exam_count: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<ProfessorLoadRow>>>()?;
        Ok(rows)
    }
}

// ==========================================
// 行映射辅助
// ==========================================

fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, DATE_FMT)
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

fn parse_time(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, TIME_FMT)
        .unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}

fn map_exam_row(row: &Row<'_>) -> SqliteResult<Exam> {
    let date_raw: String = row.get(1)?;
    let time_raw: String = row.get(2)?;
    Ok(Exam {
        id: row.get(0)?,
        exam_date: parse_date(&date_raw),
        start_time: parse_time(&time_raw),
        duration_minutes: row.get(3)?,
        module_id: row.get(4)?,
        professor_id: row.get(5)?,
        room_id: row.get(6)?,
    })
}

fn map_details_row(row: &Row<'_>) -> SqliteResult<ExamDetails> {
    let date_raw: String = row.get(1)?;
    let time_raw: String = row.get(2)?;
    Ok(ExamDetails {
        exam_id: row.get(0)?,
        exam_date: parse_date(&date_raw),
        start_time: parse_time(&time_raw),
        duration_minutes: row.get(3)?,
        module_name: row.get(4)?,
        formation_name: row.get(5)?,
        department_name: row.get(6)?,
        professor_name: row.get(7)?,
        room_name: row.get(8)?,
    })
}
