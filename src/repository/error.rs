// ==========================================
// 考试排程系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 触发器拒绝消息带 CONSTRAINT_ 前缀,
//       在此还原为类型化的 ConstraintViolation
// ==========================================

use crate::domain::types::ConstraintViolation;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 硬约束拒绝 =====
    #[error("硬约束拒绝: {0}")]
    ConstraintViolation(ConstraintViolation),

    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
//
// 触发器 RAISE(ABORT, 'CONSTRAINT_XXX') 与 exam.module_id 唯一索引
// 的失败消息在此映射回五大硬约束,供编排器按候选级失败处理。
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("CONSTRAINT_INSUFFICIENT_CAPACITY") {
                    RepositoryError::ConstraintViolation(ConstraintViolation::InsufficientCapacity)
                } else if msg.contains("CONSTRAINT_STUDENT_OVERLAP") {
                    RepositoryError::ConstraintViolation(ConstraintViolation::StudentOverlap)
                } else if msg.contains("CONSTRAINT_PROFESSOR_OVERLAP") {
                    RepositoryError::ConstraintViolation(ConstraintViolation::ProfessorOverlap)
                } else if msg.contains("CONSTRAINT_ROOM_OVERLAP") {
                    RepositoryError::ConstraintViolation(ConstraintViolation::RoomOverlap)
                } else if msg.contains("UNIQUE constraint failed: exam.module_id") {
                    RepositoryError::ConstraintViolation(ConstraintViolation::DuplicateModuleExam)
                } else if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
