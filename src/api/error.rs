// ==========================================
// 考试排程系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换仓储/引擎错误为用户可解释的错误
// 红线: 所有错误信息必须包含显式原因(可解释性)
// ==========================================

use crate::domain::types::ConstraintViolation;
use crate::engine::ScheduleError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 边界校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 硬约束拒绝(存储边界复核)
    // ==========================================
    #[error("硬约束拒绝: {0}")]
    ConstraintViolation(ConstraintViolation),

    // ==========================================
    // 下层错误透传
    // ==========================================
    #[error("仓储错误: {0}")]
    Repository(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

// 仓储错误 → API错误
//
// 硬约束拒绝与未找到单独映射,其余折叠为仓储错误文本。
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConstraintViolation(v) => ApiError::ConstraintViolation(v),
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            other => ApiError::Repository(other.to_string()),
        }
    }
}

// 引擎错误 → API错误
impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Config(e) => ApiError::InvalidInput(e.to_string()),
            ScheduleError::Repository(e) => ApiError::from(e),
            ScheduleError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
