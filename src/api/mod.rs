// ==========================================
// 考试排程系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供入口程序/外部展示层调用
// ==========================================

pub mod error;
pub mod exam_api;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use exam_api::{violation_message, ExamApi};
pub use schedule_api::{GenerateScheduleParams, ScheduleApi};
