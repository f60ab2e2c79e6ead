// ==========================================
// 考试排程系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、纯时间判定
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod academic;
pub mod exam;
pub mod resources;
pub mod types;

// 重导出核心类型
pub use academic::{Department, Formation, Module, Student, UnscheduledModule};
pub use exam::{
    intervals_overlap, minutes_since_midnight, CommittedExam, Exam, ExamCandidate, ExamDetails,
    NewExam, ScheduleRun,
};
pub use resources::{Professor, Room};
pub use types::{ConstraintViolation, ExamOutcome, FailureReason, RoomKind};
