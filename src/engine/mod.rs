// ==========================================
// 考试排程系统 - 引擎层
// ==========================================
// 职责: 实现排考业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有判定必须输出类型化 reason
// ==========================================

pub mod oracle;
pub mod orchestrator;
pub mod repositories;
pub mod selector;
pub mod slots;

// 重导出核心引擎
pub use oracle::ConstraintOracle;
pub use orchestrator::{
    ModuleScheduleDetail, ScheduleError, ScheduleOrchestrator, ScheduleResult,
};
pub use repositories::SchedulingRepositories;
pub use selector::ResourceSelector;
pub use slots::SlotGenerator;
