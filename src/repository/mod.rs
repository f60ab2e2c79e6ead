// ==========================================
// 考试排程系统 - 数据仓储层(存储网关)
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入;
//       五大硬约束在存储边界由唯一索引+触发器独立兜底
// ==========================================

pub mod academic_repo;
pub mod error;
pub mod exam_repo;
pub mod resource_repo;
pub mod run_log_repo;

// 重导出核心仓储
pub use academic_repo::{
    DepartmentRepository, FormationRepository, ModuleRepository, StudentRepository,
};
pub use error::{RepositoryError, RepositoryResult};
pub use exam_repo::{ExamFilter, ExamRepository, ProfessorLoadRow, RoomOccupancyRow};
pub use resource_repo::{ProfessorRepository, RoomRepository};
pub use run_log_repo::ScheduleRunRepository;
