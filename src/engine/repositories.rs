// ==========================================
// 考试排程系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合排考编排器所需的全部 Repository
// 目标: 减少编排器的构造函数参数数量,便于注入与测试
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    ExamRepository, ModuleRepository, ProfessorRepository, RoomRepository, ScheduleRunRepository,
};

/// 排考引擎仓储集合
///
/// 聚合编排器所需的全部 Repository,简化依赖注入。
#[derive(Clone)]
pub struct SchedulingRepositories {
    /// 课程仓储
    pub module_repo: Arc<ModuleRepository>,
    /// 教师仓储
    pub professor_repo: Arc<ProfessorRepository>,
    /// 教室仓储
    pub room_repo: Arc<RoomRepository>,
    /// 考试仓储
    pub exam_repo: Arc<ExamRepository>,
    /// 运行记录仓储
    pub run_log_repo: Arc<ScheduleRunRepository>,
}

impl SchedulingRepositories {
    /// 创建新的仓储集合
    pub fn new(
        module_repo: Arc<ModuleRepository>,
        professor_repo: Arc<ProfessorRepository>,
        room_repo: Arc<RoomRepository>,
        exam_repo: Arc<ExamRepository>,
        run_log_repo: Arc<ScheduleRunRepository>,
    ) -> Self {
        Self {
            module_repo,
            professor_repo,
            room_repo,
            exam_repo,
            run_log_repo,
        }
    }

    /// 从共享连接一次性构建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            module_repo: Arc::new(ModuleRepository::from_connection(conn.clone())),
            professor_repo: Arc::new(ProfessorRepository::from_connection(conn.clone())),
            room_repo: Arc::new(RoomRepository::from_connection(conn.clone())),
            exam_repo: Arc::new(ExamRepository::from_connection(conn.clone())),
            run_log_repo: Arc::new(ScheduleRunRepository::from_connection(conn)),
        }
    }
}
