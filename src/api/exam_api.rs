// ==========================================
// 考试排程系统 - 考试管理 API
// ==========================================
// 职责: 考试查询(管理端/教师端/学生端)、人工增删改、KPI 统计
// 红线: 人工写入同样经存储边界约束复核,拒绝原样上抛类型化原因
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::exam::{Exam, ExamDetails, NewExam};
use crate::domain::types::ConstraintViolation;
use crate::i18n;
use crate::repository::{
    ExamFilter, ExamRepository, ProfessorLoadRow, RoomOccupancyRow,
};

// ==========================================
// ExamApi - 考试管理 API
// ==========================================

/// 考试管理API
///
/// 职责:
/// 1. 考试明细查询(全量/按院系/专业/教师过滤)
/// 2. 人工创建/修改/删除单场考试
/// 3. KPI: 教室占用、教师监考量
pub struct ExamApi {
    exam_repo: Arc<ExamRepository>,
}

impl ExamApi {
    /// 创建新的ExamApi实例
    pub fn new(exam_repo: Arc<ExamRepository>) -> Self {
        Self { exam_repo }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按过滤条件查询考试明细(管理端)
    pub fn list_exams(&self, filter: &ExamFilter) -> ApiResult<Vec<ExamDetails>> {
        Ok(self.exam_repo.list_with_details(filter)?)
    }

    /// 查询指定教师监考的考试(教师端视图)
    pub fn list_exams_by_professor(&self, professor_id: i64) -> ApiResult<Vec<ExamDetails>> {
        Ok(self.exam_repo.list_by_professor(professor_id)?)
    }

    /// 查询指定专业的考试(学生端视图)
    pub fn list_exams_by_formation(&self, formation_id: i64) -> ApiResult<Vec<ExamDetails>> {
        Ok(self.exam_repo.list_by_formation(formation_id)?)
    }

    /// 按 id 查询考试
    pub fn get_exam(&self, exam_id: i64) -> ApiResult<Exam> {
        self.exam_repo
            .find_by_id(exam_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Exam (id={})", exam_id)))
    }

    // ==========================================
    // 人工增删改
    // ==========================================

    /// 人工创建单场考试
    ///
    /// 时长必须为正;五大硬约束由存储边界复核,
    /// 拒绝时返回类型化的 ConstraintViolation。
    pub fn create_exam(&self, new_exam: &NewExam) -> ApiResult<Exam> {
        if new_exam.duration_minutes <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "考试时长必须为正数: {}",
                new_exam.duration_minutes
            )));
        }
        Ok(self.exam_repo.create(new_exam)?)
    }

    /// 人工修改单场考试(触发器同样兜底校验)
    pub fn update_exam(&self, exam: &Exam) -> ApiResult<()> {
        if exam.duration_minutes <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "考试时长必须为正数: {}",
                exam.duration_minutes
            )));
        }
        Ok(self.exam_repo.update(exam)?)
    }

    /// 删除单场考试
    pub fn delete_exam(&self, exam_id: i64) -> ApiResult<()> {
        Ok(self.exam_repo.delete(exam_id)?)
    }

    // ==========================================
    // KPI 统计
    // ==========================================

    /// KPI: 各教室考试场次
    pub fn room_occupancy(&self) -> ApiResult<Vec<RoomOccupancyRow>> {
        Ok(self.exam_repo.room_occupancy()?)
    }

    /// KPI: 各教师监考场次
    pub fn exams_per_professor(&self) -> ApiResult<Vec<ProfessorLoadRow>> {
        Ok(self.exam_repo.exams_per_professor()?)
    }
}

/// 硬约束拒绝的本地化说明(面向最终用户的提示文案)
pub fn violation_message(violation: ConstraintViolation) -> String {
    let key = match violation {
        ConstraintViolation::DuplicateModuleExam => "violation.duplicate_module_exam",
        ConstraintViolation::InsufficientCapacity => "violation.insufficient_capacity",
        ConstraintViolation::StudentOverlap => "violation.student_overlap",
        ConstraintViolation::ProfessorOverlap => "violation.professor_overlap",
        ConstraintViolation::RoomOverlap => "violation.room_overlap",
    };
    i18n::t(key)
}
