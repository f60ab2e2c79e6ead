// ==========================================
// 考试排程系统 - 约束校验引擎
// ==========================================
// 职责: 判定候选分配是否违反五大硬约束
// 红线: 纯函数,无副作用,固定判定顺序,首中即返
// ==========================================
// 输入: 候选分配 + 已落位考试集合(运行前持久化 ∪ 本轮已提交)
// 输出: Option<ConstraintViolation>(None 即可落位)
// ==========================================

use crate::domain::exam::{CommittedExam, ExamCandidate};
use crate::domain::types::ConstraintViolation;

// ==========================================
// ConstraintOracle - 约束校验引擎
// ==========================================
pub struct ConstraintOracle {
    // 无状态引擎,不需要注入依赖
}

impl ConstraintOracle {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 校验候选分配
    ///
    /// 判定顺序固定(首中即返,短路后续检查):
    /// 1. 课程唯一性 → DuplicateModuleExam
    /// 2. 教室容量   → InsufficientCapacity
    /// 3. 专业时间冲突 → StudentOverlap
    /// 4. 教师时间冲突 → ProfessorOverlap
    /// 5. 教室时间冲突 → RoomOverlap
    ///
    /// # 参数
    /// - candidate: 候选分配
    /// - committed: 已落位考试集合
    ///
    /// # 返回
    /// - Some(violation): 首个被违反的硬约束
    /// - None: 候选可落位
    pub fn check(
        &self,
        candidate: &ExamCandidate,
        committed: &[CommittedExam],
    ) -> Option<ConstraintViolation> {
        // 1. 课程唯一性
        if committed.iter().any(|e| e.module_id == candidate.module_id) {
            return Some(ConstraintViolation::DuplicateModuleExam);
        }

        // 2. 教室容量
        if candidate.student_count > candidate.room_capacity {
            return Some(ConstraintViolation::InsufficientCapacity);
        }

        // 3. 专业时间冲突
        if committed.iter().any(|e| {
            e.formation_id == candidate.formation_id
                && e.time_conflicts(
                    candidate.exam_date,
                    candidate.start_time,
                    candidate.duration_minutes,
                )
        }) {
            return Some(ConstraintViolation::StudentOverlap);
        }

        // 4. 教师时间冲突
        if committed.iter().any(|e| {
            e.professor_id == candidate.professor_id
                && e.time_conflicts(
                    candidate.exam_date,
                    candidate.start_time,
                    candidate.duration_minutes,
                )
        }) {
            return Some(ConstraintViolation::ProfessorOverlap);
        }

        // 5. 教室时间冲突
        if committed.iter().any(|e| {
            e.room_id == candidate.room_id
                && e.time_conflicts(
                    candidate.exam_date,
                    candidate.start_time,
                    candidate.duration_minutes,
                )
        }) {
            return Some(ConstraintViolation::RoomOverlap);
        }

        None
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ConstraintOracle {
    fn default() -> Self {
        Self::new()
    }
}
