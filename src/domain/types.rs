// ==========================================
// 考试排程系统 - 领域类型定义
// ==========================================
// 红线: 约束判定输出类型化 reason,不输出裸字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 教室类型 (Room Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomKind {
    LectureHall, // 阶梯教室(大)
    Classroom,   // 普通教室(小)
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomKind::LectureHall => write!(f, "LECTURE_HALL"),
            RoomKind::Classroom => write!(f, "CLASSROOM"),
        }
    }
}

impl RoomKind {
    /// 从数据库字符串解析教室类型
    ///
    /// # 参数
    /// - s: 数据库存储值
    ///
    /// # 返回
    /// - Some(RoomKind): 合法值
    /// - None: 非法值
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LECTURE_HALL" => Some(RoomKind::LectureHall),
            "CLASSROOM" => Some(RoomKind::Classroom),
            _ => None,
        }
    }
}

// ==========================================
// 硬约束违反类型 (Constraint Violation)
// ==========================================
// 五大硬约束,与存储层触发器一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintViolation {
    DuplicateModuleExam,  // 课程已有考试(唯一性)
    InsufficientCapacity, // 教室容量不足
    StudentOverlap,       // 同专业学生时间冲突
    ProfessorOverlap,     // 监考教师时间冲突
    RoomOverlap,          // 教室时间冲突
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::DuplicateModuleExam => write!(f, "DUPLICATE_MODULE_EXAM"),
            ConstraintViolation::InsufficientCapacity => write!(f, "INSUFFICIENT_CAPACITY"),
            ConstraintViolation::StudentOverlap => write!(f, "STUDENT_OVERLAP"),
            ConstraintViolation::ProfessorOverlap => write!(f, "PROFESSOR_OVERLAP"),
            ConstraintViolation::RoomOverlap => write!(f, "ROOM_OVERLAP"),
        }
    }
}

// ==========================================
// 课程级失败原因 (Failure Reason)
// ==========================================
// 与候选级违反不同: 失败原因终结该课程在本轮的搜索
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    NoRoomWithCapacity, // 不存在容量足够的教室,无需搜索时段
    NoFeasibleSlot,     // 候选空间耗尽,视野内无可行时段
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoRoomWithCapacity => write!(f, "NO_ROOM_WITH_CAPACITY"),
            FailureReason::NoFeasibleSlot => write!(f, "NO_FEASIBLE_SLOT"),
        }
    }
}

// ==========================================
// 单课程排考结果类型 (Exam Outcome)
// ==========================================
// 状态机: Unscheduled → {Scheduled | Failed(reason)},单轮内终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamOutcome {
    Scheduled,
    Failed,
}

impl fmt::Display for ExamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamOutcome::Scheduled => write!(f, "SCHEDULED"),
            ExamOutcome::Failed => write!(f, "FAILED"),
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_kind_roundtrip() {
        assert_eq!(RoomKind::parse("LECTURE_HALL"), Some(RoomKind::LectureHall));
        assert_eq!(RoomKind::parse("CLASSROOM"), Some(RoomKind::Classroom));
        assert_eq!(RoomKind::parse("AMPHI"), None);
        assert_eq!(RoomKind::LectureHall.to_string(), "LECTURE_HALL");
    }

    #[test]
    fn test_violation_display() {
        assert_eq!(
            ConstraintViolation::StudentOverlap.to_string(),
            "STUDENT_OVERLAP"
        );
        assert_eq!(
            ConstraintViolation::DuplicateModuleExam.to_string(),
            "DUPLICATE_MODULE_EXAM"
        );
    }

    #[test]
    fn test_failure_reason_serde() {
        let json = serde_json::to_string(&FailureReason::NoFeasibleSlot).unwrap();
        assert_eq!(json, "\"NO_FEASIBLE_SLOT\"");
    }
}
