// ==========================================
// 考试排程系统 - 排考资源实体
// ==========================================
// 职责: 监考教师/教室主数据定义
// ==========================================

use crate::domain::types::RoomKind;
use serde::{Deserialize, Serialize};

// ==========================================
// Professor - 教师
// ==========================================

/// 教师
///
/// 院系归属用于软偏好排序(同院系优先监考),不构成硬约束。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: i64,
    pub name: String,
    /// 专业方向
    pub specialty: String,
    pub department_id: i64,
}

// ==========================================
// Room - 教室
// ==========================================

/// 教室
///
/// capacity 为正整数(存储层 CHECK 约束)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    pub kind: RoomKind,
    /// 所在楼栋
    pub building: String,
}

impl Room {
    /// 容量是否足以容纳指定人数
    pub fn can_seat(&self, student_count: i64) -> bool {
        self.capacity >= student_count
    }
}
