// ==========================================
// 考试排程系统 - 教学组织实体
// ==========================================
// 职责: 院系/专业/课程/学生主数据定义
// 红线: 冲突单位是专业(Formation),不是单个学生
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Department - 院系
// ==========================================
// 仅用于监考教师的同院系优先排序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

// ==========================================
// Formation - 专业(培养方案)
// ==========================================

/// 专业
///
/// 同一专业的全体学生默认参加该专业下所有课程的考试,
/// 因此专业是学生时间冲突的判定单位。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub id: i64,
    pub name: String,
    /// 学历层级(如 "L3"、"M1")
    pub level: String,
    /// 培养方案内预期课程数
    pub expected_module_count: i32,
    pub department_id: i64,
}

// ==========================================
// Module - 课程
// ==========================================

/// 课程
///
/// 每门课程至多一场考试(存储层唯一约束)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub name: String,
    /// 学分权重
    pub credit_weight: i32,
    pub formation_id: i64,
    /// 先修课程(可空)
    pub prerequisite_module_id: Option<i64>,
}

// ==========================================
// Student - 学生
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// 入学年份
    pub promotion_year: i32,
    pub formation_id: i64,
}

// ==========================================
// UnscheduledModule - 待排考课程视图
// ==========================================

/// 待排考课程
///
/// 排程引擎的输入单元: 课程 + 所属专业/院系 + 专业在读人数,
/// 由仓储层一次性联查得出,避免引擎内再发查询。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledModule {
    pub module_id: i64,
    pub module_name: String,
    pub formation_id: i64,
    pub department_id: i64,
    /// 专业在读学生数(考场容量判定依据)
    pub student_count: i64,
}
