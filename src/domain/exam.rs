// ==========================================
// 考试排程系统 - 考试实体与冲突视图
// ==========================================
// 职责: 考试行实体、候选分配、已落位视图、时间重叠判定
// 红线: 时间重叠采用半开区间 [start, start+duration)
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

// ==========================================
// 时间工具
// ==========================================

/// 将时刻换算为当日零点起的分钟数
pub fn minutes_since_midnight(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

/// 半开区间重叠判定: startA < endB AND startB < endA
///
/// # 参数
/// - start_a/duration_a: 区间A起点(分钟)与时长(分钟)
/// - start_b/duration_b: 区间B起点(分钟)与时长(分钟)
pub fn intervals_overlap(start_a: i64, duration_a: i64, start_b: i64, duration_b: i64) -> bool {
    start_a < start_b + duration_b && start_b < start_a + duration_a
}

// ==========================================
// Exam - 考试(存储行)
// ==========================================

/// 考试
///
/// 排程引擎唯一产生的实体。单轮运行内创建后不再修改;
/// 人工修改属于外部协作方职责,由存储层触发器兜底校验。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub module_id: i64,
    pub professor_id: i64,
    pub room_id: i64,
}

/// 新建考试(无 id,交由存储层分配)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExam {
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub module_id: i64,
    pub professor_id: i64,
    pub room_id: i64,
}

// ==========================================
// CommittedExam - 已落位考试(冲突视图)
// ==========================================

/// 已落位考试
///
/// 约束校验所需的最小投影: 考试行 + 课程所属专业。
/// 本轮运行的内存已落位集合 = 运行前已持久化的考试 ∪ 本轮已提交的考试。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedExam {
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub module_id: i64,
    pub formation_id: i64,
    pub professor_id: i64,
    pub room_id: i64,
}

impl CommittedExam {
    /// 与给定日期/时段是否时间冲突
    ///
    /// 不同日期永不冲突;同一日期按半开区间判定。
    pub fn time_conflicts(&self, date: NaiveDate, start: NaiveTime, duration_minutes: i64) -> bool {
        if self.exam_date != date {
            return false;
        }
        intervals_overlap(
            minutes_since_midnight(self.start_time),
            self.duration_minutes,
            minutes_since_midnight(start),
            duration_minutes,
        )
    }
}

// ==========================================
// ExamCandidate - 候选分配
// ==========================================

/// 候选考试分配
///
/// 编排器枚举出的 (课程, 日期, 时段, 教室, 教师) 组合,
/// 交由约束校验引擎判定;通过后原样落库。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamCandidate {
    pub module_id: i64,
    pub formation_id: i64,
    /// 专业在读学生数
    pub student_count: i64,
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub professor_id: i64,
    pub room_id: i64,
    pub room_capacity: i64,
}

impl ExamCandidate {
    /// 候选通过后的已落位视图
    pub fn to_committed(&self) -> CommittedExam {
        CommittedExam {
            exam_date: self.exam_date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            module_id: self.module_id,
            formation_id: self.formation_id,
            professor_id: self.professor_id,
            room_id: self.room_id,
        }
    }

    /// 候选通过后的待落库行
    pub fn to_new_exam(&self) -> NewExam {
        NewExam {
            exam_date: self.exam_date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            module_id: self.module_id,
            professor_id: self.professor_id,
            room_id: self.room_id,
        }
    }
}

// ==========================================
// ExamDetails - 考试明细视图(展示用)
// ==========================================

/// 考试明细
///
/// 面向查询接口的联查结果: 考试行 + 课程/专业/院系/教师/教室名称。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDetails {
    pub exam_id: i64,
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub module_name: String,
    pub formation_name: String,
    pub department_name: String,
    pub professor_name: String,
    pub room_name: String,
}

// ==========================================
// ScheduleRun - 排考运行记录
// ==========================================

/// 排考运行记录
///
/// 每次非空排考运行落一行,承载运行汇总与配置快照,
/// 供事后追溯(谁在何配置下排出了什么)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRun {
    pub run_id: String,
    pub started_at: NaiveDateTime,
    pub start_date: NaiveDate,
    pub succeeded: i64,
    pub failed: i64,
    pub total: i64,
    /// 本轮生效配置的 JSON 快照
    pub config_snapshot: String,
    /// 逐课程明细的 JSON
    pub details_json: String,
}
