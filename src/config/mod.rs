// ==========================================
// 考试排程系统 - 配置层
// ==========================================
// 职责: 排考配置结构体 + 边界校验 + 存储覆写管理
// 红线: 引擎不读全局可变状态,配置显式注入
// ==========================================

pub mod config_manager;

pub use config_manager::ConfigManager;

use crate::domain::exam::minutes_since_midnight;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 一天的分钟数,时段窗口不得越过当日边界
const MINUTES_PER_DAY: i64 = 24 * 60;

// ==========================================
// 配置错误
// ==========================================

/// 配置错误
///
/// 属于致命错误: 在任何课程被处理之前于边界上报,整轮中止。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("考试时长必须为正数: {0}")]
    NonPositiveDuration(i64),

    #[error("每日时段数必须为正数: {0}")]
    NonPositiveSlotCount(i64),

    #[error("排考视野天数必须为正数: {0}")]
    NonPositiveHorizon(i64),

    #[error("时段窗口越过当日 24:00 (结束于第 {end_minutes} 分钟)")]
    SlotWindowCrossesMidnight { end_minutes: i64 },

    #[error("日期格式错误(期望 YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("时刻格式错误(期望 HH:MM): {0}")]
    InvalidTime(String),
}

// ==========================================
// ScheduleConfig - 排考配置
// ==========================================

/// 排考配置
///
/// 显式传入编排器,无进程级可变状态。
/// start_date 为空时默认取调用当日的次日。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub start_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub max_slots_per_day: i64,
    pub horizon_days: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_minutes: 120,
            max_slots_per_day: 4,
            horizon_days: 10,
        }
    }
}

impl ScheduleConfig {
    /// 边界校验
    ///
    /// 非法配置立即整体拒绝,不进入逐课程处理:
    /// - 时长/时段数/视野天数必须为正
    /// - 当日时段窗口 (start_time + max_slots_per_day × duration) 不得越过 24:00
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_minutes <= 0 {
            return Err(ConfigError::NonPositiveDuration(self.duration_minutes));
        }
        if self.max_slots_per_day <= 0 {
            return Err(ConfigError::NonPositiveSlotCount(self.max_slots_per_day));
        }
        if self.horizon_days <= 0 {
            return Err(ConfigError::NonPositiveHorizon(self.horizon_days));
        }

        let end_minutes = minutes_since_midnight(self.start_time)
            + self.max_slots_per_day * self.duration_minutes;
        if end_minutes > MINUTES_PER_DAY {
            return Err(ConfigError::SlotWindowCrossesMidnight { end_minutes });
        }

        Ok(())
    }

    /// 每轮候选时段总数(视野天数 × 每日时段数)
    pub fn slot_space_size(&self) -> i64 {
        self.horizon_days * self.max_slots_per_day
    }
}
