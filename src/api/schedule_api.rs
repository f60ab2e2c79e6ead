// ==========================================
// 考试排程系统 - 排考 API
// ==========================================
// 职责: 自动排考入口,参数解析/合并/校验,运行记录查询
// 红线: 非法配置在任何课程被处理前整体拒绝
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigError, ConfigManager};
use crate::domain::exam::ScheduleRun;
use crate::engine::{ScheduleOrchestrator, ScheduleResult, SchedulingRepositories};

// ==========================================
// 请求参数
// ==========================================

/// 自动排考请求参数
///
/// 全部可选;未提供的项依次回退到 config_kv 覆写值、内置默认值。
/// 字符串形态的日期/时刻在此解析,格式非法立即拒绝整个请求。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateScheduleParams {
    /// 起始日期 "YYYY-MM-DD",缺省为调用次日
    pub start_date: Option<String>,
    /// 首场开考时刻 "HH:MM"
    pub start_time: Option<String>,
    /// 单场时长(分钟)
    pub duration_minutes: Option<i64>,
    /// 每日时段数
    pub max_slots_per_day: Option<i64>,
    /// 排考视野天数
    pub horizon_days: Option<i64>,
}

// ==========================================
// ScheduleApi - 排考 API
// ==========================================

/// 排考API
///
/// 职责:
/// 1. 自动排考(参数合并 → 边界校验 → 编排器执行)
/// 2. 运行记录查询
pub struct ScheduleApi {
    config_manager: Arc<ConfigManager>,
    repos: SchedulingRepositories,
    orchestrator: ScheduleOrchestrator,
}

impl ScheduleApi {
    /// 创建新的ScheduleApi实例
    pub fn new(repos: SchedulingRepositories, config_manager: Arc<ConfigManager>) -> Self {
        let orchestrator = ScheduleOrchestrator::new(repos.clone());
        Self {
            config_manager,
            repos,
            orchestrator,
        }
    }

    /// 执行一轮自动排考
    ///
    /// 配置优先级: 请求参数 > config_kv 覆写 > 内置默认值。
    /// 日期/时刻解析失败与非正数配置均为致命错误,整轮中止,
    /// 不处理任何课程。
    pub fn generate_schedule(
        &self,
        params: &GenerateScheduleParams,
    ) -> ApiResult<ScheduleResult> {
        let mut config = self
            .config_manager
            .load_schedule_config()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        if let Some(raw) = &params.start_date {
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::InvalidInput(ConfigError::InvalidDate(raw.clone()).to_string()))?;
            config.start_date = Some(parsed);
        }
        if let Some(raw) = &params.start_time {
            let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
                .map_err(|_| ApiError::InvalidInput(ConfigError::InvalidTime(raw.clone()).to_string()))?;
            config.start_time = parsed;
        }
        if let Some(duration) = params.duration_minutes {
            config.duration_minutes = duration;
        }
        if let Some(slots) = params.max_slots_per_day {
            config.max_slots_per_day = slots;
        }
        if let Some(horizon) = params.horizon_days {
            config.horizon_days = horizon;
        }

        config
            .validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        Ok(self.orchestrator.generate_schedule(&config)?)
    }

    /// 查询最近的排考运行记录
    pub fn list_recent_runs(&self, limit: i64) -> ApiResult<Vec<ScheduleRun>> {
        if limit <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "limit 必须为正数: {}",
                limit
            )));
        }
        Ok(self.repos.run_log_repo.list_recent(limit)?)
    }
}
