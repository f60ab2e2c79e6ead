// ==========================================
// 考试排程系统 - 排考编排器
// ==========================================
// 用途: 驱动"待排课程 → 候选搜索 → 落库提交"的完整主流程
// 红线: 单课程失败不得中止整轮;每轮对每门初始待排课程恰好尝试一次
// ==========================================
// 顺序保证: 课程按 id 升序,候选按 时段 → 教室 → 教师 迭代
// (教室是经容量过滤的稀缺资源,置于教师之外),
// 输入状态与配置相同时两轮产出完全一致
// ==========================================

use crate::config::{ConfigError, ScheduleConfig};
use crate::domain::exam::{ExamCandidate, ScheduleRun};
use crate::domain::resources::{Professor, Room};
use crate::domain::types::{ExamOutcome, FailureReason};
use crate::engine::oracle::ConstraintOracle;
use crate::engine::repositories::SchedulingRepositories;
use crate::engine::selector::ResourceSelector;
use crate::engine::slots::SlotGenerator;
use crate::i18n;
use crate::repository::RepositoryError;
use chrono::{Duration, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// 错误类型
// ==========================================

/// 排考运行错误
///
/// 配置错误与存储连接类错误属致命错误,整轮中止;
/// 硬约束拒绝不会出现在此处(已在候选级消化)。
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("存储错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("内部错误: {0}")]
    Internal(String),
}

// ==========================================
// ScheduleResult - 排考结果
// ==========================================

/// 单课程排考明细
///
/// 成功时携带落位的日期/时刻/教室/教师,失败时携带原因码;
/// message 为面向用户的本地化说明,无需翻日志即可解释每个失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleScheduleDetail {
    pub module_id: i64,
    pub module_name: String,
    pub outcome: ExamOutcome,
    pub exam_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub room_id: Option<i64>,
    pub room_name: Option<String>,
    pub professor_id: Option<i64>,
    pub professor_name: Option<String>,
    pub reason: Option<FailureReason>,
    pub message: String,
}

/// 排考结果汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub run_id: String,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    /// 按课程 id 升序的逐课程明细
    pub details: Vec<ModuleScheduleDetail>,
}

// ==========================================
// ScheduleOrchestrator - 排考编排器
// ==========================================

pub struct ScheduleOrchestrator {
    repos: SchedulingRepositories,
    oracle: ConstraintOracle,
    selector: ResourceSelector,
}

impl ScheduleOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - repos: 仓储集合(存储网关)
    pub fn new(repos: SchedulingRepositories) -> Self {
        Self {
            repos,
            oracle: ConstraintOracle::new(),
            selector: ResourceSelector::new(),
        }
    }

    /// 执行一轮自动排考
    ///
    /// 主流程:
    /// 1. 边界校验配置,解析起始日期(缺省为次日)
    /// 2. 加载全部无考试课程(按 id 升序)为本轮待排集
    /// 3. 逐课程: 教室候选为空 → NoRoomWithCapacity;
    ///    否则按 时段 → 教室 → 教师 枚举候选,经约束校验后落库,
    ///    首个成功即提交并更新内存已落位集合;
    ///    候选空间耗尽 → NoFeasibleSlot
    /// 4. 非空运行落一条 schedule_run 记录后返回汇总
    ///
    /// 存储层在提交时独立复核约束;并发竞争导致的拒绝
    /// 按候选级失败处理(换下一个候选),不中止整轮。
    #[instrument(skip(self, config))]
    pub fn generate_schedule(
        &self,
        config: &ScheduleConfig,
    ) -> Result<ScheduleResult, ScheduleError> {
        config.validate()?;

        let start_date = config
            .start_date
            .unwrap_or_else(|| Local::now().date_naive() + Duration::days(1));
        let started_at = Utc::now().naive_utc();
        let run_id = Uuid::new_v4().to_string();

        // 步骤1: 加载待排课程
        let modules = self.repos.module_repo.list_unscheduled()?;
        let total = modules.len();

        if total == 0 {
            // 无事可做即无写入(幂等)
            info!(run_id = %run_id, "无待排课程,本轮直接返回");
            return Ok(ScheduleResult {
                run_id,
                succeeded: 0,
                failed: 0,
                total: 0,
                details: Vec::new(),
            });
        }

        info!(
            run_id = %run_id,
            start_date = %start_date,
            total,
            horizon_days = config.horizon_days,
            max_slots_per_day = config.max_slots_per_day,
            "开始执行自动排考"
        );

        // 步骤2: 加载资源与已落位考试(运行前持久化部分)
        let professors = self.repos.professor_repo.list_all()?;
        let rooms = self.repos.room_repo.list_all()?;
        let mut committed = self.repos.exam_repo.list_committed()?;

        // 步骤3: 生成候选时段序列(有限,保证终止)
        let slots = SlotGenerator::new(start_date, config).slots();

        let mut details: Vec<ModuleScheduleDetail> = Vec::with_capacity(total);
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        // 步骤4: 逐课程搜索(课程按 id 升序,由仓储保证)
        for module in &modules {
            let candidate_rooms = self.selector.candidate_rooms(&rooms, module.student_count);

            // 无容量足够的教室: 本轮内不会凭空出现教室,直接判失败
            if candidate_rooms.is_empty() {
                warn!(
                    module_id = module.module_id,
                    student_count = module.student_count,
                    "无容量足够的教室,课程判定失败"
                );
                failed += 1;
                details.push(Self::failure_detail(
                    module.module_id,
                    &module.module_name,
                    FailureReason::NoRoomWithCapacity,
                    module.student_count,
                    config.horizon_days,
                ));
                continue;
            }

            let candidate_professors = self
                .selector
                .candidate_professors(&professors, module.department_id);

            // 候选迭代: 时段外层,教室次之,教师内层
            let mut placement: Option<(NaiveDate, NaiveTime, Room, Professor)> = None;
            'search: for (date, time) in &slots {
                for room in &candidate_rooms {
                    for professor in &candidate_professors {
                        let candidate = ExamCandidate {
                            module_id: module.module_id,
                            formation_id: module.formation_id,
                            student_count: module.student_count,
                            exam_date: *date,
                            start_time: *time,
                            duration_minutes: config.duration_minutes,
                            professor_id: professor.id,
                            room_id: room.id,
                            room_capacity: room.capacity,
                        };

                        // 约束校验(内存中的已落位集合 = 运行前 ∪ 本轮已提交)
                        if self.oracle.check(&candidate, &committed).is_some() {
                            continue;
                        }

                        // 提交: 存储层独立复核,拒绝视为候选级失败
                        match self.repos.exam_repo.create(&candidate.to_new_exam()) {
                            Ok(_) => {
                                committed.push(candidate.to_committed());
                                placement =
                                    Some((*date, *time, room.clone(), professor.clone()));
                                break 'search;
                            }
                            Err(RepositoryError::ConstraintViolation(violation)) => {
                                debug!(
                                    module_id = module.module_id,
                                    violation = %violation,
                                    "存储层拒绝候选,继续搜索"
                                );
                                continue;
                            }
                            Err(e) => return Err(e.into()),
                        }
                    }
                }
            }

            match placement {
                Some((date, time, room, professor)) => {
                    info!(
                        module_id = module.module_id,
                        exam_date = %date,
                        start_time = %time,
                        room_id = room.id,
                        professor_id = professor.id,
                        "课程排考成功"
                    );
                    succeeded += 1;
                    details.push(Self::success_detail(
                        module.module_id,
                        &module.module_name,
                        date,
                        time,
                        &room,
                        &professor,
                    ));
                }
                None => {
                    warn!(
                        module_id = module.module_id,
                        slot_count = slots.len(),
                        "候选空间耗尽,课程判定失败"
                    );
                    failed += 1;
                    details.push(Self::failure_detail(
                        module.module_id,
                        &module.module_name,
                        FailureReason::NoFeasibleSlot,
                        module.student_count,
                        config.horizon_days,
                    ));
                }
            }
        }

        // 步骤5: 运行留痕
        self.persist_run_log(&run_id, started_at, start_date, config, succeeded, failed, &details)?;

        info!(
            run_id = %run_id,
            succeeded,
            failed,
            total,
            "自动排考完成"
        );

        Ok(ScheduleResult {
            run_id,
            succeeded,
            failed,
            total,
            details,
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 构造成功明细
    fn success_detail(
        module_id: i64,
        module_name: &str,
        date: NaiveDate,
        time: NaiveTime,
        room: &Room,
        professor: &Professor,
    ) -> ModuleScheduleDetail {
        let message = i18n::t_with_args(
            "schedule.module_scheduled",
            &[
                ("module", module_name),
                ("date", &date.format("%Y-%m-%d").to_string()),
                ("time", &time.format("%H:%M").to_string()),
                ("professor", &professor.name),
                ("room", &room.name),
            ],
        );

        ModuleScheduleDetail {
            module_id,
            module_name: module_name.to_string(),
            outcome: ExamOutcome::Scheduled,
            exam_date: Some(date),
            start_time: Some(time),
            room_id: Some(room.id),
            room_name: Some(room.name.clone()),
            professor_id: Some(professor.id),
            professor_name: Some(professor.name.clone()),
            reason: None,
            message,
        }
    }

    /// 构造失败明细
    fn failure_detail(
        module_id: i64,
        module_name: &str,
        reason: FailureReason,
        student_count: i64,
        horizon_days: i64,
    ) -> ModuleScheduleDetail {
        let message = match reason {
            FailureReason::NoRoomWithCapacity => i18n::t_with_args(
                "schedule.no_room_with_capacity",
                &[
                    ("module", module_name),
                    ("students", &student_count.to_string()),
                ],
            ),
            FailureReason::NoFeasibleSlot => i18n::t_with_args(
                "schedule.no_feasible_slot",
                &[("module", module_name), ("days", &horizon_days.to_string())],
            ),
        };

        ModuleScheduleDetail {
            module_id,
            module_name: module_name.to_string(),
            outcome: ExamOutcome::Failed,
            exam_date: None,
            start_time: None,
            room_id: None,
            room_name: None,
            professor_id: None,
            professor_name: None,
            reason: Some(reason),
            message,
        }
    }

    /// 落一条运行记录(配置快照 + 逐课程明细)
    #[allow(clippy::too_many_arguments)]
    fn persist_run_log(
        &self,
        run_id: &str,
        started_at: chrono::NaiveDateTime,
        start_date: NaiveDate,
        config: &ScheduleConfig,
        succeeded: usize,
        failed: usize,
        details: &[ModuleScheduleDetail],
    ) -> Result<(), ScheduleError> {
        let effective_config = ScheduleConfig {
            start_date: Some(start_date),
            ..config.clone()
        };
        let config_snapshot = serde_json::to_string(&effective_config)
            .map_err(|e| ScheduleError::Internal(e.to_string()))?;
        let details_json = serde_json::to_string(details)
            .map_err(|e| ScheduleError::Internal(e.to_string()))?;

        self.repos.run_log_repo.insert(&ScheduleRun {
            run_id: run_id.to_string(),
            started_at,
            start_date,
            succeeded: succeeded as i64,
            failed: failed as i64,
            total: (succeeded + failed) as i64,
            config_snapshot,
            details_json,
        })?;

        Ok(())
    }
}
