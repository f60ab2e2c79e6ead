// ==========================================
// 考试排程系统 - 候选时段生成引擎
// ==========================================
// 职责: 生成有限、确定、可重放的 (日期, 时刻) 候选序列
// 红线: 视野上界是逐课程搜索唯一的终止保证
// ==========================================
// 序列定义: day ∈ 0..horizon_days, slot ∈ 0..max_slots_per_day,
//           产出 (start_date + day, start_time + slot × duration),
//           当日时段首尾相接无间隙
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::exam::minutes_since_midnight;
use chrono::{Duration, NaiveDate, NaiveTime};

// ==========================================
// SlotGenerator - 候选时段生成引擎
// ==========================================
pub struct SlotGenerator {
    start_date: NaiveDate,
    start_time: NaiveTime,
    duration_minutes: i64,
    max_slots_per_day: i64,
    horizon_days: i64,
}

impl SlotGenerator {
    /// 构造函数
    ///
    /// # 参数
    /// - start_date: 排考起始日期(已由调用方解析默认值)
    /// - config: 已通过边界校验的排考配置
    pub fn new(start_date: NaiveDate, config: &ScheduleConfig) -> Self {
        Self {
            start_date,
            start_time: config.start_time,
            duration_minutes: config.duration_minutes,
            max_slots_per_day: config.max_slots_per_day,
            horizon_days: config.horizon_days,
        }
    }

    /// 生成完整候选序列
    ///
    /// 序列确定且有限: 外层按日推进,内层按时段推进,
    /// 任意两次调用产出完全一致(可重放)。
    ///
    /// # 返回
    /// 长度为 horizon_days × max_slots_per_day 的 (日期, 时刻) 序列
    pub fn slots(&self) -> Vec<(NaiveDate, NaiveTime)> {
        let base_minutes = minutes_since_midnight(self.start_time);
        let mut sequence =
            Vec::with_capacity((self.horizon_days * self.max_slots_per_day) as usize);

        for day in 0..self.horizon_days {
            let date = self.start_date + Duration::days(day);
            for slot in 0..self.max_slots_per_day {
                let minutes = base_minutes + slot * self.duration_minutes;
                // 配置校验保证 minutes < 1440(不越过当日边界)
                let time = NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
                    .unwrap_or(self.start_time);
                sequence.push((date, time));
            }
        }

        sequence
    }

    /// 候选时段总数
    pub fn slot_count(&self) -> i64 {
        self.horizon_days * self.max_slots_per_day
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn default_generator() -> SlotGenerator {
        let config = ScheduleConfig::default();
        SlotGenerator::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &config)
    }

    #[test]
    fn test_default_day_one_slots() {
        // 默认配置: 09:00 / 120 分钟 / 4 段 → 09:00, 11:00, 13:00, 15:00
        let slots = default_generator().slots();
        let day1 = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        assert_eq!(slots[0], (day1, NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert_eq!(slots[1], (day1, NaiveTime::from_hms_opt(11, 0, 0).unwrap()));
        assert_eq!(slots[2], (day1, NaiveTime::from_hms_opt(13, 0, 0).unwrap()));
        assert_eq!(slots[3], (day1, NaiveTime::from_hms_opt(15, 0, 0).unwrap()));
        // 第 5 个候选进入次日 09:00
        assert_eq!(
            slots[4],
            (
                NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap()
            )
        );
    }

    #[test]
    fn test_sequence_length_is_horizon_times_slots() {
        let generator = default_generator();
        let slots = generator.slots();
        assert_eq!(slots.len(), 40);
        assert_eq!(generator.slot_count(), 40);
    }

    #[test]
    fn test_sequence_is_replayable() {
        let generator = default_generator();
        assert_eq!(generator.slots(), generator.slots());
    }

    #[test]
    fn test_month_boundary_crossing() {
        let config = ScheduleConfig {
            horizon_days: 3,
            max_slots_per_day: 1,
            ..ScheduleConfig::default()
        };
        let generator = SlotGenerator::new(NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(), &config);
        let slots = generator.slots();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].0, NaiveDate::from_ymd_opt(2026, 2, 27).unwrap());
        assert_eq!(slots[1].0, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        // 2026 非闰年,2月28日翌日为3月1日
        assert_eq!(slots[2].0, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn test_custom_duration_back_to_back() {
        let config = ScheduleConfig {
            start_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            duration_minutes: 90,
            max_slots_per_day: 3,
            horizon_days: 1,
            ..ScheduleConfig::default()
        };
        let generator = SlotGenerator::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &config);
        let slots = generator.slots();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].1, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(slots[1].1, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(slots[2].1, NaiveTime::from_hms_opt(11, 30, 0).unwrap());
    }
}
