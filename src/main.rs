// ==========================================
// 考试排程系统 - 命令行主入口
// ==========================================
// 用法:
//   exam-scheduler [db_path] [start_date]
//   - db_path: SQLite 数据库路径,缺省为系统数据目录
//   - start_date: 排考起始日期 YYYY-MM-DD,缺省为次日
// ==========================================

use std::sync::{Arc, Mutex};

use exam_scheduler::api::{GenerateScheduleParams, ScheduleApi};
use exam_scheduler::config::ConfigManager;
use exam_scheduler::db::{get_default_db_path, init_schema, open_sqlite_connection};
use exam_scheduler::engine::SchedulingRepositories;
use exam_scheduler::{i18n, logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 自动排考决策引擎", exam_scheduler::APP_NAME);
    tracing::info!("系统版本: {}", exam_scheduler::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(get_default_db_path);
    let start_date = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    tracing::info!("使用数据库: {}", db_path);

    // 打开连接并保证模式就绪(幂等)
    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    // 组装仓储与 API
    let repos = SchedulingRepositories::from_connection(conn.clone());
    let config_manager = Arc::new(ConfigManager::from_connection(conn)?);
    let api = ScheduleApi::new(repos, config_manager);

    // 执行一轮自动排考
    let params = GenerateScheduleParams {
        start_date,
        ..GenerateScheduleParams::default()
    };
    let result = api.generate_schedule(&params)?;

    // 输出逐课程明细与汇总
    if result.total == 0 {
        println!("{}", i18n::t("schedule.nothing_to_schedule"));
        return Ok(());
    }

    for detail in &result.details {
        println!("{}", detail.message);
    }
    println!(
        "{}",
        i18n::t_with_args(
            "schedule.run_summary",
            &[
                ("succeeded", &result.succeeded.to_string()),
                ("failed", &result.failed.to_string()),
                ("total", &result.total.to_string()),
            ],
        )
    );

    Ok(())
}
