// ==========================================
// 考试排程系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 自动排考决策引擎 (人工最终控制权)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问(存储网关)
pub mod repository;

// 引擎层 - 排考规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施(连接初始化/PRAGMA/模式与约束触发器)
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ConstraintViolation, ExamOutcome, FailureReason, RoomKind};

// 领域实体
pub use domain::{
    CommittedExam, Department, Exam, ExamCandidate, ExamDetails, Formation, Module, NewExam,
    Professor, Room, ScheduleRun, Student, UnscheduledModule,
};

// 引擎
pub use engine::{
    ConstraintOracle, ModuleScheduleDetail, ResourceSelector, ScheduleError,
    ScheduleOrchestrator, ScheduleResult, SchedulingRepositories, SlotGenerator,
};

// 配置
pub use config::{ConfigError, ConfigManager, ScheduleConfig};

// API
pub use api::{ExamApi, GenerateScheduleParams, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "考试排程系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
