// ==========================================
// 考试排程系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::{ConfigError, ScheduleConfig};
use crate::db::open_sqlite_connection;
use chrono::NaiveTime;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// 配置键全集
const KEY_START_TIME: &str = "schedule/start_time";
const KEY_DURATION_MINUTES: &str = "schedule/duration_minutes";
const KEY_MAX_SLOTS_PER_DAY: &str = "schedule/max_slots_per_day";
const KEY_HORIZON_DAYS: &str = "schedule/horizon_days";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 为保证连接行为一致,会对传入连接再次应用统一 PRAGMA(幂等)。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值(scope_id='global')
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值(公开方法,供其他模块复用)
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值(覆写)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 加载排考配置(内置默认值 + config_kv 覆写)
    ///
    /// start_date 不属于存储配置,由调用方按次传入。
    /// 存储值非法时立即报错,不静默回退默认值。
    pub fn load_schedule_config(&self) -> Result<ScheduleConfig, Box<dyn Error>> {
        let mut config = ScheduleConfig::default();

        if let Some(raw) = self.get_config_value(KEY_START_TIME)? {
            config.start_time = NaiveTime::parse_from_str(&raw, "%H:%M")
                .map_err(|_| ConfigError::InvalidTime(raw))?;
        }
        if let Some(raw) = self.get_config_value(KEY_DURATION_MINUTES)? {
            config.duration_minutes = raw
                .parse::<i64>()
                .map_err(|_| format!("配置值非法: {} = {}", KEY_DURATION_MINUTES, raw))?;
        }
        if let Some(raw) = self.get_config_value(KEY_MAX_SLOTS_PER_DAY)? {
            config.max_slots_per_day = raw
                .parse::<i64>()
                .map_err(|_| format!("配置值非法: {} = {}", KEY_MAX_SLOTS_PER_DAY, raw))?;
        }
        if let Some(raw) = self.get_config_value(KEY_HORIZON_DAYS)? {
            config.horizon_days = raw
                .parse::<i64>()
                .map_err(|_| format!("配置值非法: {} = {}", KEY_HORIZON_DAYS, raw))?;
        }

        Ok(config)
    }

    /// 获取所有配置的快照(JSON格式)
    ///
    /// # 用途
    /// - 排考运行落库时记录配置快照,保证事后可追溯
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}
