// ==========================================
// 考试排程系统 - 基础数据导入器
// ==========================================
// 职责: 从 CSV 导入院系/专业/课程/教师/教室/学生主数据
// 支持: CSV (.csv),表头驱动,空行跳过
// ==========================================

use crate::domain::types::RoomKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{
    DepartmentRepository, FormationRepository, ModuleRepository, ProfessorRepository,
    RoomRepository, StudentRepository,
};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

// ==========================================
// RosterImporter - 基础数据导入器
// ==========================================
pub struct RosterImporter {
    department_repo: DepartmentRepository,
    formation_repo: FormationRepository,
    module_repo: ModuleRepository,
    professor_repo: ProfessorRepository,
    room_repo: RoomRepository,
    student_repo: StudentRepository,
}

impl RosterImporter {
    /// 从共享连接创建导入器
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            department_repo: DepartmentRepository::from_connection(conn.clone()),
            formation_repo: FormationRepository::from_connection(conn.clone()),
            module_repo: ModuleRepository::from_connection(conn.clone()),
            professor_repo: ProfessorRepository::from_connection(conn.clone()),
            room_repo: RoomRepository::from_connection(conn.clone()),
            student_repo: StudentRepository::from_connection(conn),
        }
    }

    // ==========================================
    // 逐实体导入
    // ==========================================

    /// 导入院系(列: name)
    pub fn import_departments(&self, path: &Path) -> ImportResult<usize> {
        let records = parse_csv(path)?;
        let mut inserted = 0;
        for (row, record) in records.iter().enumerate() {
            let name = require_field(record, "name", row)?;
            self.department_repo.insert(name)?;
            inserted += 1;
        }
        info!(path = %path.display(), inserted, "院系导入完成");
        Ok(inserted)
    }

    /// 导入专业(列: name, level, expected_module_count, department_id)
    pub fn import_formations(&self, path: &Path) -> ImportResult<usize> {
        let records = parse_csv(path)?;
        let mut inserted = 0;
        for (row, record) in records.iter().enumerate() {
            let name = require_field(record, "name", row)?;
            let level = require_field(record, "level", row)?;
            let expected = parse_i64(record, "expected_module_count", row)?;
            let department_id = parse_i64(record, "department_id", row)?;
            self.formation_repo
                .insert(name, level, expected as i32, department_id)?;
            inserted += 1;
        }
        info!(path = %path.display(), inserted, "专业导入完成");
        Ok(inserted)
    }

    /// 导入课程(列: name, credit_weight, formation_id[, prerequisite_module_id])
    pub fn import_modules(&self, path: &Path) -> ImportResult<usize> {
        let records = parse_csv(path)?;
        let mut inserted = 0;
        for (row, record) in records.iter().enumerate() {
            let name = require_field(record, "name", row)?;
            let credit_weight = parse_i64(record, "credit_weight", row)?;
            let formation_id = parse_i64(record, "formation_id", row)?;
            let prerequisite = optional_i64(record, "prerequisite_module_id", row)?;
            self.module_repo
                .insert(name, credit_weight as i32, formation_id, prerequisite)?;
            inserted += 1;
        }
        info!(path = %path.display(), inserted, "课程导入完成");
        Ok(inserted)
    }

    /// 导入教师(列: name, specialty, department_id)
    pub fn import_professors(&self, path: &Path) -> ImportResult<usize> {
        let records = parse_csv(path)?;
        let mut inserted = 0;
        for (row, record) in records.iter().enumerate() {
            let name = require_field(record, "name", row)?;
            let specialty = record.get("specialty").map(String::as_str).unwrap_or("");
            let department_id = parse_i64(record, "department_id", row)?;
            self.professor_repo.insert(name, specialty, department_id)?;
            inserted += 1;
        }
        info!(path = %path.display(), inserted, "教师导入完成");
        Ok(inserted)
    }

    /// 导入教室(列: name, capacity, kind, building)
    pub fn import_rooms(&self, path: &Path) -> ImportResult<usize> {
        let records = parse_csv(path)?;
        let mut inserted = 0;
        for (row, record) in records.iter().enumerate() {
            let name = require_field(record, "name", row)?;
            let capacity = parse_i64(record, "capacity", row)?;
            let kind_raw = require_field(record, "kind", row)?;
            let kind = RoomKind::parse(kind_raw).ok_or_else(|| ImportError::InvalidValue {
                row,
                field: "kind".to_string(),
                value: kind_raw.to_string(),
            })?;
            let building = record.get("building").map(String::as_str).unwrap_or("");
            self.room_repo.insert(name, capacity, kind, building)?;
            inserted += 1;
        }
        info!(path = %path.display(), inserted, "教室导入完成");
        Ok(inserted)
    }

    /// 导入学生(列: name, promotion_year, formation_id)
    pub fn import_students(&self, path: &Path) -> ImportResult<usize> {
        let records = parse_csv(path)?;
        let mut inserted = 0;
        for (row, record) in records.iter().enumerate() {
            let name = require_field(record, "name", row)?;
            let promotion_year = parse_i64(record, "promotion_year", row)?;
            let formation_id = parse_i64(record, "formation_id", row)?;
            self.student_repo
                .insert(name, promotion_year as i32, formation_id)?;
            inserted += 1;
        }
        info!(path = %path.display(), inserted, "学生导入完成");
        Ok(inserted)
    }
}

// ==========================================
// CSV 解析辅助
// ==========================================

/// 解析 CSV 为表头驱动的记录列表
///
/// - 表头与单元格两端空白去除
/// - 完全空白的行跳过
fn parse_csv(path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    if let Some(ext) = path.extension() {
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(
                ext.to_string_lossy().to_string(),
            ));
        }
    }

    let file = File::open(path).map_err(|e| ImportError::CsvParseError(e.to_string()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::CsvParseError(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ImportError::CsvParseError(e.to_string()))?;
        let mut row_map = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        records.push(row_map);
    }

    Ok(records)
}

/// 取必填字段(空值视为缺失)
fn require_field<'a>(
    record: &'a HashMap<String, String>,
    field: &str,
    row: usize,
) -> ImportResult<&'a str> {
    match record.get(field) {
        Some(v) if !v.is_empty() => Ok(v.as_str()),
        _ => Err(ImportError::MissingField {
            row,
            field: field.to_string(),
        }),
    }
}

/// 取必填整数字段
fn parse_i64(record: &HashMap<String, String>, field: &str, row: usize) -> ImportResult<i64> {
    let raw = require_field(record, field, row)?;
    raw.parse::<i64>()
        .map_err(|e| ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: e.to_string(),
        })
}

/// 取可选整数字段(缺失或空值返回 None)
fn optional_i64(
    record: &HashMap<String, String>,
    field: &str,
    row: usize,
) -> ImportResult<Option<i64>> {
    match record.get(field) {
        Some(v) if !v.is_empty() => v
            .parse::<i64>()
            .map(Some)
            .map_err(|e| ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: e.to_string(),
            }),
        _ => Ok(None),
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_csv_file_not_found() {
        let result = parse_csv(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_csv_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "name").unwrap();
        let result = parse_csv(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_parse_csv_skips_blank_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,capacity").unwrap();
        writeln!(file, "A101, 50").unwrap();
        writeln!(file, " , ").unwrap();
        writeln!(file, "B202,80").unwrap();
        file.flush().unwrap();

        let records = parse_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name").unwrap(), "A101");
        assert_eq!(records[0].get("capacity").unwrap(), "50");
    }

    #[test]
    fn test_require_field_rejects_empty() {
        let mut record = HashMap::new();
        record.insert("name".to_string(), "".to_string());
        assert!(matches!(
            require_field(&record, "name", 0),
            Err(ImportError::MissingField { .. })
        ));
    }

    #[test]
    fn test_parse_i64_type_error() {
        let mut record = HashMap::new();
        record.insert("capacity".to_string(), "abc".to_string());
        assert!(matches!(
            parse_i64(&record, "capacity", 3),
            Err(ImportError::TypeConversionError { row: 3, .. })
        ));
    }
}
