// ==========================================
// API 层集成测试
// ==========================================
// 职责: 验证 ExamApi(查询/人工增删改/KPI)与
//       ScheduleApi(排考入口/运行记录)的对外行为
// ==========================================


use chrono::{NaiveDate, NaiveTime};
use exam_scheduler::api::{
    violation_message, ApiError, ExamApi, GenerateScheduleParams, ScheduleApi,
};
use exam_scheduler::config::ConfigManager;
use exam_scheduler::domain::exam::NewExam;
use exam_scheduler::domain::types::ConstraintViolation;
use exam_scheduler::engine::SchedulingRepositories;
use exam_scheduler::repository::{ExamFilter, ExamRepository};
use std::sync::Arc;
use test_helpers::TestDb;

// ==========================================
// 测试辅助函数
// ==========================================

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn exam_api(db: &TestDb) -> ExamApi {
    ExamApi::new(Arc::new(ExamRepository::from_connection(db.conn.clone())))
}

fn schedule_api(db: &TestDb) -> ScheduleApi {
    let repos = SchedulingRepositories::from_connection(db.conn.clone());
    let config_manager = Arc::new(ConfigManager::from_connection(db.conn.clone()).unwrap());
    ScheduleApi::new(repos, config_manager)
}

/// 基础数据: 一个院系、一个专业(10人)、两门课程、教师与教室
fn seed_basic(db: &TestDb) -> (i64, i64, i64, i64) {
    let dept = db.seed_department("Informatique");
    let formation = db.seed_formation_with_students("L3-INFO", dept, 10);
    let module_a = db.seed_module("Algorithmique", formation);
    db.seed_module("Bases de données", formation);
    let professor = db.seed_professor("Dupont", dept);
    let room = db.seed_room("B101", 50);
    (formation, module_a, professor, room)
}

// ==========================================
// ExamApi - 人工增删改
// ==========================================

#[test]
fn test_manual_create_get_delete() {
    let db = TestDb::create().unwrap();
    let (_, module_a, professor, room) = seed_basic(&db);
    let api = exam_api(&db);

    let created = api
        .create_exam(&NewExam {
            exam_date: date(1),
            start_time: time(9),
            duration_minutes: 120,
            module_id: module_a,
            professor_id: professor,
            room_id: room,
        })
        .unwrap();

    let loaded = api.get_exam(created.id).unwrap();
    assert_eq!(loaded, created);

    api.delete_exam(created.id).unwrap();
    assert!(matches!(
        api.get_exam(created.id).unwrap_err(),
        ApiError::NotFound(_)
    ));
}

#[test]
fn test_manual_create_surfaces_typed_violation() {
    let db = TestDb::create().unwrap();
    let (_, module_a, professor, room) = seed_basic(&db);
    let api = exam_api(&db);

    api.create_exam(&NewExam {
        exam_date: date(1),
        start_time: time(9),
        duration_minutes: 120,
        module_id: module_a,
        professor_id: professor,
        room_id: room,
    })
    .unwrap();

    // 同一课程重复建考
    let err = api
        .create_exam(&NewExam {
            exam_date: date(2),
            start_time: time(9),
            duration_minutes: 120,
            module_id: module_a,
            professor_id: professor,
            room_id: room,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::ConstraintViolation(ConstraintViolation::DuplicateModuleExam)
    ));
}

#[test]
fn test_manual_create_rejects_non_positive_duration() {
    let db = TestDb::create().unwrap();
    let (_, module_a, professor, room) = seed_basic(&db);
    let api = exam_api(&db);

    let err = api
        .create_exam(&NewExam {
            exam_date: date(1),
            start_time: time(9),
            duration_minutes: 0,
            module_id: module_a,
            professor_id: professor,
            room_id: room,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_manual_update_roundtrip() {
    let db = TestDb::create().unwrap();
    let (_, module_a, professor, room) = seed_basic(&db);
    let api = exam_api(&db);

    let created = api
        .create_exam(&NewExam {
            exam_date: date(1),
            start_time: time(9),
            duration_minutes: 120,
            module_id: module_a,
            professor_id: professor,
            room_id: room,
        })
        .unwrap();

    let mut moved = created.clone();
    moved.exam_date = date(4);
    moved.start_time = time(13);
    api.update_exam(&moved).unwrap();

    let reloaded = api.get_exam(created.id).unwrap();
    assert_eq!(reloaded.exam_date, date(4));
    assert_eq!(reloaded.start_time, time(13));
}

// ==========================================
// ExamApi - 查询与 KPI
// ==========================================

#[test]
fn test_listing_views_and_kpis_after_auto_schedule() {
    let db = TestDb::create().unwrap();
    let (formation, _, professor, _) = seed_basic(&db);

    // 自动排两门课
    let result = schedule_api(&db)
        .generate_schedule(&GenerateScheduleParams {
            start_date: Some("2026-03-01".to_string()),
            ..GenerateScheduleParams::default()
        })
        .unwrap();
    assert_eq!(result.succeeded, 2);

    let api = exam_api(&db);

    let all = api.list_exams(&ExamFilter::default()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].formation_name, "L3-INFO");

    let by_formation = api.list_exams_by_formation(formation).unwrap();
    assert_eq!(by_formation.len(), 2);

    let by_professor = api.list_exams_by_professor(professor).unwrap();
    assert_eq!(by_professor.len(), 2);

    let occupancy = api.room_occupancy().unwrap();
    assert_eq!(occupancy[0].exam_count, 2);

    let load = api.exams_per_professor().unwrap();
    assert_eq!(load[0].professor_name, "Dupont");
    assert_eq!(load[0].exam_count, 2);
}

// ==========================================
// ScheduleApi - 运行记录
// ==========================================

#[test]
fn test_list_recent_runs_via_api() {
    let db = TestDb::create().unwrap();
    seed_basic(&db);
    let api = schedule_api(&db);

    let result = api
        .generate_schedule(&GenerateScheduleParams {
            start_date: Some("2026-03-01".to_string()),
            ..GenerateScheduleParams::default()
        })
        .unwrap();

    let runs = api.list_recent_runs(5).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, result.run_id);

    assert!(matches!(
        api.list_recent_runs(0).unwrap_err(),
        ApiError::InvalidInput(_)
    ));
}

// ==========================================
// 本地化提示文案
// ==========================================

#[test]
fn test_violation_messages_localized() {
    exam_scheduler::i18n::set_locale("fr");
    let msg = violation_message(ConstraintViolation::RoomOverlap);
    assert!(msg.contains("salle"));

    exam_scheduler::i18n::set_locale("en");
    let msg = violation_message(ConstraintViolation::DuplicateModuleExam);
    assert!(msg.contains("already has a scheduled exam"));

    exam_scheduler::i18n::set_locale("fr");
}
