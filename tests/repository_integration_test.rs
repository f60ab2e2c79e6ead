// ==========================================
// 仓储层集成测试(存储网关约束兜底)
// ==========================================
// 职责: 验证五大硬约束在存储边界被独立强制,
//       与写入来源无关(自动排考或人工改数同样拦截)
// ==========================================


use chrono::{NaiveDate, NaiveTime};
use exam_scheduler::domain::exam::{Exam, NewExam};
use exam_scheduler::domain::types::ConstraintViolation;
use exam_scheduler::repository::{ExamFilter, RepositoryError};
use test_helpers::TestDb;

// ==========================================
// 测试辅助函数
// ==========================================

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn new_exam(module_id: i64, professor_id: i64, room_id: i64, d: u32, h: u32) -> NewExam {
    NewExam {
        exam_date: date(d),
        start_time: time(h, 0),
        duration_minutes: 120,
        module_id,
        professor_id,
        room_id,
    }
}

/// 基础场景: 一个院系、两个专业(各有学生)、若干课程/教师/教室
struct Fixture {
    formation_a: i64,
    formation_b: i64,
    module_a1: i64,
    module_a2: i64,
    module_b1: i64,
    professor_1: i64,
    professor_2: i64,
    room_small: i64,
    room_large: i64,
}

fn seed_fixture(db: &TestDb) -> Fixture {
    let dept = db.seed_department("Informatique");
    let formation_a = db.seed_formation_with_students("L3-INFO", dept, 20);
    let formation_b = db.seed_formation_with_students("M1-INFO", dept, 60);
    Fixture {
        formation_a,
        formation_b,
        module_a1: db.seed_module("Algorithmique", formation_a),
        module_a2: db.seed_module("Bases de données", formation_a),
        module_b1: db.seed_module("Compilation", formation_b),
        professor_1: db.seed_professor("Dupont", dept),
        professor_2: db.seed_professor("Martin", dept),
        room_small: db.seed_room("B101", 30),
        room_large: db.seed_room("Amphi", 100),
    }
}

// ==========================================
// 约束1: 一门课程至多一场考试
// ==========================================

#[test]
fn test_duplicate_module_exam_rejected() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap();

    // 同一课程,完全不同的时段/教师/教室,仍然拒绝
    let err = db
        .exams
        .create(&new_exam(fx.module_a1, fx.professor_2, fx.room_large, 5, 13))
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ConstraintViolation(ConstraintViolation::DuplicateModuleExam)
    ));
    assert_eq!(db.exams.count_all().unwrap(), 1);
}

// ==========================================
// 约束2: 教室容量
// ==========================================

#[test]
fn test_insufficient_capacity_rejected() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    // 60 人专业进 30 座教室
    let err = db
        .exams
        .create(&new_exam(fx.module_b1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ConstraintViolation(ConstraintViolation::InsufficientCapacity)
    ));

    // 100 座教室可容纳
    db.exams
        .create(&new_exam(fx.module_b1, fx.professor_1, fx.room_large, 1, 9))
        .unwrap();
}

// ==========================================
// 约束3: 同专业时间冲突
// ==========================================

#[test]
fn test_student_overlap_rejected_and_back_to_back_allowed() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap();

    // 同专业 10:00-12:00 与 09:00-11:00 重叠(教师/教室均不同)
    let err = db
        .exams
        .create(&new_exam(fx.module_a2, fx.professor_2, fx.room_large, 1, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ConstraintViolation(ConstraintViolation::StudentOverlap)
    ));

    // 半开区间: 11:00 紧邻上一场结束,允许
    db.exams
        .create(&new_exam(fx.module_a2, fx.professor_2, fx.room_large, 1, 11))
        .unwrap();
}

// ==========================================
// 约束4: 同教师时间冲突
// ==========================================

#[test]
fn test_professor_overlap_rejected() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap();

    // 不同专业不同教室,但同一教师时段重叠
    let err = db
        .exams
        .create(&new_exam(fx.module_b1, fx.professor_1, fx.room_large, 1, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ConstraintViolation(ConstraintViolation::ProfessorOverlap)
    ));
}

// ==========================================
// 约束5: 同教室时间冲突
// ==========================================

#[test]
fn test_room_overlap_rejected() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_large, 1, 9))
        .unwrap();

    // 不同专业不同教师,但同一教室时段重叠
    let err = db
        .exams
        .create(&new_exam(fx.module_b1, fx.professor_2, fx.room_large, 1, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ConstraintViolation(ConstraintViolation::RoomOverlap)
    ));
}

// ==========================================
// 人工改考路径(UPDATE 触发器)
// ==========================================

#[test]
fn test_manual_update_into_conflict_rejected() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap();
    let movable = db
        .exams
        .create(&new_exam(fx.module_b1, fx.professor_2, fx.room_large, 2, 9))
        .unwrap();

    // 把第二场改到与第一场同教师重叠的时段
    let conflicting = Exam {
        exam_date: date(1),
        start_time: time(10, 0),
        professor_id: fx.professor_1,
        ..movable.clone()
    };
    let err = db.exams.update(&conflicting).unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ConstraintViolation(ConstraintViolation::ProfessorOverlap)
    ));

    // 无冲突的改期被接受
    let relocated = Exam {
        exam_date: date(3),
        ..movable
    };
    db.exams.update(&relocated).unwrap();
    let reloaded = db.exams.find_by_id(relocated.id).unwrap().unwrap();
    assert_eq!(reloaded.exam_date, date(3));
}

#[test]
fn test_update_missing_exam_reports_not_found() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    let ghost = Exam {
        id: 9999,
        exam_date: date(1),
        start_time: time(9, 0),
        duration_minutes: 120,
        module_id: fx.module_a1,
        professor_id: fx.professor_1,
        room_id: fx.room_small,
    };
    assert!(matches!(
        db.exams.update(&ghost).unwrap_err(),
        RepositoryError::NotFound { .. }
    ));
    assert!(matches!(
        db.exams.delete(9999).unwrap_err(),
        RepositoryError::NotFound { .. }
    ));
}

// ==========================================
// 读取路径与统计
// ==========================================

#[test]
fn test_list_unscheduled_shrinks_as_exams_land() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    let before = db.modules.list_unscheduled().unwrap();
    assert_eq!(before.len(), 3);
    // 按课程 id 升序,携带专业/院系/人数
    assert_eq!(before[0].module_id, fx.module_a1);
    assert_eq!(before[0].student_count, 20);
    assert_eq!(before[2].module_id, fx.module_b1);
    assert_eq!(before[2].student_count, 60);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap();

    let after = db.modules.list_unscheduled().unwrap();
    assert_eq!(after.len(), 2);
    assert!(after.iter().all(|m| m.module_id != fx.module_a1));
}

#[test]
fn test_count_students_per_formation() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    assert_eq!(db.formations.count_students(fx.formation_a).unwrap(), 20);
    assert_eq!(db.formations.count_students(fx.formation_b).unwrap(), 60);
    // 不存在的专业计数为 0
    assert_eq!(db.formations.count_students(9999).unwrap(), 0);

    // 名册与计数一致
    let roster = db.students.list_by_formation(fx.formation_a).unwrap();
    assert_eq!(roster.len(), 20);
    assert!(roster.iter().all(|s| s.formation_id == fx.formation_a));
}

#[test]
fn test_master_data_finders() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    let departments = db.departments.list_all().unwrap();
    assert_eq!(departments.len(), 1);
    assert_eq!(departments[0].name, "Informatique");

    let formation = db.formations.find_by_id(fx.formation_a).unwrap().unwrap();
    assert_eq!(formation.name, "L3-INFO");
    assert_eq!(formation.department_id, departments[0].id);
    assert!(db.formations.find_by_id(9999).unwrap().is_none());

    let module = db.modules.find_by_id(fx.module_a1).unwrap().unwrap();
    assert_eq!(module.name, "Algorithmique");
    assert_eq!(module.formation_id, fx.formation_a);
    assert!(db.modules.find_by_id(9999).unwrap().is_none());

    let professors = db.professors.list_all().unwrap();
    assert_eq!(professors.len(), 2);
    assert_eq!(professors[0].id, fx.professor_1);

    let rooms = db.rooms.list_all().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].capacity, 30);
}

#[test]
fn test_list_with_details_and_filters() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 2, 9))
        .unwrap();
    db.exams
        .create(&new_exam(fx.module_b1, fx.professor_2, fx.room_large, 1, 9))
        .unwrap();

    // 全量列表按日期+时刻排序
    let all = db.exams.list_with_details(&ExamFilter::default()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].module_name, "Compilation");
    assert_eq!(all[0].room_name, "Amphi");
    assert_eq!(all[1].module_name, "Algorithmique");
    assert_eq!(all[1].professor_name, "Dupont");
    assert_eq!(all[1].department_name, "Informatique");

    // 按专业过滤
    let by_formation = db.exams.list_by_formation(fx.formation_a).unwrap();
    assert_eq!(by_formation.len(), 1);
    assert_eq!(by_formation[0].module_name, "Algorithmique");

    // 按教师过滤
    let by_professor = db.exams.list_by_professor(fx.professor_2).unwrap();
    assert_eq!(by_professor.len(), 1);
    assert_eq!(by_professor[0].module_name, "Compilation");
}

#[test]
fn test_kpi_rows_include_idle_resources() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap();

    let occupancy = db.exams.room_occupancy().unwrap();
    assert_eq!(occupancy.len(), 2);
    assert_eq!(occupancy[0].room_name, "B101");
    assert_eq!(occupancy[0].exam_count, 1);
    assert_eq!(occupancy[1].exam_count, 0);

    let load = db.exams.exams_per_professor().unwrap();
    assert_eq!(load.len(), 2);
    assert_eq!(load[0].professor_name, "Dupont");
    assert_eq!(load[0].exam_count, 1);
    assert_eq!(load[1].exam_count, 0);
}

#[test]
fn test_list_committed_carries_formation() {
    let db = TestDb::create().unwrap();
    let fx = seed_fixture(&db);

    db.exams
        .create(&new_exam(fx.module_a1, fx.professor_1, fx.room_small, 1, 9))
        .unwrap();

    let committed = db.exams.list_committed().unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].formation_id, fx.formation_a);
    assert_eq!(committed[0].duration_minutes, 120);
}
