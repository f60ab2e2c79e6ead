// Small dev utility: create the schema and seed a demo dataset
// (two departments, three formations, modules, professors, rooms, students).
//
// Usage:
//   cargo run --bin seed_sample_data -- [db_path]
//
// Intentionally lightweight; re-running against a seeded database will fail
// on the department UNIQUE constraint rather than duplicate the dataset.

use std::sync::{Arc, Mutex};

use exam_scheduler::db::{init_schema, open_sqlite_connection};
use exam_scheduler::domain::types::RoomKind;
use exam_scheduler::repository::{
    DepartmentRepository, FormationRepository, ModuleRepository, ProfessorRepository,
    RoomRepository, StudentRepository,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(|| "exam_scheduler.db".to_string());

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let departments = DepartmentRepository::from_connection(conn.clone());
    let formations = FormationRepository::from_connection(conn.clone());
    let modules = ModuleRepository::from_connection(conn.clone());
    let professors = ProfessorRepository::from_connection(conn.clone());
    let rooms = RoomRepository::from_connection(conn.clone());
    let students = StudentRepository::from_connection(conn);

    // Departments
    let dept_info = departments.insert("Informatique")?;
    let dept_math = departments.insert("Mathématiques")?;

    // Formations
    let licence_info = formations.insert("Licence Informatique", "L3", 6, dept_info)?;
    let master_info = formations.insert("Master Informatique", "M1", 4, dept_info)?;
    let licence_math = formations.insert("Licence Mathématiques", "L3", 5, dept_math)?;

    // Modules
    let algo = modules.insert("Algorithmique avancée", 6, licence_info, None)?;
    modules.insert("Bases de données", 5, licence_info, Some(algo))?;
    modules.insert("Systèmes d'exploitation", 5, licence_info, None)?;
    modules.insert("Apprentissage automatique", 6, master_info, None)?;
    modules.insert("Compilation", 4, master_info, None)?;
    modules.insert("Analyse réelle", 6, licence_math, None)?;
    modules.insert("Algèbre linéaire", 6, licence_math, None)?;

    // Professors
    professors.insert("Dupont", "Algorithmique", dept_info)?;
    professors.insert("Martin", "Bases de données", dept_info)?;
    professors.insert("Bernard", "Analyse", dept_math)?;

    // Rooms
    rooms.insert("Amphi A", 200, RoomKind::LectureHall, "Bâtiment A")?;
    rooms.insert("Salle B101", 40, RoomKind::Classroom, "Bâtiment B")?;
    rooms.insert("Salle B102", 60, RoomKind::Classroom, "Bâtiment B")?;

    // Students: 30 in Licence Info, 18 in Master Info, 25 in Licence Maths
    for i in 1..=30 {
        students.insert(&format!("etudiant_info_{:02}", i), 2026, licence_info)?;
    }
    for i in 1..=18 {
        students.insert(&format!("etudiant_master_{:02}", i), 2026, master_info)?;
    }
    for i in 1..=25 {
        students.insert(&format!("etudiant_math_{:02}", i), 2026, licence_math)?;
    }

    println!("seeded db={}", db_path);
    Ok(())
}
