// ==========================================
// 考试排程系统 - 资源选择引擎
// ==========================================
// 职责: 为课程生成有序的教师/教室候选列表
// 红线: 排序必须稳定,禁止任意集合迭代顺序
// ==========================================
// 教师排序: 同院系优先(软偏好),组内按 id 稳定排序;
//           编排器仍须按序尝试全部教师直至通过或耗尽
// 教室排序: 仅产出容量足够的教室,容量升序(紧致优先),
//           为同轮后续的大专业保留大教室
// ==========================================

use crate::domain::resources::{Professor, Room};

// ==========================================
// ResourceSelector - 资源选择引擎
// ==========================================
pub struct ResourceSelector {
    // 无状态引擎,不需要注入依赖
}

impl ResourceSelector {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 生成教师候选列表
    ///
    /// 课程所属院系的教师在前(按 id 升序),
    /// 其余教师在后(按 id 升序)。软偏好,不过滤任何教师。
    ///
    /// # 参数
    /// - professors: 全部教师(仓储按 id 升序给出)
    /// - department_id: 课程所属专业的院系 id
    pub fn candidate_professors(
        &self,
        professors: &[Professor],
        department_id: i64,
    ) -> Vec<Professor> {
        let mut candidates: Vec<Professor> = professors.to_vec();
        // 稳定排序: 同院系在前,组内保持 id 升序
        candidates.sort_by_key(|p| (p.department_id != department_id, p.id));
        candidates
    }

    /// 生成教室候选列表
    ///
    /// 仅保留容量 ≥ 专业在读人数的教室,容量升序、id 次序打破并列。
    /// 容量不足的教室在此一次性过滤,避免对必败候选浪费约束校验;
    /// 约束校验引擎的容量检查仅作兜底。
    ///
    /// # 参数
    /// - rooms: 全部教室(仓储按 id 升序给出)
    /// - student_count: 专业在读学生数
    ///
    /// # 返回
    /// 可容纳该专业的教室有序列表(可能为空)
    pub fn candidate_rooms(&self, rooms: &[Room], student_count: i64) -> Vec<Room> {
        let mut candidates: Vec<Room> = rooms
            .iter()
            .filter(|r| r.can_seat(student_count))
            .cloned()
            .collect();
        candidates.sort_by_key(|r| (r.capacity, r.id));
        candidates
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ResourceSelector {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RoomKind;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn professor(id: i64, department_id: i64) -> Professor {
        Professor {
            id,
            name: format!("P{}", id),
            specialty: String::new(),
            department_id,
        }
    }

    fn room(id: i64, capacity: i64) -> Room {
        Room {
            id,
            name: format!("R{}", id),
            capacity,
            kind: if capacity >= 100 {
                RoomKind::LectureHall
            } else {
                RoomKind::Classroom
            },
            building: "A".to_string(),
        }
    }

    // ==========================================
    // 教师排序测试
    // ==========================================

    #[test]
    fn test_same_department_professors_first() {
        let selector = ResourceSelector::new();
        let professors = vec![
            professor(1, 2),
            professor(2, 1),
            professor(3, 2),
            professor(4, 1),
        ];

        let ordered = selector.candidate_professors(&professors, 1);
        let ids: Vec<i64> = ordered.iter().map(|p| p.id).collect();
        // 院系1 的 2、4 在前,其余按 id 升序
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_no_professor_filtered_out() {
        let selector = ResourceSelector::new();
        let professors = vec![professor(1, 5), professor(2, 6)];
        // 无同院系教师时全员保留,按 id 升序
        let ordered = selector.candidate_professors(&professors, 1);
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].id, 1);
    }

    #[test]
    fn test_professor_order_is_stable() {
        let selector = ResourceSelector::new();
        let professors = vec![professor(3, 1), professor(1, 1), professor(2, 1)];
        let ordered = selector.candidate_professors(&professors, 1);
        let ids: Vec<i64> = ordered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    // ==========================================
    // 教室排序测试
    // ==========================================

    #[test]
    fn test_rooms_filtered_by_capacity() {
        let selector = ResourceSelector::new();
        let rooms = vec![room(1, 30), room(2, 60), room(3, 120)];

        let ordered = selector.candidate_rooms(&rooms, 50);
        let ids: Vec<i64> = ordered.iter().map(|r| r.id).collect();
        // 容量 30 被过滤,其余容量升序
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_tightest_fit_first() {
        let selector = ResourceSelector::new();
        let rooms = vec![room(1, 200), room(2, 55), room(3, 80)];

        let ordered = selector.candidate_rooms(&rooms, 50);
        let capacities: Vec<i64> = ordered.iter().map(|r| r.capacity).collect();
        assert_eq!(capacities, vec![55, 80, 200]);
    }

    #[test]
    fn test_equal_capacity_tie_break_by_id() {
        let selector = ResourceSelector::new();
        let rooms = vec![room(7, 60), room(3, 60), room(5, 60)];

        let ordered = selector.candidate_rooms(&rooms, 50);
        let ids: Vec<i64> = ordered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn test_no_room_large_enough_yields_empty() {
        let selector = ResourceSelector::new();
        let rooms = vec![room(1, 30), room(2, 40)];
        assert!(selector.candidate_rooms(&rooms, 50).is_empty());
    }

    #[test]
    fn test_exact_capacity_is_eligible() {
        let selector = ResourceSelector::new();
        let rooms = vec![room(1, 50)];
        assert_eq!(selector.candidate_rooms(&rooms, 50).len(), 1);
    }
}
