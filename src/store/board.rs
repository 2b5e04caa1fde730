use super::models::{Task, TaskStatus};

/// One status bucket of the kanban board.
#[derive(Debug)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    pub fn title(&self) -> String {
        format!("{} ({})", self.status.label(), self.tasks.len())
    }
}

/// The scoped task set split into the fixed `todo`, `in_progress`,
/// `completed` columns. Input order is preserved within each column.
#[derive(Debug)]
pub struct Board<'a> {
    pub columns: [Column<'a>; 3],
}

impl<'a> Board<'a> {
    pub fn partition<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut columns = TaskStatus::ALL.map(|status| Column {
            status,
            tasks: Vec::new(),
        });
        for task in tasks {
            columns[task.status.index()].tasks.push(task);
        }
        Board { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &Column<'a> {
        &self.columns[status.index()]
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            description: None,
            priority: crate::store::Priority::Medium,
            status,
            due_date: None,
            project_id: Some("p1".into()),
            created_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn partition_is_disjoint_and_exhaustive() {
        let tasks = vec![
            task("a", TaskStatus::Todo),
            task("b", TaskStatus::Completed),
            task("c", TaskStatus::InProgress),
            task("d", TaskStatus::Todo),
            task("e", TaskStatus::Completed),
        ];
        let board = Board::partition(&tasks);

        assert_eq!(board.len(), tasks.len());
        let mut seen = HashSet::new();
        for column in &board.columns {
            for t in &column.tasks {
                assert_eq!(t.status, column.status);
                assert!(seen.insert(t.id.as_str()), "{} appears twice", t.id);
            }
        }
        assert_eq!(seen.len(), tasks.len());
    }

    #[test]
    fn partition_keeps_order_within_column() {
        let tasks = vec![
            task("first", TaskStatus::Todo),
            task("x", TaskStatus::InProgress),
            task("second", TaskStatus::Todo),
        ];
        let board = Board::partition(&tasks);
        let ids: Vec<&str> = board
            .column(TaskStatus::Todo)
            .tasks
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn empty_board_has_three_titled_columns() {
        let board = Board::partition(std::iter::empty());
        assert!(board.is_empty());
        let titles: Vec<String> = board.columns.iter().map(Column::title).collect();
        assert_eq!(titles, ["To Do (0)", "In Progress (0)", "Completed (0)"]);
    }
}
