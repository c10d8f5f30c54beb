use chrono::Utc;

use crate::error::TaskError;
use crate::models::{Category, Notification, NotificationKind, Priority, Task, Timestamp};

/// Issues millisecond-based ids that are strictly increasing within a process,
/// even when several tasks are created within the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Seeds from existing numeric ids so restored tasks never collide with new ones.
    pub fn seeded(tasks: &[Task]) -> Self {
        let last = tasks
            .iter()
            .filter_map(|task| task.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next_id(&mut self, now: Timestamp) -> String {
        let candidate = now.timestamp_millis().max(self.last.saturating_add(1));
        self.last = candidate;
        candidate.to_string()
    }
}

/// A successful mutation, carrying the task as it looked afterwards
/// (or right before removal).
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Added(Task),
    Toggled(Task),
    Removed(Task),
    Edited(Task),
}

impl TaskOutcome {
    pub fn task(&self) -> &Task {
        match self {
            TaskOutcome::Added(task)
            | TaskOutcome::Toggled(task)
            | TaskOutcome::Removed(task)
            | TaskOutcome::Edited(task) => task,
        }
    }

    pub fn notification(&self) -> Notification {
        match self {
            TaskOutcome::Added(task) => Notification::new(
                NotificationKind::Success,
                format!("Task \"{}\" added successfully", task.text),
            ),
            TaskOutcome::Toggled(task) if task.completed => {
                Notification::new(NotificationKind::Success, "Task completed!")
            }
            TaskOutcome::Toggled(_) => {
                Notification::new(NotificationKind::Success, "Task marked as pending")
            }
            TaskOutcome::Removed(task) => Notification::new(
                NotificationKind::Info,
                format!("Task \"{}\" deleted", task.text),
            ),
            TaskOutcome::Edited(_) => {
                Notification::new(NotificationKind::Success, "Task updated successfully")
            }
        }
    }
}

/// Owns the task sequence, most recently added first.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: IdGenerator,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        let ids = IdGenerator::seeded(&tasks);
        Self { tasks, ids }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| !task.completed).collect()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.completed).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn add(
        &mut self,
        text: &str,
        priority: Priority,
        category: Category,
    ) -> Result<TaskOutcome, TaskError> {
        self.add_at(text, priority, category, Utc::now())
    }

    pub fn add_at(
        &mut self,
        text: &str,
        priority: Priority,
        category: Category,
        now: Timestamp,
    ) -> Result<TaskOutcome, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        let task = Task {
            id: self.unique_id(now),
            text: text.to_string(),
            completed: false,
            priority,
            category,
            due_date: None,
            created_at: now,
        };
        self.tasks.insert(0, task.clone());
        Ok(TaskOutcome::Added(task))
    }

    pub fn toggle(&mut self, task_id: &str) -> Result<TaskOutcome, TaskError> {
        let task = self.find_mut(task_id)?;
        task.completed = !task.completed;
        Ok(TaskOutcome::Toggled(task.clone()))
    }

    pub fn remove(&mut self, task_id: &str) -> Result<TaskOutcome, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
        Ok(TaskOutcome::Removed(self.tasks.remove(index)))
    }

    /// Blank text cancels the edit and leaves the task untouched.
    pub fn edit(&mut self, task_id: &str, new_text: &str) -> Result<TaskOutcome, TaskError> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        let task = self.find_mut(task_id)?;
        task.text = new_text.to_string();
        Ok(TaskOutcome::Edited(task.clone()))
    }

    /// A fresh id that no live task uses, even when restored ids sit at the top of the range.
    fn unique_id(&mut self, now: Timestamp) -> String {
        let base = self.ids.next_id(now);
        let mut id = base.clone();
        let mut suffix = 0u64;
        while self.get(&id).is_some() {
            suffix += 1;
            id = format!("{base}-{suffix}");
        }
        id
    }

    fn find_mut(&mut self, task_id: &str) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> Timestamp {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    fn add(store: &mut TaskStore, text: &str) -> Task {
        store
            .add(text, Priority::default(), Category::default())
            .expect("add should succeed")
            .task()
            .clone()
    }

    #[test]
    fn add_prepends_a_pending_task_with_defaults() {
        let mut store = TaskStore::default();
        add(&mut store, "first");
        let second = add(&mut store, "  second  ");

        assert_eq!(store.len(), 2);
        assert_eq!(store.pending()[0].id, second.id);
        assert_eq!(second.text, "second");
        assert!(!second.completed);
        assert_eq!(second.priority, Priority::Medium);
        assert_eq!(second.category, Category::Personal);
        assert_eq!(second.due_date, None);
    }

    #[test]
    fn add_rejects_empty_and_blank_text() {
        let mut store = TaskStore::default();
        assert_eq!(
            store.add("", Priority::High, Category::Work),
            Err(TaskError::EmptyText)
        );
        assert_eq!(
            store.add("   ", Priority::High, Category::Work),
            Err(TaskError::EmptyText)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_unique_within_the_same_millisecond() {
        let mut store = TaskStore::default();
        let now = at(1_700_000_000_000);
        let a = store.add_at("a", Priority::Low, Category::Work, now).unwrap();
        let b = store.add_at("b", Priority::Low, Category::Work, now).unwrap();
        assert_eq!(a.task().id, "1700000000000");
        assert_eq!(b.task().id, "1700000000001");
        assert_eq!(b.task().created_at, now);
    }

    #[test]
    fn id_generator_continues_after_restored_ids() {
        let mut seed = TaskStore::default();
        let restored = seed
            .add_at("old", Priority::Low, Category::Work, at(5_000))
            .unwrap();
        let mut store = TaskStore::new(seed.tasks().to_vec());
        let fresh = store
            .add_at("new", Priority::Low, Category::Work, at(1_000))
            .unwrap();
        assert_eq!(restored.task().id, "5000");
        assert_eq!(fresh.task().id, "5001");
    }

    #[test]
    fn huge_restored_ids_do_not_overflow() {
        let mut old = TaskStore::default();
        let mut task = old
            .add_at("old", Priority::Low, Category::Work, at(5_000))
            .unwrap()
            .task()
            .clone();
        task.id = i64::MAX.to_string();
        let mut store = TaskStore::new(vec![task]);
        let first = store
            .add_at("new", Priority::Low, Category::Work, at(1_000))
            .unwrap();
        let second = store
            .add_at("newer", Priority::Low, Category::Work, at(1_000))
            .unwrap();
        assert_eq!(store.len(), 3);
        let mut ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert_ne!(first.task().id, second.task().id);
    }

    #[test]
    fn toggle_is_its_own_inverse_and_messages_follow_state() {
        let mut store = TaskStore::default();
        let task = add(&mut store, "walk dog");

        let done = store.toggle(&task.id).unwrap();
        assert!(done.task().completed);
        assert_eq!(done.notification().message, "Task completed!");
        assert!(store.pending().is_empty());
        assert_eq!(store.completed().len(), 1);

        let undone = store.toggle(&task.id).unwrap();
        assert!(!undone.task().completed);
        assert_eq!(undone.notification().message, "Task marked as pending");
        assert_eq!(undone.notification().kind, NotificationKind::Success);
    }

    #[test]
    fn missing_ids_are_reported_not_found() {
        let mut store = TaskStore::default();
        assert_eq!(
            store.toggle("nope"),
            Err(TaskError::NotFound("nope".to_string()))
        );
        assert!(store.edit("nope", "text").is_err());
    }

    #[test]
    fn remove_twice_is_a_no_op_the_second_time() {
        let mut store = TaskStore::default();
        let task = add(&mut store, "call mom");

        let removed = store.remove(&task.id).unwrap();
        let notice = removed.notification();
        assert_eq!(notice.kind, NotificationKind::Info);
        assert_eq!(notice.message, "Task \"call mom\" deleted");

        assert!(matches!(store.remove(&task.id), Err(TaskError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn edit_replaces_text_unless_blank() {
        let mut store = TaskStore::default();
        let task = add(&mut store, "draft");

        assert_eq!(store.edit(&task.id, "  "), Err(TaskError::EmptyText));
        assert_eq!(store.get(&task.id).unwrap().text, "draft");

        let edited = store.edit(&task.id, " final ").unwrap();
        assert_eq!(edited.task().text, "final");
        assert_eq!(edited.notification().message, "Task updated successfully");
    }

    #[test]
    fn views_preserve_store_order() {
        let mut store = TaskStore::default();
        let a = add(&mut store, "a");
        let b = add(&mut store, "b");
        let c = add(&mut store, "c");
        store.toggle(&b.id).unwrap();

        let pending: Vec<_> = store.pending().iter().map(|t| t.id.clone()).collect();
        assert_eq!(pending, vec![c.id.clone(), a.id.clone()]);
        assert_eq!(store.pending_len(), 2);
        assert_eq!(store.completed()[0].id, b.id);
    }

    #[test]
    fn added_notification_quotes_the_trimmed_text() {
        let mut store = TaskStore::default();
        let outcome = store
            .add(" buy milk ", Priority::Low, Category::Personal)
            .unwrap();
        let notice = outcome.notification();
        assert_eq!(notice.kind, NotificationKind::Success);
        assert_eq!(notice.message, "Task \"buy milk\" added successfully");
    }
}
