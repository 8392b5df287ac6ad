//! In-memory record store. One explicitly constructed instance owns every
//! record for the process lifetime; callers inject it wherever records are
//! needed, so tests get isolated instances instead of shared global state.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::model::{
    Category, Memo, MemoPatch, NewCategory, NewMemo, NewReminder, NewTag, NewTodo, NotifyMethod,
    Page, PageInfo, PageRequest, Reminder, Tag, Todo, TodoPatch, TodoStatus,
};

/// Authoritative in-memory collections for all record types.
///
/// Identifiers are random UUIDs, unique within the process; collisions are
/// treated as negligible. There is no interior locking: callers serialize
/// access themselves.
#[derive(Debug, Default)]
pub struct RecordStore {
    todos: Vec<Todo>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    reminders: Vec<Reminder>,
    memos: Vec<Memo>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with demonstration data, so a fresh process
    /// has something to serve.
    pub fn with_sample_data() -> Self {
        let mut store = Self::new();

        let work = store.create_category(NewCategory {
            name: "Work".to_string(),
            color: Some("#ff5722".to_string()),
        });
        let personal = store.create_category(NewCategory {
            name: "Personal".to_string(),
            color: Some("#2196f3".to_string()),
        });
        let shopping = store.create_category(NewCategory {
            name: "Shopping".to_string(),
            color: Some("#4caf50".to_string()),
        });

        let important = store.create_tag(NewTag {
            name: "Important".to_string(),
        });
        let urgent = store.create_tag(NewTag {
            name: "Urgent".to_string(),
        });
        store.create_tag(NewTag {
            name: "Later".to_string(),
        });

        let memo = store.create_memo(NewMemo {
            content: Some("Remember to check the documentation".to_string()),
            attachments: None,
        });

        let proposal = store.create_todo(NewTodo {
            title: "Complete project proposal".to_string(),
            description: Some("Draft the project proposal for the client meeting".to_string()),
            status: Some(TodoStatus::InProgress),
            due_date: Some(Utc::now() + Duration::days(2)),
            category_id: Some(work.id),
            tag_ids: Some(vec![important.id, urgent.id]),
            memo_id: Some(memo.id),
        });
        store.create_todo(NewTodo {
            title: "Buy groceries".to_string(),
            description: Some("Get milk, eggs, bread, and vegetables".to_string()),
            status: Some(TodoStatus::Pending),
            due_date: Some(Utc::now() + Duration::days(1)),
            category_id: Some(shopping.id),
            ..NewTodo::default()
        });
        store.create_todo(NewTodo {
            title: "Go for a run".to_string(),
            description: Some("Run for 30 minutes in the park".to_string()),
            status: Some(TodoStatus::Completed),
            category_id: Some(personal.id),
            ..NewTodo::default()
        });

        store.create_reminder(
            proposal.id,
            NewReminder {
                time: Utc::now() + Duration::hours(1),
                notify_method: Some(NotifyMethod::Email),
            },
        );

        store
    }

    /// Lists todos matching the status filter, sliced to the requested page.
    /// The slice is computed fresh on every call; `total` counts the whole
    /// filtered sequence, not the page.
    pub fn list_todos(
        &self,
        status: Option<TodoStatus>,
        pagination: Option<PageRequest>,
    ) -> Page<Todo> {
        let pagination = pagination.unwrap_or_default();
        let filtered: Vec<&Todo> = self
            .todos
            .iter()
            .filter(|todo| status.is_none_or(|wanted| todo.status == wanted))
            .collect();
        let total = filtered.len() as u64;

        let start = pagination.page.saturating_sub(1).saturating_mul(pagination.limit) as usize;
        let data = filtered
            .into_iter()
            .skip(start)
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        Page {
            data,
            pagination: PageInfo {
                total,
                page: pagination.page,
                limit: pagination.limit,
            },
        }
    }

    pub fn todo(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn create_todo(&mut self, new: NewTodo) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            status: new.status.unwrap_or_default(),
            due_date: new.due_date,
            category_id: new.category_id,
            tag_ids: new.tag_ids,
            memo_id: new.memo_id,
        };
        self.todos.push(todo.clone());
        todo
    }

    /// Applies a patch field-by-field; absent fields keep their value.
    /// Returns `None` when no todo has the given id.
    pub fn update_todo(&mut self, id: Uuid, patch: TodoPatch) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|todo| todo.id == id)?;
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(description) = patch.description {
            todo.description = Some(description);
        }
        if let Some(status) = patch.status {
            todo.status = status;
        }
        if let Some(due_date) = patch.due_date {
            todo.due_date = Some(due_date);
        }
        if let Some(category_id) = patch.category_id {
            todo.category_id = Some(category_id);
        }
        if let Some(tag_ids) = patch.tag_ids {
            todo.tag_ids = Some(tag_ids);
        }
        if let Some(memo_id) = patch.memo_id {
            todo.memo_id = Some(memo_id);
        }
        Some(todo.clone())
    }

    /// Deletes a todo and, as part of the same operation, every reminder
    /// owned by it. Referential integrity of the todo/reminder relationship
    /// lives here and nowhere else.
    pub fn delete_todo(&mut self, id: Uuid) -> bool {
        let Some(index) = self.todos.iter().position(|todo| todo.id == id) else {
            return false;
        };
        self.todos.remove(index);
        self.reminders.retain(|reminder| reminder.todo_id != id);
        true
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn create_category(&mut self, new: NewCategory) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            color: new.color,
        };
        self.categories.push(category.clone());
        category
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn create_tag(&mut self, new: NewTag) -> Tag {
        let tag = Tag {
            id: Uuid::new_v4(),
            name: new.name,
        };
        self.tags.push(tag.clone());
        tag
    }

    pub fn reminders_for(&self, todo_id: Uuid) -> Vec<Reminder> {
        self.reminders
            .iter()
            .filter(|reminder| reminder.todo_id == todo_id)
            .cloned()
            .collect()
    }

    pub fn create_reminder(&mut self, todo_id: Uuid, new: NewReminder) -> Reminder {
        let reminder = Reminder {
            id: Uuid::new_v4(),
            todo_id,
            time: new.time,
            notify_method: new.notify_method,
        };
        self.reminders.push(reminder.clone());
        reminder
    }

    pub fn memo(&self, id: Uuid) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    pub fn create_memo(&mut self, new: NewMemo) -> Memo {
        let memo = Memo {
            id: Uuid::new_v4(),
            content: new.content,
            attachments: new.attachments,
        };
        self.memos.push(memo.clone());
        memo
    }

    pub fn update_memo(&mut self, id: Uuid, patch: MemoPatch) -> Option<Memo> {
        let memo = self.memos.iter_mut().find(|memo| memo.id == id)?;
        if let Some(content) = patch.content {
            memo.content = Some(content);
        }
        if let Some(attachments) = patch.attachments {
            memo.attachments = Some(attachments);
        }
        Some(memo.clone())
    }
}
