//! Core domain models and the in-memory record store for the todo application.
pub mod model;
pub mod store;

pub use model::{
    Category, Memo, MemoPatch, NewCategory, NewMemo, NewReminder, NewTag, NewTodo, NotifyMethod,
    Page, PageInfo, PageRequest, Reminder, Tag, Todo, TodoPatch, TodoStatus,
};
pub use store::RecordStore;
