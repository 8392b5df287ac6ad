//! Client state stores: an in-browser-style cache of server records plus
//! the mutation protocol every operation follows (set loading, clear error,
//! call the remote client, reconcile the cache, record failures).

use uuid::Uuid;

use todo_core::model::{
    Category, NewCategory, NewTag, NewTodo, Page, Tag, Todo, TodoPatch, TodoStatus,
};

use crate::remote::{ApiError, CategoryApi, TagApi, TodoApi, TodoListQuery};

const DEFAULT_PAGE_SIZE: u64 = 20;

/// Active status filter. `All` means "no status filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TodoStatus),
}

impl StatusFilter {
    pub fn status(self) -> Option<TodoStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

/// A cache transition. Successful remote calls are merged into the cache
/// exclusively through [`TodoStore::apply`], so the reconciliation rules
/// are testable without any network.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    /// A fetch resolved: the page contents replace the cached list wholesale.
    PageLoaded(Page<Todo>),
    /// A fetch came back not-found: legitimately empty, not a failure.
    PageEmpty,
    /// A single-record fetch resolved into the current selection.
    TodoLoaded(Todo),
    /// A create resolved: the server-assigned record is prepended.
    TodoCreated(Todo),
    /// An update resolved: the record replaces its cached entry by id.
    TodoUpdated(Todo),
    /// A delete resolved: the cached entry is removed by id.
    TodoDeleted(Uuid),
}

/// Cached todo list and the orchestration of every mutation against the
/// remote API. The cache is a non-authoritative copy of the current
/// filter/page and is reconciled after each call; on failure it keeps its
/// last-known-good contents.
#[derive(Debug)]
pub struct TodoStore<C> {
    client: C,
    todos: Vec<Todo>,
    loading: bool,
    error: Option<String>,
    current_page: u64,
    total_pages: u64,
    limit: u64,
    total_todos: u64,
    current_todo: Option<Todo>,
    filter: StatusFilter,
    fetch_seq: u64,
}

impl<C: TodoApi> TodoStore<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            todos: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            total_pages: 1,
            limit: DEFAULT_PAGE_SIZE,
            total_todos: 0,
            current_todo: None,
            filter: StatusFilter::All,
            fetch_seq: 0,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn total_todos(&self) -> u64 {
        self.total_todos
    }

    pub fn current_todo(&self) -> Option<&Todo> {
        self.current_todo.as_ref()
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Merges one successful result into the cache.
    pub fn apply(&mut self, event: CacheEvent) {
        match event {
            CacheEvent::PageLoaded(page) => {
                self.todos = page.data;
                self.current_page = page.pagination.page;
                self.total_todos = page.pagination.total;
                let limit = page.pagination.limit.max(1);
                self.total_pages = page.pagination.total.div_ceil(limit);
            }
            CacheEvent::PageEmpty => {
                self.todos.clear();
                self.total_todos = 0;
                self.total_pages = 0;
            }
            CacheEvent::TodoLoaded(todo) => {
                self.current_todo = Some(todo);
            }
            CacheEvent::TodoCreated(todo) => {
                self.todos.insert(0, todo);
            }
            CacheEvent::TodoUpdated(todo) => {
                if let Some(cached) = self.todos.iter_mut().find(|t| t.id == todo.id) {
                    *cached = todo.clone();
                }
                if self.current_todo.as_ref().is_some_and(|t| t.id == todo.id) {
                    self.current_todo = Some(todo);
                }
            }
            CacheEvent::TodoDeleted(id) => {
                self.todos.retain(|t| t.id != id);
            }
        }
    }

    /// Starts a fetch: flags loading, clears the error, and issues a
    /// sequence number. The newest issued fetch owns the cache.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.loading = true;
        self.error = None;
        self.fetch_seq
    }

    /// Completes a fetch. Results of superseded fetches are discarded
    /// outright so a slow earlier response can never overwrite a newer one.
    /// A not-found failure means "no data", not an error; every other
    /// failure is recorded and re-raised, leaving the cache untouched.
    pub fn resolve_fetch(
        &mut self,
        seq: u64,
        result: Result<Page<Todo>, ApiError>,
    ) -> Result<(), ApiError> {
        if seq != self.fetch_seq {
            return Ok(());
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.apply(CacheEvent::PageLoaded(page));
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                self.apply(CacheEvent::PageEmpty);
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.message.clone());
                Err(err)
            }
        }
    }

    /// Fetches a page of todos. The effective status filter is the explicit
    /// `status` when given, otherwise the active filter.
    pub async fn fetch_todos(
        &mut self,
        page: Option<u64>,
        status: Option<TodoStatus>,
    ) -> Result<(), ApiError> {
        let seq = self.begin_fetch();
        let query = TodoListQuery {
            status: status.or(self.filter.status()),
            page: Some(page.unwrap_or(1)),
            limit: Some(self.limit),
        };
        let result = self.client.list_todos(&query).await;
        self.resolve_fetch(seq, result)
    }

    /// Loads one todo into the current selection.
    pub async fn fetch_todo_by_id(&mut self, id: Uuid) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.todo(id).await {
            Ok(todo) => {
                self.loading = false;
                self.apply(CacheEvent::TodoLoaded(todo));
                Ok(())
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Creates a todo and prepends the server-assigned record to the cache.
    /// No re-fetch is issued.
    pub async fn create_todo(&mut self, new: NewTodo) -> Result<Todo, ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.create_todo(&new).await {
            Ok(created) => {
                self.loading = false;
                self.apply(CacheEvent::TodoCreated(created.clone()));
                Ok(created)
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Updates a todo, replacing its cached entry and the current selection
    /// when it carries the same id.
    pub async fn update_todo(&mut self, id: Uuid, patch: TodoPatch) -> Result<Todo, ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.update_todo(id, &patch).await {
            Ok(updated) => {
                self.loading = false;
                self.apply(CacheEvent::TodoUpdated(updated.clone()));
                Ok(updated)
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Deletes a todo and removes its cached entry.
    pub async fn delete_todo(&mut self, id: Uuid) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.delete_todo(id).await {
            Ok(()) => {
                self.loading = false;
                self.apply(CacheEvent::TodoDeleted(id));
                Ok(())
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    /// Changes the active filter, resets to page 1 and fetches under the new
    /// filter. The previously cached list stays visible until the fetch
    /// resolves, so a slow fetch briefly shows stale data under the new
    /// filter label.
    pub async fn set_filter(&mut self, filter: StatusFilter) -> Result<(), ApiError> {
        self.filter = filter;
        self.fetch_todos(Some(1), None).await
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn record_failure(&mut self, err: ApiError) -> ApiError {
        self.loading = false;
        self.error = Some(err.message.clone());
        err
    }
}

/// Cached category list; fetch replaces, create appends (unpaginated).
#[derive(Debug)]
pub struct CategoryStore<C> {
    client: C,
    categories: Vec<Category>,
    loading: bool,
    error: Option<String>,
}

impl<C: CategoryApi> CategoryStore<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            categories: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch_categories(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.categories().await {
            Ok(categories) => {
                self.categories = categories;
                self.loading = false;
                Ok(())
            }
            Err(err) => {
                self.loading = false;
                self.error = Some(err.message.clone());
                Err(err)
            }
        }
    }

    pub async fn create_category(&mut self, new: NewCategory) -> Result<Category, ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.create_category(&new).await {
            Ok(created) => {
                self.categories.push(created.clone());
                self.loading = false;
                Ok(created)
            }
            Err(err) => {
                self.loading = false;
                self.error = Some(err.message.clone());
                Err(err)
            }
        }
    }
}

/// Cached tag list; same protocol as [`CategoryStore`].
#[derive(Debug)]
pub struct TagStore<C> {
    client: C,
    tags: Vec<Tag>,
    loading: bool,
    error: Option<String>,
}

impl<C: TagApi> TagStore<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            tags: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch_tags(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.tags().await {
            Ok(tags) => {
                self.tags = tags;
                self.loading = false;
                Ok(())
            }
            Err(err) => {
                self.loading = false;
                self.error = Some(err.message.clone());
                Err(err)
            }
        }
    }

    pub async fn create_tag(&mut self, new: NewTag) -> Result<Tag, ApiError> {
        self.loading = true;
        self.error = None;
        match self.client.create_tag(&new).await {
            Ok(created) => {
                self.tags.push(created.clone());
                self.loading = false;
                Ok(created)
            }
            Err(err) => {
                self.loading = false;
                self.error = Some(err.message.clone());
                Err(err)
            }
        }
    }
}
