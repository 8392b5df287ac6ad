//! Drives the real remote client and state stores against the real router
//! served on an ephemeral local port.

use chrono::Utc;
use todo_client::remote::{NETWORK_ERROR_CODE, RemoteClient, TodoApi};
use todo_client::store::{CategoryStore, StatusFilter, TagStore, TodoStore};
use todo_core::RecordStore;
use todo_core::model::{
    MemoPatch, NewCategory, NewMemo, NewReminder, NewTag, NewTodo, NotifyMethod, TodoPatch,
    TodoStatus,
};
use todo_server::web::{AppState, create_router};

async fn spawn_server(store: RecordStore) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let app = create_router(AppState::new(store));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/api")
}

#[tokio::test]
async fn created_todo_defaults_to_pending_and_reads_back_identically() {
    let base = spawn_server(RecordStore::new()).await;
    let client = RemoteClient::with_base_url(base);

    let created = client
        .create_todo(&NewTodo {
            title: "Buy milk".to_string(),
            ..NewTodo::default()
        })
        .await
        .expect("create");
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.status, TodoStatus::Pending);

    let fetched = client.todo(created.id).await.expect("read back");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn server_failures_arrive_normalized() {
    let base = spawn_server(RecordStore::new()).await;
    let client = RemoteClient::with_base_url(base);

    let err = client
        .todo(uuid::Uuid::new_v4())
        .await
        .expect_err("missing todo");
    assert!(err.is_not_found());
    assert_eq!(err.code, "404");
    assert_eq!(err.message, "Todo not found");
    assert!(err.details.is_some(), "the envelope body rides along");

    let err = client
        .create_todo(&NewTodo {
            title: String::new(),
            ..NewTodo::default()
        })
        .await
        .expect_err("empty title");
    assert_eq!(err.code, "400");
    assert_eq!(err.message, "Title is required");
}

#[tokio::test]
async fn unreachable_server_yields_the_network_sentinel() {
    // Port 9 is discard/unassigned; nothing listens there.
    let client = RemoteClient::with_base_url("http://127.0.0.1:9/api");

    let err = client
        .todo(uuid::Uuid::new_v4())
        .await
        .expect_err("no server");
    assert_eq!(err.code, NETWORK_ERROR_CODE);
    assert!(err.message.contains("No response from server"));
}

#[tokio::test]
async fn todo_store_round_trip_against_live_server() {
    let base = spawn_server(RecordStore::new()).await;
    let mut store = TodoStore::new(RemoteClient::with_base_url(base));

    store.fetch_todos(None, None).await.expect("empty fetch");
    assert!(store.todos().is_empty());
    assert_eq!(store.total_todos(), 0);

    let created = store
        .create_todo(NewTodo {
            title: "Write report".to_string(),
            ..NewTodo::default()
        })
        .await
        .expect("create");
    assert_eq!(store.todos().first().map(|t| t.id), Some(created.id));

    store
        .update_todo(
            created.id,
            TodoPatch {
                status: Some(TodoStatus::Completed),
                ..TodoPatch::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(store.todos()[0].status, TodoStatus::Completed);

    store
        .set_filter(StatusFilter::Only(TodoStatus::Pending))
        .await
        .expect("filtered fetch");
    assert!(store.todos().is_empty(), "no pending todos exist");
    assert_eq!(store.error(), None);

    store
        .set_filter(StatusFilter::All)
        .await
        .expect("unfiltered fetch");
    assert_eq!(store.todos().len(), 1);

    store.delete_todo(created.id).await.expect("delete");
    assert!(store.todos().is_empty());
}

#[tokio::test]
async fn reminders_and_memos_flow_through_the_client() {
    let mut records = RecordStore::new();
    let memo = records.create_memo(NewMemo {
        content: Some("check the docs".to_string()),
        attachments: None,
    });
    let base = spawn_server(records).await;
    let mut client = RemoteClient::with_base_url(base);
    // Exercise the bearer-token path; the server does not enforce it.
    client.set_token("test-token");

    let todo = client
        .create_todo(&NewTodo {
            title: "With extras".to_string(),
            memo_id: Some(memo.id),
            ..NewTodo::default()
        })
        .await
        .expect("create");

    let reminder = client
        .create_reminder(
            todo.id,
            &NewReminder {
                time: Utc::now() + chrono::Duration::hours(1),
                notify_method: Some(NotifyMethod::Email),
            },
        )
        .await
        .expect("create reminder");
    assert_eq!(reminder.todo_id, todo.id);

    let reminders = client.reminders_for(todo.id).await.expect("list reminders");
    assert_eq!(reminders, vec![reminder]);

    let fetched = client.memo(memo.id).await.expect("fetch memo");
    assert_eq!(fetched.content.as_deref(), Some("check the docs"));

    let updated = client
        .update_memo(
            memo.id,
            &MemoPatch {
                content: Some("updated".to_string()),
                attachments: None,
            },
        )
        .await
        .expect("update memo");
    assert_eq!(updated.content.as_deref(), Some("updated"));
}

#[tokio::test]
async fn category_and_tag_stores_follow_the_same_protocol() {
    let base = spawn_server(RecordStore::new()).await;
    let client = RemoteClient::with_base_url(base);

    let mut categories = CategoryStore::new(client.clone());
    categories.fetch_categories().await.expect("fetch");
    assert!(categories.categories().is_empty());

    let created = categories
        .create_category(NewCategory {
            name: "Work".to_string(),
            color: Some("#ff5722".to_string()),
        })
        .await
        .expect("create category");
    assert_eq!(categories.categories(), &[created]);

    let mut tags = TagStore::new(client);
    tags.create_tag(NewTag {
        name: "Urgent".to_string(),
    })
    .await
    .expect("create tag");
    tags.fetch_tags().await.expect("fetch tags");
    assert_eq!(tags.tags().len(), 1);
    assert_eq!(tags.tags()[0].name, "Urgent");
    assert_eq!(tags.error(), None);
}

#[tokio::test]
async fn non_envelope_failures_fall_back_to_the_status_message() {
    use axum::http::StatusCode;
    use axum::routing::get;

    // A stub that answers plain text instead of the error envelope.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let app = axum::Router::new().route(
        "/api/todos/{id}",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let client = RemoteClient::with_base_url(format!("http://{addr}/api"));
    let err = client
        .todo(uuid::Uuid::new_v4())
        .await
        .expect_err("stubbed 500");
    assert_eq!(err.code, "500");
    assert_eq!(err.message, "Server error: 500");
    assert_eq!(err.details, None);
}
