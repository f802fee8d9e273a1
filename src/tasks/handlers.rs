//! Task endpoints.
//!
//! | Method | Pattern               | Endpoint       |
//! |--------|-----------------------|----------------|
//! | POST   | `/tasks`              | `CreateTask`   |
//! | GET    | `/tasks?search=`      | `ListTasks`    |
//! | PUT    | `/tasks/:id`          | `ReplaceTask`  |
//! | DELETE | `/tasks/:id`          | `DeleteTask`   |
//! | PATCH  | `/tasks/:id/complete` | `CompleteTask` |

use axum::http::{Method, StatusCode};

use super::model::{NewTask, Task, TaskPatch};
use super::TASKS;
use crate::http::request::HandlerRequest;
use crate::http::response::{ApiError, Reply};
use crate::routing::{PatternError, Router};
use crate::store::{SearchCriteria, Store};

/// Fields matched by the `search` query parameter.
const SEARCH_FIELDS: [&str; 2] = ["title", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreateTask,
    ListTasks,
    ReplaceTask,
    DeleteTask,
    CompleteTask,
}

/// Build the task route table.
pub fn routes() -> Result<Router<Endpoint>, PatternError> {
    Router::new()
        .route(Method::POST, "/tasks", Endpoint::CreateTask)?
        .route(Method::GET, "/tasks", Endpoint::ListTasks)?
        .route(Method::PUT, "/tasks/:id", Endpoint::ReplaceTask)?
        .route(Method::DELETE, "/tasks/:id", Endpoint::DeleteTask)?
        .route(Method::PATCH, "/tasks/:id/complete", Endpoint::CompleteTask)
}

/// Run `endpoint` against the store.
pub async fn handle(endpoint: Endpoint, store: &Store<Task>, request: HandlerRequest) -> Result<Reply, ApiError> {
    match endpoint {
        Endpoint::CreateTask => {
            let task = NewTask::from_body(request.body)?.into_task(store.now());
            let task = store.insert(TASKS, task).await?;
            tracing::info!(task_id = %task.id, "Task created");
            Reply::json(StatusCode::CREATED, &task)
        }
        Endpoint::ListTasks => {
            let criteria = request
                .query
                .get("search")
                .filter(|search| !search.is_empty())
                .map(|search| SearchCriteria::any_field(SEARCH_FIELDS, search));
            let tasks = store.select(TASKS, criteria.as_ref()).await;
            Reply::json(StatusCode::OK, &tasks)
        }
        Endpoint::ReplaceTask => {
            let id = request.param("id")?;
            let patch = TaskPatch::from_body(request.body)?;
            let task = store.update(TASKS, &id, Some(patch)).await?;
            tracing::info!(task_id = %task.id, "Task updated");
            Reply::json(StatusCode::OK, &task)
        }
        Endpoint::DeleteTask => {
            let id = request.param("id")?;
            store.delete(TASKS, &id).await?;
            tracing::info!(task_id = %id, "Task deleted");
            Ok(Reply::empty(StatusCode::NO_CONTENT))
        }
        Endpoint::CompleteTask => {
            let id = request.param("id")?;
            let task = store.complete(TASKS, &id).await?;
            tracing::info!(task_id = %task.id, "Task completed");
            Reply::json(StatusCode::OK, &task)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{PathParams, QueryParams};
    use serde_json::{json, Value};

    async fn store(dir: &tempfile::TempDir) -> Store<Task> {
        Store::open(dir.path().join("db.json")).await.unwrap()
    }

    fn request(params: &[(&str, &str)], query: &[(&str, &str)], body: Option<Value>) -> HandlerRequest {
        HandlerRequest {
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<PathParams>(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<QueryParams>(),
            body,
        }
    }

    #[test]
    fn test_route_table_dispatches_every_endpoint() {
        let router = routes().unwrap();
        let cases = [
            (Method::POST, "/tasks", Endpoint::CreateTask),
            (Method::GET, "/tasks?search=x", Endpoint::ListTasks),
            (Method::PUT, "/tasks/1", Endpoint::ReplaceTask),
            (Method::DELETE, "/tasks/1", Endpoint::DeleteTask),
            (Method::PATCH, "/tasks/1/complete", Endpoint::CompleteTask),
        ];
        for (method, path, endpoint) in cases {
            assert_eq!(*router.match_request(&method, path).unwrap().handler, endpoint);
        }
        assert!(router.match_request(&Method::GET, "/tasks/1").is_err());
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let reply = handle(
            Endpoint::CreateTask,
            &store,
            request(&[], &[], Some(json!({"title": "A", "description": "B"}))),
        )
        .await
        .unwrap();
        assert_eq!(reply.status, StatusCode::CREATED);

        let tasks = store.select(TASKS, None).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "A");
        assert!(tasks[0].updated_at.is_none());

        let reply = handle(Endpoint::ListTasks, &store, request(&[], &[], None))
            .await
            .unwrap();
        assert_eq!(reply.body.unwrap()[0]["id"], tasks[0].id.as_str());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let err = handle(
            Endpoint::CreateTask,
            &store,
            request(&[], &[], Some(json!({"title": "A"}))),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::ValidationFailed(_)));
        assert_eq!(store.len(TASKS).await, 0);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_description() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        for (title, description) in [("Buy milk", "store"), ("Write", "MILKSHAKE recipe"), ("Call", "mom")] {
            store
                .insert(TASKS, Task::new(title, description, store.now()))
                .await
                .unwrap();
        }

        let reply = handle(Endpoint::ListTasks, &store, request(&[], &[("search", "milk")], None))
            .await
            .unwrap();

        let titles: Vec<String> = reply
            .body
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|task| task["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["Buy milk", "Write"]);
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        for endpoint in [Endpoint::DeleteTask, Endpoint::CompleteTask] {
            let err = handle(endpoint, &store, request(&[("id", "nope")], &[], None))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_complete_ignores_body() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let task = store
            .insert(TASKS, Task::new("t", "d", store.now()))
            .await
            .unwrap();

        let reply = handle(
            Endpoint::CompleteTask,
            &store,
            request(&[("id", task.id.as_str())], &[], Some(json!({"title": "ignored"}))),
        )
        .await
        .unwrap();

        let body = reply.body.unwrap();
        assert_eq!(body["title"], "t");
        assert!(body["completedAt"].is_string());
    }
}
