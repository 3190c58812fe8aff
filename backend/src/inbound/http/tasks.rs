//! Personal task API handlers.
//!
//! Tasks are scoped to the calling user; there is no cross-user
//! visibility.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::Page;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, Task, TaskDraft, TaskId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{page_request, require};

/// Task creation / replacement request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// Short title.
    pub title: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Due timestamp.
    pub deadline: Option<DateTime<Utc>>,
}

impl TaskRequest {
    fn into_draft(self) -> Result<TaskDraft, Error> {
        Ok(TaskDraft {
            title: require(self.title, "title")?,
            description: require(self.description, "description")?,
            deadline: require(self.deadline, "deadline")?,
        })
    }
}

/// Pagination query parameters.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to 100.
    pub limit: Option<u32>,
}

fn parse_id(raw: &str) -> Result<TaskId, Error> {
    TaskId::from_str(raw).map_err(|_| Error::not_found("task not found"))
}

/// Create a task for the calling user.
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = TaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("")]
pub async fn create(
    state: web::Data<HttpState>,
    auth: AuthUser,
    payload: web::Json<TaskRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let task = state.tasks.create(auth.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(task))
}

/// List the calling user's tasks, newest first.
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(PageQuery),
    responses(
        (status = 200, description = "Tasks page", body = Page<Task>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("")]
pub async fn list(
    state: web::Data<HttpState>,
    auth: AuthUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<Task>>> {
    let page = page_request(query.page, query.limit)?;
    let result = state.tasks.list(auth.user_id(), page).await?;
    Ok(web::Json(result))
}

/// Fetch one of the calling user's tasks.
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task", body = Task),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Task belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "getTask"
)]
#[get("/{id}")]
pub async fn get(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Task>> {
    let id = parse_id(&path)?;
    let task = state.tasks.get(id, auth.user_id()).await?;
    Ok(web::Json(task))
}

/// Replace one of the calling user's tasks.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Task belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
    payload: web::Json<TaskRequest>,
) -> ApiResult<web::Json<Task>> {
    let id = parse_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    let task = state.tasks.edit(id, auth.user_id(), draft).await?;
    Ok(web::Json(task))
}

/// Delete one of the calling user's tasks.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Task belongs to another user", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.tasks.delete(id, auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "task removed" })))
}
