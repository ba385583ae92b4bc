//! Issue CRUD proxy endpoints.
//!
//! Thin translation of REST calls to the upstream Issues API; the
//! webhook core and these routes share nothing beyond the upstream
//! issue numbering.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;
use octobridge_github::{Issue, IssueComment, ListIssuesParams, NewIssue, UpdateIssue};

/// Create a new issue upstream.
/// POST /issues
pub async fn create_issue(
    State(state): State<AppState>,
    Json(request): Json<NewIssue>,
) -> ApiResult<Response> {
    let issue = state.issues.create_issue(&request).await?;

    let location = format!("/issues/{}", issue.number);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(issue),
    )
        .into_response())
}

/// List issues with GitHub's pagination semantics.
/// GET /issues
pub async fn list_issues(
    State(state): State<AppState>,
    Query(params): Query<ListIssuesParams>,
) -> ApiResult<Json<Vec<Issue>>> {
    let issues = state.issues.list_issues(&params).await?;

    Ok(Json(issues))
}

/// Get a single issue by number.
/// GET /issues/:number
pub async fn get_issue(
    State(state): State<AppState>,
    Path(number): Path<i64>,
) -> ApiResult<Json<Issue>> {
    let issue = state.issues.get_issue(number).await?;

    Ok(Json(issue))
}

/// Update an existing issue.
/// PATCH /issues/:number
pub async fn update_issue(
    State(state): State<AppState>,
    Path(number): Path<i64>,
    Json(request): Json<UpdateIssue>,
) -> ApiResult<Json<Issue>> {
    let issue = state.issues.update_issue(number, &request).await?;

    Ok(Json(issue))
}

/// Request body for adding a comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

/// Add a comment to an issue.
/// POST /issues/:number/comments
pub async fn comment_issue(
    State(state): State<AppState>,
    Path(number): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<IssueComment>)> {
    let comment = state.issues.create_comment(number, &request.body).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
