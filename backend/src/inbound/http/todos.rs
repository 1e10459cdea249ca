//! Todo page and form handlers.
//!
//! ```text
//! GET  /                     page, or list envelope with ?agent=true
//! GET  /todos                list envelope (agent) or redirect to /
//! POST /todos                description=Buy+milk
//! POST /todos/{id}/toggle
//! POST /todos/{id}/delete
//! ```
//!
//! Storage failures never produce an error page under the default policy;
//! see [`StorageFailurePolicy`](super::failure_policy::StorageFailurePolicy).

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::{Description, Error, OwnerId, Todo, TodoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::OwnerIdentity;
use crate::inbound::http::render::{
    ActionEnvelope, CreatedEnvelope, ListEnvelope, agent_response, page_response, redirect_home,
};
use crate::inbound::http::render_mode::RenderMode;
use crate::inbound::http::state::HttpState;

/// Form field carrying the new todo's text.
pub const DESCRIPTION_FIELD: &str = "description";

/// Mutations addressable as `/todos/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoAction {
    Toggle,
    Delete,
}

impl TodoAction {
    /// Parse a path segment; unknown actions yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "toggle" => Some(Self::Toggle),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Parse the id path segment, falling back to `0` for non-numeric input.
///
/// Id 0 is never assigned, so the fallback can only ever miss.
///
/// # Examples
/// ```
/// use todo_backend::domain::TodoId;
/// use todo_backend::inbound::http::todos::parse_todo_id;
///
/// assert_eq!(parse_todo_id("42"), TodoId::new(42));
/// assert_eq!(parse_todo_id("abc"), TodoId::new(0));
/// ```
pub fn parse_todo_id(raw: &str) -> TodoId {
    match raw.parse::<i64>() {
        Ok(id) => TodoId::new(id),
        Err(err) => {
            warn!(raw, error = %err, "non-numeric todo id; using 0");
            TodoId::new(0)
        }
    }
}

/// First value of `name` in a urlencoded string.
fn form_value(encoded: &[u8], name: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

async fn load_todos(state: &HttpState, owner: &OwnerId) -> ApiResult<Vec<Todo>> {
    let listed = state.todos_query.list_todos(owner).await;
    state.storage_failures.apply(listed, Vec::new(), "list")
}

/// `GET /`.
pub async fn index(
    state: web::Data<HttpState>,
    identity: OwnerIdentity,
    mode: RenderMode,
) -> ApiResult<HttpResponse> {
    let owner = identity.owner();
    let todos = load_todos(&state, owner).await?;
    match mode {
        RenderMode::Human => Ok(page_response(&todos, owner)),
        RenderMode::Agent => agent_response(&ListEnvelope::new(&todos)),
    }
}

/// `GET /todos`.
pub async fn list_todos(
    state: web::Data<HttpState>,
    identity: OwnerIdentity,
    mode: RenderMode,
) -> ApiResult<HttpResponse> {
    if !mode.is_agent() {
        return Ok(redirect_home());
    }
    let todos = load_todos(&state, identity.owner()).await?;
    agent_response(&ListEnvelope::new(&todos))
}

/// `POST /todos`.
///
/// The description comes from the urlencoded body, falling back to the query
/// string. A missing or blank description is a failed create, not a client
/// error.
pub async fn create_todo(
    req: HttpRequest,
    state: web::Data<HttpState>,
    identity: OwnerIdentity,
    mode: RenderMode,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let owner = identity.owner();
    let raw = form_value(&body, DESCRIPTION_FIELD)
        .or_else(|| form_value(req.query_string().as_bytes(), DESCRIPTION_FIELD));

    let created = match raw.map(Description::new) {
        Some(Ok(description)) => {
            let result = state
                .todos_command
                .create_todo(owner, description)
                .await
                .map(Some);
            state.storage_failures.apply(result, None, "create")?
        }
        Some(Err(err)) => {
            debug!(owner = owner.session_prefix(), error = %err, "rejected todo description");
            None
        }
        None => {
            debug!(owner = owner.session_prefix(), "create without description field");
            None
        }
    };

    match mode {
        RenderMode::Human => Ok(redirect_home()),
        RenderMode::Agent => agent_response(&CreatedEnvelope::new(created.as_ref())),
    }
}

/// Segments two and three of an action path. Anything after them is ignored.
#[derive(Debug, Deserialize)]
pub struct TodoActionPath {
    id: String,
    action: String,
}

/// `POST /todos/{id}/{action}`.
///
/// Unknown actions, including an empty one, touch nothing and report
/// `success: false`.
pub async fn todo_action(
    state: web::Data<HttpState>,
    identity: OwnerIdentity,
    mode: RenderMode,
    path: web::Path<TodoActionPath>,
) -> ApiResult<HttpResponse> {
    let owner = identity.owner();
    let TodoActionPath {
        id: raw_id,
        action: raw_action,
    } = path.into_inner();
    let id = parse_todo_id(&raw_id);

    let success = match TodoAction::parse(&raw_action) {
        Some(TodoAction::Toggle) => {
            let result = state.todos_command.toggle_todo(owner, id).await;
            state.storage_failures.apply(result, false, "toggle")?
        }
        Some(TodoAction::Delete) => {
            let result = state.todos_command.delete_todo(owner, id).await;
            state.storage_failures.apply(result, false, "delete")?
        }
        None => {
            warn!(action = %raw_action, todo_id = %id, "unknown todo action");
            false
        }
    };

    match mode {
        RenderMode::Human => Ok(redirect_home()),
        RenderMode::Agent => agent_response(&ActionEnvelope {
            action: &raw_action,
            id,
            success,
        }),
    }
}

/// Paths under `/todos/` too short to name an id and an action.
pub async fn malformed_todo_path(
    req: HttpRequest,
    _identity: OwnerIdentity,
) -> ApiResult<HttpResponse> {
    Err(Error::invalid_request("Invalid path").with_details(json!({ "path": req.path() })))
}

#[cfg(test)]
#[path = "todos_tests.rs"]
mod tests;

#[cfg(test)]
mod parsing_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("toggle", Some(TodoAction::Toggle))]
    #[case("delete", Some(TodoAction::Delete))]
    #[case("Toggle", None)]
    #[case("archive", None)]
    #[case("", None)]
    fn todo_action_parses_known_segments(
        #[case] raw: &str,
        #[case] expected: Option<TodoAction>,
    ) {
        assert_eq!(TodoAction::parse(raw), expected);
    }

    #[rstest]
    #[case("7", 7)]
    #[case("-3", -3)]
    #[case("", 0)]
    #[case("abc", 0)]
    #[case("1.5", 0)]
    #[case("99999999999999999999", 0)]
    fn parse_todo_id_is_lenient(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_todo_id(raw), TodoId::new(expected));
    }

    #[rstest]
    fn form_value_takes_first_occurrence() {
        assert_eq!(
            form_value(b"description=one&description=two", "description"),
            Some("one".to_owned())
        );
        assert_eq!(form_value(b"other=1", "description"), None);
        assert_eq!(
            form_value(b"description=Buy+milk%21", "description"),
            Some("Buy milk!".to_owned())
        );
    }
}
