//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::Value;

use crate::domain::TodoService;
use crate::domain::ports::FixtureTodoRepository;

use super::failure_policy::StorageFailurePolicy;
use super::identity::IDENTITY_COOKIE;
use super::routes::{not_found, todo_scope};
use super::state::HttpState;

/// Token owned by the first test browser.
pub const ALICE: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
/// Token owned by the second test browser.
pub const BOB: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

/// Handler state over a fresh in-memory repository.
pub fn fixture_state() -> HttpState {
    let service = Arc::new(TodoService::new(Arc::new(FixtureTodoRepository::default())));
    HttpState::from_service(service, StorageFailurePolicy::Degrade)
}

/// Todo routes wired to `state`, without the trace middleware.
pub fn todo_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(todo_scope(false))
        .default_service(web::to(not_found))
}

/// Identity cookie presenting `token`.
pub fn owner_cookie(token: &str) -> Cookie<'static> {
    Cookie::new(IDENTITY_COOKIE, token.to_owned())
}

/// Decode the JSON envelope embedded in an agent-mode document.
///
/// Panics when the document has no agent payload.
pub fn agent_payload(document: &str) -> Value {
    let start_tag = "id=\"agent-response\">";
    let start = document
        .find(start_tag)
        .map(|index| index + start_tag.len())
        .expect("agent response script present");
    let end = document[start..]
        .find("</script>")
        .map(|index| index + start)
        .expect("agent response script closed");
    serde_json::from_str(&document[start..end]).expect("agent payload is JSON")
}
