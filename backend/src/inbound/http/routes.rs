//! Route table for the todo site.
//!
//! ```text
//! GET      /polyfill.js, /webmcp-translator.js     static scripts, no identity
//! GET      /                                        page or list envelope
//! GET|POST /todos                                   list / create
//! POST     /todos/{id}/{action}[/...]               toggle / delete
//! any      /todos/, /todos/{id}                     400 Invalid path
//! ```
//!
//! Action segments may be empty, and anything after the action is ignored.
//! Registration order matters: the catch-all `/todos/{tail}` resource must
//! come after the action resource so well-formed action paths never reach it.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{HttpRequest, HttpResponse, Scope, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::assets::{POLYFILL_SCRIPT, TRANSLATOR_SCRIPT, polyfill, translator};
use crate::inbound::http::identity::IdentityCookie;
use crate::inbound::http::todos::{
    create_todo, index, list_todos, malformed_todo_path, todo_action,
};

/// Register the static script routes.
pub fn configure_assets(cfg: &mut web::ServiceConfig) {
    cfg.route(&format!("/{POLYFILL_SCRIPT}"), web::get().to(polyfill))
        .route(&format!("/{TRANSLATOR_SCRIPT}"), web::get().to(translator));
}

/// The identity-scoped todo routes.
///
/// Every request matched here gets an owner, and a `Set-Cookie` when the
/// owner is new, including requests answered with 400 or 404.
pub fn todo_scope(
    cookie_secure: bool,
) -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("")
        .wrap(IdentityCookie::new(cookie_secure))
        .service(web::resource("/").route(web::get().to(index)))
        .service(
            web::resource("/todos")
                .route(web::get().to(list_todos))
                .route(web::post().to(create_todo)),
        )
        .service(
            web::resource([
                "/todos/{id:[^/]*}/{action:[^/]*}",
                "/todos/{id:[^/]*}/{action:[^/]*}/{rest:.*}",
            ])
            .route(web::post().to(todo_action)),
        )
        .service(web::resource("/todos/{tail:.*}").to(malformed_todo_path))
}

/// Fallback for paths outside the route table.
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!("no route for {}", req.path())))
}
