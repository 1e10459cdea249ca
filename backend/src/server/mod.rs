//! Server construction and middleware wiring.

mod config;

pub use config::{ConfigError, ServerSettings, server_settings_from_env};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use todo_backend::Trace;
use todo_backend::domain::TodoService;
use todo_backend::inbound::http::assets::StaticAssets;
use todo_backend::inbound::http::failure_policy::StorageFailurePolicy;
use todo_backend::inbound::http::routes::{configure_assets, not_found, todo_scope};
use todo_backend::inbound::http::state::HttpState;
use todo_backend::outbound::persistence::{DbPool, DieselTodoRepository};

/// Wire the SQLite adapter behind the todo ports.
pub fn build_http_state(pool: DbPool, storage_failures: StorageFailurePolicy) -> HttpState {
    let repository = Arc::new(DieselTodoRepository::new(pool));
    HttpState::from_service(Arc::new(TodoService::new(repository)), storage_failures)
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    assets: web::Data<StaticAssets>,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        assets,
        cookie_secure,
    } = deps;

    App::new()
        .app_data(http_state)
        .app_data(assets)
        .wrap(Trace)
        .configure(configure_assets)
        .service(todo_scope(cookie_secure))
        .default_service(web::to(not_found))
}

/// Construct the Actix HTTP server.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    settings: &ServerSettings,
    http_state: HttpState,
    assets: StaticAssets,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        http_state: web::Data::new(http_state),
        assets: web::Data::new(assets),
        cookie_secure: settings.cookie_secure,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(settings.bind_addr)?
        .run();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use todo_backend::domain::TRACE_ID_HEADER;
    use todo_backend::domain::ports::FixtureTodoRepository;

    fn fixture_deps(static_dir: &std::path::Path) -> AppDependencies {
        let service = Arc::new(TodoService::new(Arc::new(FixtureTodoRepository::default())));
        AppDependencies {
            http_state: web::Data::new(HttpState::from_service(
                service,
                StorageFailurePolicy::Degrade,
            )),
            assets: web::Data::new(StaticAssets::open(static_dir).expect("static dir opens")),
            cookie_secure: false,
        }
    }

    #[actix_web::test]
    async fn every_response_carries_a_trace_id() {
        let dir = tempfile::tempdir().expect("temp dir");
        let app = test::init_service(build_app(fixture_deps(dir.path()))).await;

        for uri in ["/", "/nowhere", "/polyfill.js"] {
            let res =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert!(res.headers().contains_key(TRACE_ID_HEADER), "{uri}");
        }
    }

    #[actix_web::test]
    async fn scripts_are_served_without_identity() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("polyfill.js"), "window.x = 1;").expect("write script");
        let app = test::init_service(build_app(fixture_deps(dir.path()))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/polyfill.js").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.response().cookies().count(), 0);
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), b"window.x = 1;");

        let missing = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/webmcp-translator.js")
                .to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_paths_still_resolve_identity() {
        let dir = tempfile::tempdir().expect("temp dir");
        let app = test::init_service(build_app(fixture_deps(dir.path()))).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.response().cookies().count(), 1);
    }
}
