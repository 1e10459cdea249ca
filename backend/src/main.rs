//! Server entry-point: reads settings, prepares storage, and serves the site.

mod server;

use mockable::{DefaultEnv, Env};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use todo_backend::inbound::http::assets::StaticAssets;
use todo_backend::outbound::persistence::{
    DbPool, PoolConfig, PoolError, SchemaBootstrapError, ensure_schema,
};

use server::{ConfigError, build_http_state, create_server, server_settings_from_env};

/// Failures that stop the process before it starts serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("database unavailable: {0}")]
    Pool(#[from] PoolError),
    #[error("schema bootstrap failed: {0}")]
    Schema(#[from] SchemaBootstrapError),
    #[error("failed to open static directory {path}: {source}")]
    Assets {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match start(&DefaultEnv::new()).await {
        Ok(server) => server.await,
        Err(err) => {
            error!(error = %err, "startup failed");
            Err(std::io::Error::other(err))
        }
    }
}

async fn start<E: Env>(env: &E) -> Result<actix_web::dev::Server, StartupError> {
    let settings = server_settings_from_env(env)?;

    let pool = DbPool::new(
        PoolConfig::new(settings.database_path.clone()).with_max_size(settings.pool_size),
    )
    .await?;
    ensure_schema(&pool).await?;

    let assets = StaticAssets::open(&settings.static_dir).map_err(|source| {
        StartupError::Assets {
            path: settings.static_dir.display().to_string(),
            source,
        }
    })?;

    let http_state = build_http_state(pool, settings.storage_failures);
    let server = create_server(&settings, http_state, assets).map_err(|source| {
        StartupError::Bind {
            addr: settings.bind_addr,
            source,
        }
    })?;

    info!(
        addr = %settings.bind_addr,
        database = %settings.database_path,
        storage_failures = %settings.storage_failures,
        "todo server listening"
    );
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use std::collections::HashMap;

    fn env_with(vars: Vec<(&'static str, String)>) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[actix_web::test]
    async fn invalid_port_stops_startup() {
        let env = env_with(vec![("PORT", "eighty".to_owned())]);
        let err = start(&env).await.err().expect("port must be numeric");
        assert!(matches!(err, StartupError::Config(_)), "got {err:?}");
    }

    #[actix_web::test]
    async fn missing_static_directory_stops_startup_after_schema() {
        let dir = tempfile::tempdir().expect("tempdir");
        let database = dir.path().join("todos.db");
        let env = env_with(vec![
            ("TODO_DATABASE_PATH", database.display().to_string()),
            (
                "TODO_STATIC_DIR",
                dir.path().join("missing").display().to_string(),
            ),
        ]);

        let err = start(&env).await.err().expect("static directory is required");

        assert!(matches!(err, StartupError::Assets { .. }), "got {err:?}");
        assert!(database.exists(), "schema bootstrap creates the database file");
    }

    #[actix_web::test]
    async fn process_environment_is_readable() {
        let env = DefaultEnv::new();
        assert_eq!(env.string("TODO_BACKEND_UNSET_VARIABLE_FOR_TESTS"), None);
    }
}
