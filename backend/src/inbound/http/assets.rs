//! The two client scripts served next to the page.
//!
//! Files are read from the configured directory on every request through a
//! `cap_std` directory handle, so requests cannot escape that directory.

use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_web::{HttpResponse, web};
use cap_std::{ambient_authority, fs::Dir};
use tracing::{error, warn};

use crate::domain::Error;

use super::ApiResult;

/// WebMCP polyfill script file name.
pub const POLYFILL_SCRIPT: &str = "polyfill.js";
/// Form-to-tool translator script file name.
pub const TRANSLATOR_SCRIPT: &str = "webmcp-translator.js";
const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript";

/// Capability handle on the static script directory.
#[derive(Clone)]
pub struct StaticAssets {
    dir: Arc<Dir>,
}

impl StaticAssets {
    /// Open the directory holding the scripts.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    /// Read one script by file name.
    ///
    /// # Errors
    ///
    /// `NotFound` when the file is absent, `InternalError` for any other I/O
    /// failure.
    pub async fn read(&self, name: &'static str) -> Result<Vec<u8>, Error> {
        let dir = Arc::clone(&self.dir);
        let read = web::block(move || dir.read(name))
            .await
            .map_err(|err| Error::internal(format!("blocking read cancelled: {err}")))?;
        read.map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                warn!(file = name, "static script missing");
                Error::not_found(format!("{name} not found"))
            }
            _ => {
                error!(file = name, error = %err, "failed to read static script");
                Error::internal(format!("failed to read {name}: {err}"))
            }
        })
    }
}

async fn serve_script(assets: &StaticAssets, name: &'static str) -> ApiResult<HttpResponse> {
    let body = assets.read(name).await?;
    Ok(HttpResponse::Ok()
        .content_type(JAVASCRIPT_CONTENT_TYPE)
        .body(body))
}

/// `GET /polyfill.js`.
pub async fn polyfill(assets: web::Data<StaticAssets>) -> ApiResult<HttpResponse> {
    serve_script(&assets, POLYFILL_SCRIPT).await
}

/// `GET /webmcp-translator.js`.
pub async fn translator(assets: web::Data<StaticAssets>) -> ApiResult<HttpResponse> {
    serve_script(&assets, TRANSLATOR_SCRIPT).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};

    fn assets_with(files: &[(&str, &str)]) -> (tempfile::TempDir, StaticAssets) {
        let dir = tempfile::tempdir().expect("temp dir");
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).expect("write script");
        }
        let assets = StaticAssets::open(dir.path()).expect("open assets");
        (dir, assets)
    }

    #[actix_web::test]
    async fn serves_script_verbatim_as_javascript() {
        let (_dir, assets) = assets_with(&[(POLYFILL_SCRIPT, "window.polyfilled = true;")]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(assets))
                .route("/polyfill.js", web::get().to(polyfill)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/polyfill.js").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(JAVASCRIPT_CONTENT_TYPE.as_bytes())
        );
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), b"window.polyfilled = true;");
    }

    #[actix_web::test]
    async fn missing_script_is_not_found() {
        let (_dir, assets) = assets_with(&[]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(assets))
                .route("/webmcp-translator.js", web::get().to(translator)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/webmcp-translator.js")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(StaticAssets::open(dir.path().join("absent")).is_err());
    }
}
