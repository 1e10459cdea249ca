//! Anonymous per-browser identity carried in the `user_id` cookie.
//!
//! [`IdentityCookie`] resolves the owner before any handler runs and stores it
//! in the request extensions. When the request had no usable token it issues
//! a fresh one and appends the `Set-Cookie` header to whatever response the
//! handler produced. Handlers read the owner through [`OwnerIdentity`].

use std::task::{Context, Poll};

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error, warn};

use crate::domain::{Error, OwnerId};

/// Name of the identity cookie.
pub const IDENTITY_COOKIE: &str = "user_id";
/// Identity cookie lifetime.
pub const IDENTITY_MAX_AGE_DAYS: i64 = 365;

/// Middleware resolving the request owner from the identity cookie.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todo_backend::inbound::http::identity::IdentityCookie;
///
/// let app = App::new().wrap(IdentityCookie::new(false));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCookie {
    secure: bool,
}

impl IdentityCookie {
    /// Create the middleware; `secure` marks issued cookies `Secure`.
    #[must_use]
    pub const fn new(secure: bool) -> Self {
        Self { secure }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityCookie
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = IdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddleware {
            service,
            secure: self.secure,
        }))
    }
}

/// Service wrapper produced by [`IdentityCookie`].
pub struct IdentityMiddleware<S> {
    service: S,
    secure: bool,
}

/// Outcome of reading the identity cookie.
enum Resolution {
    Presented(OwnerId),
    Issued(OwnerId),
}

fn resolve_owner(req: &ServiceRequest) -> Resolution {
    let Some(cookie) = req.cookie(IDENTITY_COOKIE) else {
        return Resolution::Issued(OwnerId::generate());
    };
    match OwnerId::new(cookie.value()) {
        Ok(owner) => Resolution::Presented(owner),
        Err(err) => {
            warn!(error = %err, "rejected identity cookie; issuing a new token");
            Resolution::Issued(OwnerId::generate())
        }
    }
}

/// Build the `Set-Cookie` value for a newly issued token.
pub fn identity_cookie(owner: &OwnerId, secure: bool) -> Cookie<'static> {
    Cookie::build(IDENTITY_COOKIE, owner.as_str().to_owned())
        .path("/")
        .max_age(Duration::days(IDENTITY_MAX_AGE_DAYS))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish()
}

impl<S, B> Service<ServiceRequest> for IdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let (owner, issued) = match resolve_owner(&req) {
            Resolution::Presented(owner) => (owner, None),
            Resolution::Issued(owner) => {
                debug!(owner = owner.session_prefix(), "issued identity token");
                (owner.clone(), Some(owner))
            }
        };
        req.extensions_mut().insert(owner);

        let secure = self.secure;
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(owner) = issued {
                if let Err(err) = res
                    .response_mut()
                    .add_cookie(&identity_cookie(&owner, secure))
                {
                    error!(error = %err, "failed to attach identity cookie");
                }
            }
            Ok(res)
        })
    }
}

/// Extractor yielding the owner resolved by [`IdentityCookie`].
///
/// Fails with an internal error when the route is not wrapped by the
/// middleware.
#[derive(Debug, Clone)]
pub struct OwnerIdentity(OwnerId);

impl OwnerIdentity {
    /// The resolved owner.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.0
    }

    /// Consume the extractor, returning the owner.
    #[must_use]
    pub fn into_inner(self) -> OwnerId {
        self.0
    }
}

impl FromRequest for OwnerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let owner = req
            .extensions()
            .get::<OwnerId>()
            .cloned()
            .map(Self)
            .ok_or_else(|| Error::internal("owner identity not resolved"));
        ready(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn echo_owner(identity: OwnerIdentity) -> HttpResponse {
        HttpResponse::Ok().body(identity.into_inner().as_str().to_owned())
    }

    async fn fail_with_owner(_identity: OwnerIdentity) -> Result<HttpResponse, Error> {
        Err(Error::invalid_request("Invalid path"))
    }

    fn identity_app(
        secure: bool,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(IdentityCookie::new(secure))
            .route("/", web::get().to(echo_owner))
            .route("/fail", web::get().to(fail_with_owner))
    }

    #[actix_web::test]
    async fn issues_token_when_cookie_absent() {
        let app = test::init_service(identity_app(false)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == IDENTITY_COOKIE)
            .expect("identity cookie issued");
        assert_eq!(cookie.value().len(), 32);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), None);
        assert_eq!(cookie.max_age(), Some(Duration::days(365)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.secure(), Some(true));
        let value = cookie.value().to_owned();

        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), value.as_bytes());
    }

    #[actix_web::test]
    async fn presented_token_is_used_verbatim() {
        let app = test::init_service(identity_app(false)).await;
        let req = test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new(IDENTITY_COOKIE, "legacy-token-42"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(
            res.response()
                .cookies()
                .all(|cookie| cookie.name() != IDENTITY_COOKIE)
        );
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), b"legacy-token-42");
    }

    #[rstest]
    #[case(String::new())]
    #[case("a".repeat(300))]
    #[actix_web::test]
    async fn unusable_token_is_replaced(#[case] raw: String) {
        let app = test::init_service(identity_app(false)).await;
        let req = test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new(IDENTITY_COOKIE, raw.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;

        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == IDENTITY_COOKIE)
            .expect("replacement cookie issued");
        assert_ne!(cookie.value(), raw);
    }

    #[actix_web::test]
    async fn cookie_is_attached_to_error_responses() {
        let app = test::init_service(identity_app(true)).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/fail").to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == IDENTITY_COOKIE)
            .expect("identity cookie issued");
        assert_eq!(cookie.secure(), Some(true));
    }

    #[actix_web::test]
    async fn extractor_fails_without_middleware() {
        let app = test::init_service(App::new().route("/", web::get().to(echo_owner))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
