//! Response mode selection from the `agent` query flag.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

/// Query parameter selecting agent mode.
pub const AGENT_QUERY_PARAM: &str = "agent";

/// How a handler renders its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Full HTML page, or a redirect home after a form post.
    #[default]
    Human,
    /// JSON envelope in an auto-redirecting HTML shell.
    Agent,
}

impl RenderMode {
    /// Select the mode from a raw query string.
    ///
    /// Only the first `agent` parameter counts, and only the exact value
    /// `true` selects agent mode.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::inbound::http::render_mode::RenderMode;
    ///
    /// assert_eq!(RenderMode::from_query("agent=true"), RenderMode::Agent);
    /// assert_eq!(RenderMode::from_query("agent=TRUE"), RenderMode::Human);
    /// assert_eq!(RenderMode::from_query(""), RenderMode::Human);
    /// ```
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let agent = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == AGENT_QUERY_PARAM)
            .is_some_and(|(_, value)| value == "true");
        if agent { Self::Agent } else { Self::Human }
    }

    /// Whether this is [`RenderMode::Agent`].
    #[must_use]
    pub const fn is_agent(self) -> bool {
        matches!(self, Self::Agent)
    }
}

impl FromRequest for RenderMode {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_query(req.query_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("agent=true", RenderMode::Agent)]
    #[case("x=1&agent=true", RenderMode::Agent)]
    #[case("agent=true&agent=false", RenderMode::Agent)]
    #[case("agent=false&agent=true", RenderMode::Human)]
    #[case("agent=1", RenderMode::Human)]
    #[case("agent", RenderMode::Human)]
    #[case("Agent=true", RenderMode::Human)]
    #[case("", RenderMode::Human)]
    fn selects_mode_from_first_agent_value(#[case] query: &str, #[case] expected: RenderMode) {
        assert_eq!(RenderMode::from_query(query), expected);
    }

    #[actix_web::test]
    async fn extractor_reads_query_string() {
        let req = actix_web::test::TestRequest::get()
            .uri("/todos?agent=true")
            .to_http_request();
        let mode = RenderMode::extract(&req).await.expect("infallible");
        assert!(mode.is_agent());
    }
}
