//! HTML page, agent shell, and JSON envelopes.
//!
//! Both render modes answer `200 text/html`. Human mode gets the full todo
//! page; agent mode gets a tiny document whose only content is the JSON
//! envelope in `<script id="agent-response">` plus a meta refresh back to `/`.

use std::fmt;

use actix_web::HttpResponse;
use actix_web::http::header::{self, ContentType};
use serde::Serialize;

use crate::domain::{Error, OwnerId, Todo, TodoId};

/// Cache policy applied to every rendered document.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Zod bundle the WebMCP translator expects on the page.
const ZOD_BUNDLE_URL: &str = "https://cdn.jsdelivr.net/npm/zod@3.22.4/lib/index.umd.js";

/// Agent envelope for list requests.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<'a> {
    pub todos: &'a [Todo],
    pub count: usize,
}

impl<'a> ListEnvelope<'a> {
    #[must_use]
    pub const fn new(todos: &'a [Todo]) -> Self {
        Self {
            todos,
            count: todos.len(),
        }
    }
}

/// Agent envelope for create requests; `created` is null on failure.
#[derive(Debug, Serialize)]
pub struct CreatedEnvelope<'a> {
    pub created: Option<&'a Todo>,
    pub success: bool,
}

impl<'a> CreatedEnvelope<'a> {
    #[must_use]
    pub const fn new(created: Option<&'a Todo>) -> Self {
        Self {
            created,
            success: created.is_some(),
        }
    }
}

/// Agent envelope for toggle and delete requests.
///
/// `action` echoes the raw path segment, including unrecognised ones.
#[derive(Debug, Serialize)]
pub struct ActionEnvelope<'a> {
    pub action: &'a str,
    pub id: TodoId,
    pub success: bool,
}

/// Escape text for an HTML element body or a double-quoted attribute.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Make serialised JSON safe to embed in a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\uXXXX` forms
/// decode to the same characters.
#[must_use]
pub fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// The agent-mode document wrapping an already escaped JSON payload.
#[must_use]
pub fn agent_document(escaped_json: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n\
         <script type=\"application/json\" id=\"agent-response\">{escaped_json}</script>\n\
         <meta http-equiv=\"refresh\" content=\"0;url=/\">\n\
         </body>\n</html>\n"
    )
}

/// The human-mode todo page.
pub struct TodoPage<'a> {
    pub todos: &'a [Todo],
    pub owner: &'a OwnerId,
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Todo WebMCP Demo</title>
    <style>
        body { font-family: system-ui; max-width: 600px; margin: 40px auto; padding: 20px; }
        form { margin: 20px 0; }
        input[type="text"] { padding: 8px; width: 300px; }
        button { padding: 8px 16px; }
        .todo { margin: 10px 0; padding: 10px; border: 1px solid #ddd; }
        .completed { text-decoration: line-through; opacity: 0.6; }
        .user-info { background: #f5f5f5; padding: 10px; margin-bottom: 20px; font-size: 12px; }
    </style>
"#;

const ADD_FORM: &str = r#"    <h1>Todos</h1>

    <form action="/todos" method="post" tool-name="add-todo" tool-description="Add a new todo item">
        <input type="text" name="description" required placeholder="What needs to be done?"
               tool-param-description="The text of the todo item">
        <button type="submit">Add Todo</button>
    </form>

    <a href="/todos" tool-name="list-todos" tool-description="Get all todo items">Refresh</a>
"#;

impl TodoPage<'_> {
    fn write_item(f: &mut fmt::Formatter<'_>, todo: &Todo) -> fmt::Result {
        let id = todo.id;
        let class = if todo.completed {
            "todo completed"
        } else {
            "todo"
        };
        let toggle_label = if todo.completed { "Undo" } else { "Complete" };
        writeln!(f, "        <div class=\"{class}\">")?;
        writeln!(
            f,
            "            <strong>#{id}</strong>: {}",
            escape_html(todo.description.as_ref())
        )?;
        writeln!(
            f,
            "            <form action=\"/todos/{id}/toggle\" method=\"post\" style=\"display:inline\"\n\
             \x20                 tool-name=\"toggle-todo-{id}\" tool-description=\"Toggle completion status\">\n\
             \x20               <button type=\"submit\">{toggle_label}</button>\n\
             \x20           </form>"
        )?;
        writeln!(
            f,
            "            <form action=\"/todos/{id}/delete\" method=\"post\" style=\"display:inline\"\n\
             \x20                 tool-name=\"delete-todo-{id}\" tool-description=\"Delete this todo\">\n\
             \x20               <button type=\"submit\">Delete</button>\n\
             \x20           </form>"
        )?;
        writeln!(f, "        </div>")
    }
}

impl fmt::Display for TodoPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PAGE_HEAD)?;
        writeln!(f, "    <script src=\"/polyfill.js\"></script>")?;
        writeln!(f, "    <script src=\"{ZOD_BUNDLE_URL}\"></script>")?;
        writeln!(f, "    <script src=\"/webmcp-translator.js\"></script>")?;
        writeln!(f, "</head>\n<body>")?;
        writeln!(
            f,
            "    <div class=\"user-info\">Session: {}</div>",
            escape_html(self.owner.session_prefix())
        )?;
        f.write_str(ADD_FORM)?;
        writeln!(f, "\n    <div id=\"todos\">")?;
        for todo in self.todos {
            Self::write_item(f, todo)?;
        }
        writeln!(f, "    </div>\n</body>\n</html>")
    }
}

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header((header::CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE))
        .body(body)
}

/// Render the human page.
pub fn page_response(todos: &[Todo], owner: &OwnerId) -> HttpResponse {
    html_response(TodoPage { todos, owner }.to_string())
}

/// Render an envelope in the agent shell.
///
/// # Errors
///
/// Returns an internal error if the envelope cannot be serialised.
pub fn agent_response<T: Serialize>(envelope: &T) -> Result<HttpResponse, Error> {
    let json = serde_json::to_string(envelope)
        .map_err(|err| Error::internal(format!("failed to serialise agent envelope: {err}")))?;
    Ok(html_response(agent_document(&escape_script_json(&json))))
}

/// `303 See Other` back to the page.
pub fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Description;
    use crate::inbound::http::test_utils::agent_payload;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    fn todo(id: i64, text: &str, completed: bool) -> Todo {
        Todo {
            id: TodoId::new(id),
            description: Description::new(text).expect("valid description"),
            completed,
        }
    }

    #[fixture]
    fn owner() -> OwnerId {
        OwnerId::new("0123456789abcdef0123456789abcdef").expect("owner id")
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("<b>&\"'", "&lt;b&gt;&amp;&#34;&#39;")]
    fn escapes_html_metacharacters(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_html(raw), expected);
    }

    #[rstest]
    fn script_json_escaping_preserves_value() {
        let todos = [todo(1, "</script><script>alert(1)</script> & co", false)];
        let json = serde_json::to_string(&ListEnvelope::new(&todos)).expect("serialise");
        let escaped = escape_script_json(&json);

        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('&'));
        let decoded: Value = serde_json::from_str(&escaped).expect("still JSON");
        assert_eq!(decoded["todos"][0]["description"], todos[0].description.as_ref());
    }

    #[rstest]
    fn envelopes_serialise_to_documented_shapes() {
        let todos = [todo(1, "Buy milk", false)];
        assert_eq!(
            serde_json::to_value(ListEnvelope::new(&todos)).expect("list"),
            json!({"todos": [{"id": 1, "description": "Buy milk", "completed": false}], "count": 1})
        );
        assert_eq!(
            serde_json::to_value(CreatedEnvelope::new(todos.first())).expect("created"),
            json!({"created": {"id": 1, "description": "Buy milk", "completed": false}, "success": true})
        );
        assert_eq!(
            serde_json::to_value(CreatedEnvelope::new(None)).expect("failed create"),
            json!({"created": null, "success": false})
        );
        assert_eq!(
            serde_json::to_value(ActionEnvelope {
                action: "archive",
                id: TodoId::new(0),
                success: false,
            })
            .expect("action"),
            json!({"action": "archive", "id": 0, "success": false})
        );
    }

    #[rstest]
    fn empty_list_serialises_as_array() {
        const EMPTY: ListEnvelope<'static> = ListEnvelope::new(&[]);
        const FAILED: CreatedEnvelope<'static> = CreatedEnvelope::new(None);
        assert_eq!(
            serde_json::to_value(EMPTY).expect("list"),
            json!({"todos": [], "count": 0})
        );
        assert_eq!(
            serde_json::to_value(FAILED).expect("created"),
            json!({"created": null, "success": false})
        );
    }

    #[rstest]
    fn page_escapes_descriptions_and_shows_session_prefix(owner: OwnerId) {
        let todos = [
            todo(1, "<img src=x onerror=alert(1)>", false),
            todo(2, "Walk dog", true),
        ];
        let page = TodoPage {
            todos: &todos,
            owner: &owner,
        }
        .to_string();

        assert!(page.contains("Session: 01234567</div>"));
        assert!(!page.contains("0123456789abcdef0123456789abcdef"));
        assert!(page.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!page.contains("<img"));
        assert!(page.contains("tool-name=\"add-todo\""));
        assert!(page.contains("tool-name=\"list-todos\""));
        assert!(page.contains("tool-name=\"toggle-todo-1\""));
        assert!(page.contains("tool-name=\"delete-todo-2\""));
        assert!(page.contains("<div class=\"todo completed\">"));
        assert!(page.contains(">Undo</button>"));
        assert!(page.contains("<script src=\"/polyfill.js\"></script>"));
        assert!(page.contains("<script src=\"/webmcp-translator.js\"></script>"));
    }

    #[rstest]
    fn page_lists_items_in_given_order(owner: OwnerId) {
        let todos = [todo(3, "third", false), todo(7, "seventh", false)];
        let page = TodoPage {
            todos: &todos,
            owner: &owner,
        }
        .to_string();
        let third = page.find("#3</strong>").expect("third rendered");
        let seventh = page.find("#7</strong>").expect("seventh rendered");
        assert!(third < seventh);
    }

    #[actix_web::test]
    async fn agent_response_embeds_payload_with_refresh() {
        let envelope = ActionEnvelope {
            action: "toggle",
            id: TodoId::new(1),
            success: true,
        };
        let response = agent_response(&envelope).expect("render");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(b"text/html; charset=utf-8".as_slice())
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(PRIVATE_NO_CACHE_MUST_REVALIDATE.as_bytes())
        );

        let body = to_bytes(response.into_body()).await.expect("body");
        let document = std::str::from_utf8(&body).expect("utf8");
        assert!(document.contains("<meta http-equiv=\"refresh\" content=\"0;url=/\">"));
        assert_eq!(
            agent_payload(document),
            json!({"action": "toggle", "id": 1, "success": true})
        );
    }

    #[rstest]
    fn redirect_home_is_see_other() {
        let response = redirect_home();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(b"/".as_slice())
        );
    }
}
