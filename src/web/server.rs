//! HTTP handlers for the notes viewer and the greeting server.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, Uri, header};
use axum::response::{Html, IntoResponse};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::render::{DEFAULT_TEMPLATE, interpolate, render_fragment};
use crate::Note;

/// Body returned by the greeting server.
pub const GREETING: &str = "Hello! Welcome to server";

/// Port the greeting server binds to.
pub const GREETER_PORT: u16 = 3000;

const PAGE_TITLE: &str = "Notes";

#[derive(Debug)]
struct ViewerState {
    notes: Vec<Note>,
    template_path: PathBuf,
}

/// Builds the notes viewer.
///
/// Every request, whatever its method or path, gets a 200 HTML page made by
/// reading the template at `template_path` and filling `{{ notes }}` with the
/// rendered notes. The notes are a snapshot taken when the router is built.
pub fn router(notes: Vec<Note>, template_path: impl Into<PathBuf>) -> Router {
    let state = Arc::new(ViewerState {
        notes,
        template_path: template_path.into(),
    });
    Router::new().fallback(notes_page).with_state(state)
}

/// Builds the greeting server: every request gets a plain-text greeting.
pub fn greeter_router() -> Router {
    Router::new().fallback(greeting)
}

/// Serves `app` on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "server listening");
    }
    axum::serve(listener, app).await
}

async fn notes_page(
    State(state): State<Arc<ViewerState>>,
    method: Method,
    uri: Uri,
) -> Html<String> {
    debug!(%method, %uri, "rendering notes page");
    let template = read_template(&state.template_path).await;
    let data = HashMap::from([
        ("notes", render_fragment(&state.notes)),
        ("title", PAGE_TITLE.to_string()),
    ]);
    Html(interpolate(&template, &data))
}

async fn greeting(method: Method, uri: Uri) -> impl IntoResponse {
    debug!(%method, %uri, "greeting");
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], GREETING)
}

async fn read_template(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(template) => template,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "template unreadable, using built-in template");
            DEFAULT_TEMPLATE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NoteBuilder, NoteId};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn sample_notes() -> Vec<Note> {
        vec![
            NoteBuilder::new()
                .id(NoteId::new(1))
                .content("note 1")
                .tags(["work"])
                .build(),
            NoteBuilder::new()
                .id(NoteId::new(2))
                .content("note 2")
                .build(),
        ]
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, String, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn notes_page_uses_template_from_disk() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("page.html");
        std::fs::write(&template, "<ul>{{ notes }}</ul><i>{{ missing }}</i>").unwrap();

        let (status, content_type, body) =
            send(router(sample_notes(), &template), "GET", "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert!(body.starts_with("<ul><div class=\"note\"><p>note 1</p>"));
        assert!(body.contains(r#"<span class="tag">work</span>"#));
        assert!(body.ends_with("</ul><i></i>"));
    }

    #[tokio::test]
    async fn notes_page_answers_any_method_and_path() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("page.html");
        std::fs::write(&template, "{{notes}}").unwrap();

        for (method, uri) in [("GET", "/deep/path?x=1"), ("POST", "/"), ("DELETE", "/notes/2")] {
            let (status, _, body) = send(router(sample_notes(), &template), method, uri).await;
            assert_eq!(status, StatusCode::OK, "{method} {uri}");
            assert!(body.contains("note 2"));
        }
    }

    #[tokio::test]
    async fn notes_page_rereads_template_per_request() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("page.html");
        std::fs::write(&template, "v1 {{ notes }}").unwrap();
        let app = router(Vec::new(), &template);

        let (_, _, first) = send(app.clone(), "GET", "/").await;
        std::fs::write(&template, "v2 {{ notes }}").unwrap();
        let (_, _, second) = send(app, "GET", "/").await;

        assert_eq!(first, "v1 ");
        assert_eq!(second, "v2 ");
    }

    #[tokio::test]
    async fn notes_page_falls_back_to_built_in_template() {
        let dir = tempdir().unwrap();

        let (status, _, body) =
            send(router(sample_notes(), dir.path().join("absent.html")), "GET", "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Notes</title>"));
        assert!(body.contains("<p>note 1</p>"));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn greeter_answers_plain_text() {
        for (method, uri) in [("GET", "/"), ("PUT", "/anything")] {
            let (status, content_type, body) = send(greeter_router(), method, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(content_type.starts_with("text/plain"));
            assert_eq!(body, GREETING);
        }
    }
}
