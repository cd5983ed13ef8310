//! Front-end serving.
//!
//! The front-end router is a single `GET` catch-all appended after the
//! API and admin routes: anything they did not claim is either a static
//! asset (a path with a file extension) or a client-side navigation
//! path, which gets the entry document so the browser app can take
//! over. In maintenance mode every front-end request answers the fixed
//! downtime document instead.
//!
//! # Security
//!
//! Asset paths are rejected before any filesystem access when they
//! contain a parent-directory component or a hidden (dot-prefixed)
//! segment.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use http::header::LAST_MODIFIED;
use http::{HeaderValue, StatusCode};

use portico_core::{
    erase, Handler, PorticoResult, RawBody, Request, Response, ResponseBody, Session, Validated,
};
use portico_router::{Route, Router};

use crate::config::AppConfig;

/// The document served while the application is down.
const DOWNTIME_HTML: &str = "<!doctype html>\n<html>\n<head><title>Down for maintenance</title></head>\n<body>\n<h1>Down for maintenance</h1>\n<p>We are performing scheduled maintenance and will be back shortly.</p>\n</body>\n</html>\n";

/// The entry document file name.
const ENTRY_FILE: &str = "index.html";

/// Builds the front-end router: one `GET` catch-all.
#[must_use]
pub fn front_end_router<S: Session>(config: &AppConfig) -> Router<S> {
    let handler = FrontEndHandler {
        root: config.front_end_dir().to_path_buf(),
        maintenance: config.maintenance_mode(),
    };
    Router::from_routes(vec![Route::new(http::Method::GET, "*", erase(handler))])
}

/// What a front-end request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FrontEndTarget {
    /// A static asset under the front-end directory.
    Asset(PathBuf),
    /// The entry document (client-side navigation path).
    Entry,
    /// The fixed downtime document.
    Downtime,
}

struct FrontEndHandler {
    root: PathBuf,
    maintenance: bool,
}

impl FrontEndHandler {
    /// Resolves a request path to a target without touching the
    /// filesystem.
    fn resolve(&self, request_path: &str) -> Validated<FrontEndTarget> {
        if self.maintenance {
            return Validated::Valid(FrontEndTarget::Downtime);
        }

        let relative = request_path.trim_start_matches('/');
        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir => {
                    return Validated::invalid(StatusCode::FORBIDDEN, "forbidden path");
                }
                Component::Normal(name) => {
                    if name.to_str().is_some_and(|name| name.starts_with('.')) {
                        return Validated::invalid(StatusCode::FORBIDDEN, "forbidden path");
                    }
                }
                _ => {}
            }
        }

        // Paths without an extension are client-side navigation.
        if relative.is_empty() || Path::new(relative).extension().is_none() {
            return Validated::Valid(FrontEndTarget::Entry);
        }
        Validated::Valid(FrontEndTarget::Asset(self.root.join(relative)))
    }
}

impl<S: Session> Handler<S> for FrontEndHandler {
    type In = RawBody;
    type Out = Validated<FrontEndTarget>;
    type ResBody = ResponseBody;

    fn transform_request(
        &self,
        req: &Request<RawBody, S>,
    ) -> impl std::future::Future<Output = PorticoResult<Self::Out>> + Send {
        std::future::ready(Ok(self.resolve(req.path())))
    }

    fn respond(
        &self,
        req: Request<Self::Out, S>,
    ) -> impl std::future::Future<Output = PorticoResult<Response<ResponseBody, S>>> + Send {
        async move {
            let session = req.session().clone();
            match req.into_body() {
                Validated::Invalid { status, message } => {
                    Ok(Response::error(status, session, &message))
                }
                Validated::Valid(FrontEndTarget::Downtime) => Ok(downtime_response(session)),
                Validated::Valid(FrontEndTarget::Entry) => {
                    match tokio::fs::read_to_string(self.root.join(ENTRY_FILE)).await {
                        Ok(entry) => Ok(Response::new(
                            StatusCode::OK,
                            session,
                            ResponseBody::Html(entry),
                        )),
                        Err(err) => {
                            tracing::warn!(error = %err, "entry document unavailable");
                            Ok(downtime_response(session))
                        }
                    }
                }
                Validated::Valid(FrontEndTarget::Asset(path)) => {
                    match tokio::fs::read(&path).await {
                        Ok(bytes) => {
                            let mut res = Response::new(
                                StatusCode::OK,
                                session,
                                ResponseBody::File {
                                    bytes: Bytes::from(bytes),
                                    content_type: mime_for(&path).to_string(),
                                },
                            );
                            if let Some(header) = last_modified_header(&path).await {
                                res = res.with_header(LAST_MODIFIED, header);
                            }
                            Ok(res)
                        }
                        Err(_) => Ok(Response::error(
                            StatusCode::NOT_FOUND,
                            session,
                            "not found",
                        )),
                    }
                }
            }
        }
    }
}

fn downtime_response<S>(session: S) -> Response<ResponseBody, S> {
    Response::new(
        StatusCode::SERVICE_UNAVAILABLE,
        session,
        ResponseBody::Html(DOWNTIME_HTML.to_string()),
    )
}

/// Formats the file's mtime as an HTTP date, if available.
async fn last_modified_header(path: &Path) -> Option<HeaderValue> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    let modified: SystemTime = metadata.modified().ok()?;
    HeaderValue::from_str(&httpdate::fmt_http_date(modified)).ok()
}

/// MIME type from the file extension.
fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, Method};
    use portico_core::Query;

    use super::*;

    fn handler(maintenance: bool) -> FrontEndHandler {
        FrontEndHandler {
            root: PathBuf::from("public"),
            maintenance,
        }
    }

    #[test]
    fn test_navigation_paths_resolve_to_entry() {
        let handler = handler(false);
        assert_eq!(handler.resolve("/"), Validated::Valid(FrontEndTarget::Entry));
        assert_eq!(
            handler.resolve("/rfis/42"),
            Validated::Valid(FrontEndTarget::Entry)
        );
    }

    #[test]
    fn test_extension_paths_resolve_to_assets() {
        let handler = handler(false);
        assert_eq!(
            handler.resolve("/assets/site.css"),
            Validated::Valid(FrontEndTarget::Asset(PathBuf::from("public/assets/site.css")))
        );
    }

    #[test]
    fn test_traversal_is_rejected() {
        let handler = handler(false);
        assert!(!handler.resolve("/../etc/passwd").is_valid());
        assert!(!handler.resolve("/assets/../../secrets.txt").is_valid());
    }

    #[test]
    fn test_hidden_segments_are_rejected() {
        let handler = handler(false);
        assert!(!handler.resolve("/.env").is_valid());
        assert!(!handler.resolve("/assets/.htaccess").is_valid());
    }

    #[test]
    fn test_maintenance_overrides_everything() {
        let handler = handler(true);
        assert_eq!(
            handler.resolve("/assets/site.css"),
            Validated::Valid(FrontEndTarget::Downtime)
        );
        assert_eq!(
            handler.resolve("/"),
            Validated::Valid(FrontEndTarget::Downtime)
        );
    }

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_for(Path::new("a.css")), "text/css; charset=utf-8");
        assert_eq!(mime_for(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(mime_for(Path::new("a.bin")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_downtime_document_is_served() {
        let config = AppConfig::builder().maintenance_mode(true).build();
        let router: Router<()> = front_end_router(&config);
        let req = Request::new(
            Method::GET,
            "/rfis",
            HeaderMap::new(),
            Query::new(),
            (),
            RawBody::Empty,
        );
        let res = router.dispatch(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        match res.body() {
            ResponseBody::Html(html) => assert!(html.contains("maintenance")),
            other => panic!("expected HTML, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_asset_is_404() {
        let config = AppConfig::builder()
            .front_end_dir("does-not-exist")
            .build();
        let router: Router<()> = front_end_router(&config);
        let req = Request::new(
            Method::GET,
            "/assets/missing.css",
            HeaderMap::new(),
            Query::new(),
            (),
            RawBody::Empty,
        );
        let res = router.dispatch(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
