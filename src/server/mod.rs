//! Preview server for the built site

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::routes::redirect_table;
use crate::{Site, CONFIG_FILE};

/// Server state
struct ServerState {
    public_dir: PathBuf,
    /// `from` path to target URL
    redirects: RwLock<HashMap<String, String>>,
}

/// Map each redirected path to its target
pub fn redirect_map(config: &SiteConfig) -> HashMap<String, String> {
    redirect_table(config)
        .into_iter()
        .map(|r| (r.from_path, r.to_path))
        .collect()
}

/// Serve the public dir on `ip:port`, rebuilding on change when `watch` is set
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool) -> Result<()> {
    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        redirects: RwLock::new(redirect_map(&site.config)),
    });

    let app = Router::new()
        .fallback(serve_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let base_dir = site.base_dir.clone();
        let watched = vec![
            site.content_dir.clone(),
            site.static_dir.clone(),
            site.base_dir.join(CONFIG_FILE),
        ];
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_rebuild(&base_dir, &watched, &state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild after every debounced batch of changes. A failed rebuild keeps the
/// previous output in place.
fn watch_and_rebuild(base_dir: &Path, watched: &[PathBuf], state: &ServerState) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for path in watched.iter().filter(|p| p.exists()) {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    for result in rx {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let relevant: Vec<_> = events
            .iter()
            .filter(|e| {
                let path_str = e.path.to_string_lossy();
                !path_str.contains(".git") && !path_str.ends_with('~')
            })
            .collect();
        if relevant.is_empty() {
            continue;
        }
        for event in &relevant {
            tracing::info!("File changed: {}", event.path.display());
        }

        match Site::new(base_dir).map_err(anyhow::Error::from).and_then(|site| {
            site.build()?;
            Ok(site)
        }) {
            Ok(site) => {
                if let Ok(mut redirects) = state.redirects.write() {
                    *redirects = redirect_map(&site.config);
                }
                tracing::info!("Rebuilt successfully");
            }
            Err(e) => tracing::error!("Rebuild failed: {:#}", e),
        }
    }

    Ok(())
}

/// Redirects first, then files from the public dir, then the not-found page
async fn serve_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let target = state
        .redirects
        .read()
        .ok()
        .and_then(|redirects| redirects.get(request.uri().path()).cloned());
    if let Some(to) = target {
        return Redirect::permanent(&to).into_response();
    }

    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    let response = match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    };

    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }
    not_found(&state.public_dir).await
}

async fn not_found(public_dir: &Path) -> Response {
    match tokio::fs::read_to_string(public_dir.join("404.html")).await {
        Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedirectRule;
    use tempfile::TempDir;

    #[test]
    fn test_redirect_map_covers_both_spellings() {
        let mut config = SiteConfig::default();
        config.redirects = vec![RedirectRule {
            from: "/sharedarticles".to_string(),
            to: "https://reederapp.net/2mR0".to_string(),
        }];

        let map = redirect_map(&config);
        assert_eq!(map.len(), 2);
        assert_eq!(map["/sharedarticles"], "https://reederapp.net/2mR0");
        assert_eq!(map["/sharedarticles/"], "https://reederapp.net/2mR0");
    }

    #[tokio::test]
    async fn test_not_found_serves_404_page() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("404.html"), "<h1>NOT FOUND</h1>").unwrap();

        let response = not_found(dir.path()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let empty = TempDir::new().unwrap();
        assert_eq!(not_found(empty.path()).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handler_redirects_permanently() {
        let dir = TempDir::new().unwrap();
        let mut redirects = HashMap::new();
        redirects.insert("/old".to_string(), "https://example.com/new".to_string());
        let state = Arc::new(ServerState {
            public_dir: dir.path().to_path_buf(),
            redirects: RwLock::new(redirects),
        });

        let request = Request::builder().uri("/old").body(Body::empty()).unwrap();
        let response = serve_handler(State(state.clone()), request).await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            response.headers()["location"],
            "https://example.com/new"
        );

        let request = Request::builder().uri("/missing").body(Body::empty()).unwrap();
        let response = serve_handler(State(state), request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
