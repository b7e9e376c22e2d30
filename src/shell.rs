//! Offline application shell
//!
//! The configured shell assets are read from the static directory once at
//! startup and kept in memory. Requests for those paths are answered from
//! memory; everything else goes to the static directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::future::join_all;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::SafePathConfig;

#[derive(Debug, Clone)]
pub struct CachedAsset {
    pub content_type: String,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct ShellCache {
    static_dir: PathBuf,
    assets: HashMap<String, CachedAsset>,
}

impl ShellCache {
    pub async fn from_config(config: &SafePathConfig) -> Self {
        Self::preload(&config.server.static_dir, &config.server.shell_assets).await
    }

    /// Read every listed asset concurrently. Missing files are skipped.
    pub async fn preload(static_dir: impl AsRef<Path>, paths: &[String]) -> Self {
        let static_dir = static_dir.as_ref().to_path_buf();

        let loads = paths.iter().map(|path| {
            let file = asset_file(&static_dir, path);
            async move {
                match tokio::fs::read(&file).await {
                    Ok(bytes) => Some((
                        path.clone(),
                        CachedAsset {
                            content_type: content_type(&file),
                            body: Bytes::from(bytes),
                        },
                    )),
                    Err(e) => {
                        warn!("Shell asset {} not cached ({}): {}", path, file.display(), e);
                        None
                    }
                }
            }
        });
        let assets: HashMap<String, CachedAsset> =
            join_all(loads).await.into_iter().flatten().collect();

        info!(
            "Cached {}/{} shell assets from {}",
            assets.len(),
            paths.len(),
            static_dir.display()
        );
        Self { static_dir, assets }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&CachedAsset> {
        self.assets.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Router serving the shell: cached assets first, then the static directory
pub fn router(shell: Arc<ShellCache>) -> Router {
    Router::new().fallback(serve).with_state(shell)
}

async fn serve(State(shell): State<Arc<ShellCache>>, request: Request) -> Response {
    if let Some(asset) = shell.get(request.uri().path()) {
        return (
            [(header::CONTENT_TYPE, asset.content_type.clone())],
            asset.body.clone(),
        )
            .into_response();
    }

    match ServeDir::new(&shell.static_dir).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// `/` is the index page; other paths are relative to the static directory
fn asset_file(static_dir: &Path, path: &str) -> PathBuf {
    match path.trim_start_matches('/') {
        "" => static_dir.join("index.html"),
        relative => static_dir.join(relative),
    }
}

/// Same guess `ServeDir` makes for files it serves
fn content_type(file: &Path) -> String {
    mime_guess::from_path(file)
        .first_or_octet_stream()
        .to_string()
}
