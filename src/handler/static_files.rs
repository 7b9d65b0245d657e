//! Static file serving module
//!
//! Maps a request path onto the root directory and builds the response:
//! file contents, index files, directory listings, redirects and errors.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, listing, mime, path};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Per-request failure; never escapes the request that caused it
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("not found")]
    NotFound,

    #[error("cannot read '{}': {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    /// Missing files (or a file used as a directory) are 404; anything else is 500
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound,
            _ => Self::Access {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::NotFound => http::build_404_response(),
            err @ Self::Access { .. } => {
                logger::log_error(&err.to_string());
                http::build_500_response()
            }
        }
    }
}

/// Serve a GET/HEAD request from the root directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match resolve(ctx, state).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn resolve(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let decoded = path::decode_path(ctx.path).ok_or(ServeError::NotFound)?;

    let segments = path::clean_segments(&decoded).ok_or(ServeError::NotFound)?;

    let mut target = state.root.clone();
    target.extend(segments);

    let metadata = fs::metadata(&target)
        .await
        .map_err(|e| ServeError::from_io(&target, e))?;
    ensure_within_root(&target, &state.root, ctx.path).await?;

    if !metadata.is_dir() {
        // A trailing slash names a directory; a file cannot satisfy it
        if decoded.ends_with('/') {
            return Err(ServeError::NotFound);
        }
        return serve_file(ctx, &target, &metadata).await;
    }

    if !ctx.path.ends_with('/') {
        // A single leading slash keeps the target on this host (`//x` is protocol-relative)
        let local = ctx.path.trim_start_matches('/');
        let location = match ctx.query {
            Some(q) => format!("/{local}/?{q}"),
            None => format!("/{local}/"),
        };
        return Ok(http::build_redirect_response(&location));
    }

    for index_file in &state.config.http.index_files {
        let candidate = target.join(index_file);
        if let Ok(meta) = fs::metadata(&candidate).await {
            if meta.is_file() {
                ensure_within_root(&candidate, &state.root, ctx.path).await?;
                return serve_file(ctx, &candidate, &meta).await;
            }
        }
    }

    if state.config.http.directory_listing {
        list_directory(ctx, &decoded, &target).await
    } else {
        Err(ServeError::NotFound)
    }
}

/// Reject targets whose real location (after symlinks) is outside the root
async fn ensure_within_root(target: &Path, root: &Path, request_path: &str) -> Result<(), ServeError> {
    let canonical = fs::canonicalize(target)
        .await
        .map_err(|e| ServeError::from_io(target, e))?;
    if canonical.starts_with(root) {
        Ok(())
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        Err(ServeError::NotFound)
    }
}

async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    metadata: &Metadata,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(date)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(ctx.if_modified_since, ctx.has_if_none_match, modified) {
            return Ok(http::build_304_response(date));
        }
    }

    let content = fs::read(file_path)
        .await
        .map_err(|e| ServeError::from_io(file_path, e))?;

    Ok(http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(file_path),
        last_modified.as_deref(),
        ctx.is_head,
    ))
}

async fn list_directory(
    ctx: &RequestContext<'_>,
    display_path: &str,
    dir: &Path,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let access = |e| ServeError::from_io(dir, e);

    let mut read_dir = fs::read_dir(dir).await.map_err(access)?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(access)? {
        let file_type = entry.file_type().await.map_err(access)?;
        let is_symlink = file_type.is_symlink();
        let is_dir = if is_symlink {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(listing::ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    Ok(http::build_html_response(
        listing::render_listing(display_path, entries),
        ctx.is_head,
    ))
}
