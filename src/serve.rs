//! Preview server
//!
//! `wallcast serve ./site` → starts server, opens browser, shows the page
//!
//! `/` is the page skeleton (or a fresh pre-render, see [`ServeMode`]); the
//! data file, audio clips and the wasm bundle are served from the site root
//! under `/assets/` and `/pkg/`.

use crate::loader::{self, DataLoader, DirFetcher, LoadState, Stderr};
use crate::page::{Page, PageOptions};
use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Method, Request, Response, Server};

pub const DEFAULT_PORT: u16 = 3002;

/// URL prefixes mapped onto the site root.
const STATIC_PREFIXES: &[&str] = &["/assets/", "/pkg/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    /// Skeleton page; the browser fetches and renders the data (needs `pkg/`).
    Runtime,
    /// Render on every request from the data file on disk.
    Prerender,
}

/// Start server, open browser, serve the page
pub fn start(port: u16, root: PathBuf, mode: ServeMode, open_browser: bool) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);
    let root = root.canonicalize().unwrap_or(root);

    eprintln!("\n\x1b[1;32m🔊 wallcast\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Serving: {}", root.display());
    if mode == ServeMode::Runtime && !root.join("pkg").is_dir() {
        eprintln!("   \x1b[33mNo pkg/ directory: build wasm-site or use --prerender\x1b[0m");
    }
    eprintln!();

    if open_browser {
        let _ = open::that(&url);
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &root, mode) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, root: &Path, mode: ServeMode) -> io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let method = request.method().clone();

    match (&method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            let response = Response::from_string(page_html(root, mode))
                .with_header(header("Content-Type", "text/html; charset=utf-8")?);
            request.respond(response)
        }

        (&Method::Get, p) if STATIC_PREFIXES.iter().any(|prefix| p.starts_with(prefix)) => {
            match resolve_static(root, p) {
                Some(file_path) => {
                    let file = std::fs::File::open(&file_path)?;
                    let response = Response::from_file(file)
                        .with_header(header("Content-Type", content_type(&file_path))?);
                    request.respond(response)
                }
                None => request.respond(Response::from_string("Not found").with_status_code(404)),
            }
        }

        // 404
        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("bad header {}", name)))
}

/// The page served at `/`.
///
/// In prerender mode a failed load still serves the (empty) skeleton, the
/// same thing a visitor would see in the browser.
pub fn page_html(root: &Path, mode: ServeMode) -> String {
    match mode {
        ServeMode::Runtime => Page::new(&PageOptions::default()).to_html(),
        ServeMode::Prerender => {
            // Without a wasm bundle the import would 404; serve a script-free page
            let script_src = if root.join("pkg").is_dir() { PageOptions::default().script_src } else { None };
            let options = PageOptions { script_src, runtime_load: false, ..PageOptions::default() };
            let mut page = Page::new(&options);
            let state = loader::load(&mut DataLoader::new(), &DirFetcher::new(root), &mut page, &mut Stderr);
            if state == LoadState::Rendered {
                eprintln!("→ rendered {}", loader::DATA_PATH);
            }
            page.to_html()
        }
    }
}

/// Map a URL path onto a file under `root`. Rejects anything that would
/// leave the root.
pub fn resolve_static(root: &Path, url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
    let relative = decoded.trim_start_matches('/');

    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",
        "wav" | "wave" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" | "aac" => "audio/mp4",
        "webm" => "audio/webm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
