//! HTTP server: the AI endpoint plus the static site.

use crate::config::Config;
use crate::error::ServeError;
use crate::gemini::GeminiClient;
use crate::proxy::{self, Upstream};
use crate::site;
use sendoff_core::api::GENERATE_PATH;
use std::fs;
use std::io::Read;
use tiny_http::{Header, Response, Server, StatusCode};

/// Largest request body read. Prompts are a few hundred bytes.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// A routed response, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
}

impl Reply {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "text/plain; charset=utf-8")],
            body: body.as_bytes().to_vec(),
        }
    }
}

/// Request router.
pub struct Router<U: Upstream> {
    config: Config,
    upstream: U,
}

impl<U: Upstream> Router<U> {
    pub const fn new(config: Config, upstream: U) -> Self {
        Self { config, upstream }
    }

    /// Route one request. The AI endpoint is matched before static files.
    pub fn route(&self, method: &str, url: &str, body: &str) -> Reply {
        let path = url.split('?').next().unwrap_or_default();
        if path == GENERATE_PATH {
            let api_key = self.config.ai.api_key();
            let response = proxy::handle(method, body, api_key.as_deref(), &self.upstream);
            return Reply {
                status: response.status,
                headers: response.headers,
                body: response.body.into_bytes(),
            };
        }

        if !matches!(method, "GET" | "HEAD") {
            return Reply::text(405, "405 Method Not Allowed");
        }
        self.static_file(url, method == "HEAD")
    }

    fn static_file(&self, url: &str, head: bool) -> Reply {
        let Some(path) = site::resolve(&self.config.server.dir, url) else {
            return Reply::text(404, "404 Not Found");
        };
        match fs::read(&path) {
            Ok(content) => Reply {
                status: 200,
                headers: vec![
                    ("Content-Type", site::content_type(&path)),
                    ("Cache-Control", site::cache_control(&path)),
                ],
                body: if head { Vec::new() } else { content },
            },
            Err(e) => {
                log::error!("serve: failed to read {}: {e}", path.display());
                Reply::text(500, "500 Internal Server Error")
            }
        }
    }
}

/// Serve until the process is stopped.
pub fn serve(config: Config) -> Result<(), ServeError> {
    config.validate()?;
    let addr = format!("0.0.0.0:{}", config.server.port);
    let server = Server::http(&addr).map_err(|e| ServeError::Bind {
        addr: addr.clone(),
        message: e.to_string(),
    })?;

    log::info!("Serving {} at http://localhost:{}", config.server.dir.display(), config.server.port);
    log::info!("AI endpoint: {GENERATE_PATH} (model {})", config.ai.model);
    if config.ai.api_key().is_none() {
        log::warn!(
            "{} is not set; the AI endpoint will answer 500",
            config.ai.api_key_env
        );
    }

    let upstream = GeminiClient::new(&config.ai);
    let router = Router::new(config, upstream);

    for mut request in server.incoming_requests() {
        let method = request.method().as_str().to_string();
        let url = request.url().to_string();

        let reply = match read_body(request.as_reader(), MAX_BODY_BYTES) {
            Ok(Some(body)) => router.route(&method, &url, &body),
            Ok(None) => {
                log::warn!("serve: body of {method} {url} exceeds {MAX_BODY_BYTES} bytes");
                Reply::text(413, "413 Payload Too Large")
            }
            Err(e) => {
                log::warn!("serve: could not read body of {method} {url}: {e}");
                router.route(&method, &url, "")
            }
        };
        log::info!("{method} {url} -> {}", reply.status);

        let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
        for (name, value) in reply.headers {
            if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                response.add_header(header);
            }
        }
        if let Err(e) = request.respond(response) {
            log::warn!("serve: failed to respond to {url}: {e}");
        }
    }
    Ok(())
}

/// Read a UTF-8 body of at most `limit` bytes. `None` if it is longer.
pub fn read_body(reader: impl Read, limit: u64) -> std::io::Result<Option<String>> {
    let mut body = String::new();
    reader.take(limit + 1).read_to_string(&mut body)?;
    Ok((body.len() as u64 <= limit).then_some(body))
}
