//! HTTP server: published component files plus pages with injected includes.
//!
//! Every request is first routed through the [`Publisher`]. Published
//! addresses are answered from component directories; everything else is the
//! host application, here a directory of pages. HTML pages get the configured
//! includes rendered and spliced in before `</head>`.

mod lifecycle;
mod path;
mod response;

pub use lifecycle::setup_shutdown_handler;

use anyhow::{Context, Result};
use bowerstatic::utils::mime;
use bowerstatic::{Bower, Publisher, Route, debug, inject, log, logger};
use std::sync::Arc;
use tiny_http::{Request, Server};

use crate::config::BowerConfig;

/// Number of request handler threads.
const WORKERS: usize = 4;

/// Everything a request handler needs, shared across workers.
struct App {
    publisher: Publisher,
    config: Arc<BowerConfig>,
}

/// Bind and run the request loop until Ctrl+C.
pub fn serve(config: Arc<BowerConfig>, bower: Arc<Bower>) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    debug!("serve"; "pages from {}", config.serve.root.display());

    let app = Arc::new(App {
        publisher: Publisher::new(bower),
        config,
    });
    run_request_loop(&server, &app)
}

fn run_request_loop(server: &Server, app: &Arc<App>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let app = Arc::clone(app);
        pool.spawn(move || {
            let method = request.method().as_str().to_string();
            let url = request.url().to_string();
            match handle_request(request, &app) {
                Ok(status) => logger::request(status, &method, &url),
                Err(e) => logger::failure(&format!("{method} {url}"), &format!("{e:#}")),
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request, returning the response status.
fn handle_request(request: Request, app: &App) -> Result<u16> {
    if lifecycle::is_shutdown() {
        return response::respond_unavailable(request);
    }

    match app.publisher.route(request.url()) {
        Route::File(file) => response::respond_published(request, &file),
        Route::NotFound => response::respond_not_found(request),
        Route::PassThrough => serve_page(request, app),
    }
}

/// Serve a page from the page root, injecting includes into HTML.
fn serve_page(request: Request, app: &App) -> Result<u16> {
    let Some(page) = path::resolve_page(request.url(), &app.config.serve.root) else {
        return response::respond_not_found(request);
    };
    let content_type = mime::from_path(&page);
    let body = std::fs::read(&page).with_context(|| format!("failed to read {}", page.display()))?;

    match include_page(request.method().as_str(), content_type, body, app) {
        Ok(body) => response::respond_page(request, content_type, body),
        Err(e) => {
            logger::failure(&format!("include failed for {}", request.url()), &format!("{e:#}"));
            response::respond_error(request, &e)
        }
    }
}

/// Record the configured includes for one page and inject them.
fn include_page(method: &str, content_type: &str, body: Vec<u8>, app: &App) -> Result<Vec<u8>> {
    let specs = &app.config.serve.include;
    if specs.is_empty() || !inject::should_inject(method, Some(content_type)) {
        return Ok(body);
    }

    let name = app
        .config
        .default_collection()
        .context("no collection configured for page includes")?;
    let collection = app.publisher.bower().require(name)?;

    let mut slot = None;
    let mut includer = collection.includer(&mut slot);
    for spec in specs {
        includer.include(spec, None)?;
    }
    Ok(inject::inject(method, Some(content_type), body, slot)?)
}
