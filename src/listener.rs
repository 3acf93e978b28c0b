//! Loopback HTTP listener for the browser extension.
//!
//! Binds one fixed local port, accepts save requests on a dedicated thread
//! and dispatches each request to its own handler thread so the accept
//! loop keeps listening. The listener is an owned service object with an
//! explicit start/stop lifecycle; stopping sets a cooperative flag,
//! unblocks the accept wait and releases the port. Handlers already past
//! the stop-flag check are allowed to finish.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, warn};
use tiny_http::{Response, Server};

use crate::request_handler::{self, SaveOutcome};
use crate::services::icon_resolver::IconResolver;
use crate::services::notifier::UiNotifier;
use crate::services::payload_decoder::PayloadDecoder;
use crate::services::settings_engine::FlagSource;
use crate::store::SharedVault;
use crate::types::errors::{DecodeError, ListenerError};
use crate::types::record::BookmarkRequest;
use crate::types::settings::Flag;

/// How long the accept loop waits before re-checking the stop flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Shared collaborators cloned into every handler thread.
#[derive(Clone)]
struct HandlerDeps {
    vault: SharedVault,
    decoder: Arc<PayloadDecoder>,
    resolver: Arc<IconResolver>,
    flags: Arc<dyn FlagSource>,
    notifier: Arc<dyn UiNotifier>,
    stopped: Arc<AtomicBool>,
    last_uri: Arc<Mutex<Option<String>>>,
}

/// The loopback bookmark listener service.
pub struct BookmarkListener {
    port: u16,
    deps: HandlerDeps,
    server: Option<Arc<Server>>,
    accept_thread: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl BookmarkListener {
    pub fn new(
        port: u16,
        vault: SharedVault,
        decoder: PayloadDecoder,
        resolver: IconResolver,
        flags: Arc<dyn FlagSource>,
        notifier: Arc<dyn UiNotifier>,
    ) -> Self {
        Self {
            port,
            deps: HandlerDeps {
                vault,
                decoder: Arc::new(decoder),
                resolver: Arc::new(resolver),
                flags,
                notifier,
                stopped: Arc::new(AtomicBool::new(false)),
                last_uri: Arc::new(Mutex::new(None)),
            },
            server: None,
            accept_thread: None,
            local_addr: None,
        }
    }

    /// Binds the loopback port and starts the accept loop.
    ///
    /// A taken port is a fatal initialization failure, surfaced as
    /// [`ListenerError::Bind`]. Returns the bound address (useful when the
    /// configured port is 0).
    pub fn start(&mut self) -> Result<SocketAddr, ListenerError> {
        if self.accept_thread.is_some() {
            return Err(ListenerError::AlreadyRunning);
        }

        let addr = format!("127.0.0.1:{}", self.port);
        let server = Server::http(&addr).map_err(|e| ListenerError::Bind(e.to_string()))?;
        let local_addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| ListenerError::Bind("no IP listen address".to_string()))?;

        let server = Arc::new(server);
        self.deps.stopped.store(false, Ordering::SeqCst);

        let accept_server = Arc::clone(&server);
        let deps = self.deps.clone();
        let handle = thread::spawn(move || accept_loop(accept_server, deps));

        self.server = Some(server);
        self.accept_thread = Some(handle);
        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    /// Signals the accept loop to exit, waits for it and releases the port.
    ///
    /// In-flight handlers past the stop-flag check run to completion; new
    /// requests observed after the flag is set are answered without any
    /// state mutation.
    pub fn stop(&mut self) {
        self.deps.stopped.store(true, Ordering::SeqCst);
        if let Some(server) = &self.server {
            server.unblock();
        }
        if let Some(handle) = self.accept_thread.take() {
            if handle.join().is_err() {
                warn!("accept thread panicked during shutdown");
            }
        }
        // Dropping the server closes the socket and frees the port.
        self.server = None;
        self.local_addr = None;
    }

    /// True while the accept loop is running.
    pub fn is_running(&self) -> bool {
        self.accept_thread.is_some()
    }

    /// The bound address, when running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// URI of the most recently received request, for diagnostics.
    pub fn last_request_uri(&self) -> Option<String> {
        match self.deps.last_uri.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Drop for BookmarkListener {
    fn drop(&mut self) {
        if self.accept_thread.is_some() {
            self.stop();
        }
    }
}

fn accept_loop(server: Arc<Server>, deps: HandlerDeps) {
    while !deps.stopped.load(Ordering::SeqCst) {
        match server.recv_timeout(ACCEPT_POLL_INTERVAL) {
            Ok(Some(request)) => {
                let deps = deps.clone();
                // Dispatch asynchronously so the accept loop can
                // immediately wait for the next request.
                thread::spawn(move || handle_connection(request, deps));
            }
            Ok(None) => {} // timed out; re-check the stop flag
            Err(e) => {
                if deps.stopped.load(Ordering::SeqCst) {
                    break;
                }
                error!("{}", ListenerError::Accept(e.to_string()));
            }
        }
    }
}

fn handle_connection(request: tiny_http::Request, deps: HandlerDeps) {
    // Requests racing the shutdown are answered but mutate nothing.
    if deps.stopped.load(Ordering::SeqCst) {
        let _ = request.respond(Response::empty(204));
        return;
    }

    let uri = request.url().to_string();
    match deps.last_uri.lock() {
        Ok(mut guard) => *guard = Some(uri.clone()),
        Err(poisoned) => *poisoned.into_inner() = Some(uri.clone()),
    }

    let status = match parse_save_query(&uri) {
        Err(e) => {
            if deps.flags.get_flag(Flag::ShowDebugMessages) {
                debug!("rejected request '{}': {}", uri, e);
            }
            400
        }
        Ok(bookmark_request) => {
            let outcome = request_handler::handle_save_request(
                &deps.vault,
                &deps.decoder,
                &deps.resolver,
                deps.flags.as_ref(),
                deps.notifier.as_ref(),
                &bookmark_request,
            );
            match outcome {
                Ok(SaveOutcome::Saved(_)) | Ok(SaveOutcome::Skipped) => 204,
                Err(e) => {
                    if deps.flags.get_flag(Flag::ShowDebugMessages) {
                        debug!("request aborted: {}", e);
                    }
                    400
                }
            }
        }
    };

    // The caller is fire-and-forget; response failures are not actionable.
    let _ = request.respond(Response::empty(status));
}

/// Parses the save endpoint's query string into a raw request.
///
/// Expects `t` (title) and `u` (url); `i` (icon source) is optional.
/// Values are percent-decoded here, before payload decoding.
pub fn parse_save_query(url: &str) -> Result<BookmarkRequest, DecodeError> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");

    let mut title = None;
    let mut link = None;
    let mut icon = None;
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(value)
            .map_err(|e| DecodeError::Utf8(e.to_string()))?
            .into_owned();
        match key {
            "t" => title = Some(value),
            "u" => link = Some(value),
            "i" => icon = Some(value),
            _ => {}
        }
    }

    Ok(BookmarkRequest {
        raw_title: title.ok_or_else(|| DecodeError::MissingField("t".to_string()))?,
        raw_url: link.ok_or_else(|| DecodeError::MissingField("u".to_string()))?,
        raw_icon: icon.unwrap_or_default(),
    })
}
