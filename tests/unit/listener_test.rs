//! Integration tests for the loopback listener: real sockets, real HTTP
//! requests, full pipeline behind them.
//!
//! Port 0 is used throughout so the tests never collide with a running
//! companion or with each other.

use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;
use std::time::Duration;

use keebook::listener::BookmarkListener;
use keebook::services::icon_resolver::IconResolver;
use keebook::services::notifier::UiNotifier;
use keebook::services::payload_decoder::{encode_field, PayloadDecoder};
use keebook::services::settings_engine::FlagSource;
use keebook::store::{self, MemoryVault, SharedVault, VaultStore};
use keebook::types::errors::ListenerError;
use keebook::types::record::{Group, GROUP_NAME, LAST_ACCESSED_TITLE};
use keebook::types::settings::{DecodeMode, Flag};

struct AllDefaults;

impl FlagSource for AllDefaults {
    fn get_flag(&self, flag: Flag) -> bool {
        !matches!(flag, Flag::ShowDebugMessages)
    }
}

struct SilentNotifier;

impl UiNotifier for SilentNotifier {
    fn refresh_ui(&self, _group: &Group) {}
    fn show_success(&self, _title: &str) {}
}

fn listener(port: u16, vault: SharedVault) -> BookmarkListener {
    BookmarkListener::new(
        port,
        vault,
        PayloadDecoder::new(DecodeMode::Aes),
        IconResolver::new(Duration::from_secs(1)).unwrap(),
        Arc::new(AllDefaults),
        Arc::new(SilentNotifier),
    )
}

fn save_url(addr: SocketAddr, title: &str, link: &str) -> String {
    format!(
        "http://{}/add?t={}&u={}",
        addr,
        urlencoding::encode(&encode_field(DecodeMode::Aes, title)),
        urlencoding::encode(&encode_field(DecodeMode::Aes, link)),
    )
}

fn get(url: &str) -> reqwest::blocking::Response {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
        .get(url)
        .send()
        .unwrap()
}

#[test]
fn test_save_request_over_http() {
    let vault = store::shared(MemoryVault::new());
    let mut listener = listener(0, vault.clone());
    let addr = listener.start().unwrap();

    let response = get(&save_url(addr, "Example Domain", "https://example.com"));
    assert_eq!(response.status().as_u16(), 204);

    // The 204 is only sent after the record is committed.
    let mut store = vault.lock().unwrap();
    let group = store.find_or_create_group(GROUP_NAME).unwrap();
    let records = store.list_records(&group).unwrap();
    let saved = records
        .iter()
        .find(|r| r.title == "Example Domain")
        .expect("record was not written");
    assert_eq!(saved.url, "https://example.com");
    assert!(records.iter().any(|r| r.title == LAST_ACCESSED_TITLE));
    drop(store);

    assert_eq!(
        listener.last_request_uri().as_deref().map(|u| &u[..5]),
        Some("/add?")
    );
    listener.stop();
}

#[test]
fn test_malformed_request_gets_400() {
    let vault = store::shared(MemoryVault::new());
    let mut listener = listener(0, vault.clone());
    let addr = listener.start().unwrap();

    // Missing the required u parameter.
    let response = get(&format!("http://{}/add?t=YQ%3D%3D", addr));
    assert_eq!(response.status().as_u16(), 400);

    // Undecodable title ciphertext.
    let response = get(&format!("http://{}/add?t=%25%25&u=YQ", addr));
    assert_eq!(response.status().as_u16(), 400);

    let mut store = vault.lock().unwrap();
    let group = store.find_or_create_group(GROUP_NAME).unwrap();
    assert!(store.list_records(&group).unwrap().is_empty());
    drop(store);

    listener.stop();
}

#[test]
fn test_double_start_rejected() {
    let mut listener = listener(0, store::shared(MemoryVault::new()));
    listener.start().unwrap();
    assert!(matches!(listener.start(), Err(ListenerError::AlreadyRunning)));
    listener.stop();
}

#[test]
fn test_taken_port_is_a_bind_error() {
    let holder = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let port = holder.local_addr().unwrap().port();

    let mut listener = listener(port, store::shared(MemoryVault::new()));
    assert!(matches!(listener.start(), Err(ListenerError::Bind(_))));
}

#[test]
fn test_stop_releases_the_port() {
    let mut listener = listener(0, store::shared(MemoryVault::new()));
    let addr = listener.start().unwrap();
    assert!(listener.is_running());

    listener.stop();
    assert!(!listener.is_running());
    assert!(listener.local_addr().is_none());

    // The port must be immediately rebindable.
    StdTcpListener::bind(addr).expect("port was not released");
}

#[test]
fn test_restart_after_stop() {
    let vault = store::shared(MemoryVault::new());
    let mut listener = listener(0, vault.clone());
    listener.start().unwrap();
    listener.stop();

    let addr = listener.start().unwrap();
    let response = get(&save_url(addr, "After Restart", "https://again.example"));
    assert_eq!(response.status().as_u16(), 204);

    let mut store = vault.lock().unwrap();
    let group = store.find_or_create_group(GROUP_NAME).unwrap();
    assert!(store
        .list_records(&group)
        .unwrap()
        .iter()
        .any(|r| r.title == "After Restart"));
    drop(store);

    listener.stop();
}
