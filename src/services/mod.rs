// KeeBook services

pub mod duplicate_checker;
pub mod icon_resolver;
pub mod notifier;
pub mod payload_decoder;
pub mod record_writer;
pub mod settings_engine;
