// KeeBook shared type definitions

pub mod errors;
pub mod record;
pub mod settings;
