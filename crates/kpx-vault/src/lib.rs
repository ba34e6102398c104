//! Search core of the KeePassXC launcher extension
//!
//! Everything goes through `keepassxc-cli`; the database file is never read
//! directly.
//!
//! - [`KeepassxcDatabase`]: CLI wrapper tracking the passphrase and the
//!   inactivity lock
//! - [`SearchSession`]: active entry, backspace restore and recents
//! - [`render`]: result items and their actions
//! - [`Extension`]: the query state machine tying it together

pub mod database;
pub mod entry;
pub mod error;
pub mod extension;
pub mod preferences;
pub mod render;
pub mod session;

pub use database::{DEFAULT_CLI, KeepassxcDatabase};
pub use entry::{Attribute, EntryDetails};
pub use error::{Error, Result};
pub use extension::{Extension, PassphrasePrompt};
pub use preferences::Preferences;
pub use render::{Action, Response, ResultItem};
pub use session::SearchSession;
