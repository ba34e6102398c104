//! The query state machine: keyword queries, selected items and
//! preference changes

use crate::database::KeepassxcDatabase;
use crate::preferences::{Preferences, parse_number};
use crate::render::{self, Action, Response};
use crate::session::SearchSession;
use crate::Result;

/// Preference ids, as the launcher names them
pub const PREF_DATABASE_PATH: &str = "database-path";
pub const PREF_MAX_RESULTS: &str = "max-results";
pub const PREF_INACTIVITY_LOCK_TIMEOUT: &str = "inactivity-lock-timeout";

/// Source of passphrases when the user asks to unlock
pub trait PassphrasePrompt {
    /// Ask for the passphrase. `retry` is set after a rejected attempt.
    /// `None` means the user gave up.
    fn read_passphrase(&mut self, retry: bool) -> Option<String>;

    /// Called once the database is unlocked
    fn unlocked(&mut self) {}
}

/// Database, session and preferences of one running extension
#[derive(Debug)]
pub struct Extension {
    db: KeepassxcDatabase,
    session: SearchSession,
    preferences: Preferences,
}

impl Extension {
    pub fn new(db: KeepassxcDatabase, preferences: Preferences) -> Self {
        Self {
            db,
            session: SearchSession::new(),
            preferences,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn database(&mut self) -> &mut KeepassxcDatabase {
        &mut self.db
    }

    /// Check the CLI and the database file for the current preferences
    pub fn initialize(&mut self) -> Result<()> {
        self.db.initialize(
            &self.preferences.db_path(),
            self.preferences.inactivity_lock_timeout,
        )
    }

    /// Prompt until the passphrase verifies or the prompt is cancelled.
    /// Returns whether the database ended up unlocked.
    pub fn unlock(&mut self, prompt: &mut dyn PassphrasePrompt) -> Result<bool> {
        let mut retry = false;
        while let Some(passphrase) = prompt.read_passphrase(retry) {
            if self.db.verify_and_set_passphrase(&passphrase)? {
                prompt.unlocked();
                return Ok(true);
            }
            retry = true;
        }
        tracing::debug!("Passphrase prompt cancelled");
        Ok(false)
    }

    /// Handle `<keyword> <arg>` typed by the user
    pub fn on_keyword_query(&mut self, keyword: &str, arg: &str) -> Response {
        let result = self.initialize().and_then(|()| {
            if self.db.is_passphrase_needed() {
                return Ok(Response::Render(render::ask_to_enter_passphrase()));
            }
            self.process_keyword_query(keyword, arg)
        });
        result.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Query failed");
            Response::Render(render::error(&e))
        })
    }

    fn process_keyword_query(&mut self, keyword: &str, arg: &str) -> Result<Response> {
        let max_results = self.preferences.max_results;

        if arg.is_empty() {
            let recents = self.session.recent_entries();
            if recents.is_empty() {
                return Ok(Response::Render(render::ask_to_enter_query()));
            }
            return Ok(Response::Render(render::search_results(
                keyword,
                "",
                recents,
                max_results,
            )));
        }

        if self.session.check_and_reset_active_entry(keyword, arg) {
            let details = self.db.get_entry_details(arg)?;
            return Ok(Response::Render(render::active_entry(&details)));
        }

        if let Some(prev_arg) = self.session.check_and_reset_search_restore(arg) {
            if !prev_arg.is_empty() {
                return Ok(Response::set_user_query(keyword, &prev_arg));
            }
        }

        let entries = self.db.search(arg)?;
        tracing::debug!(query = arg, found = entries.len(), "Search finished");
        Ok(Response::Render(render::search_results(
            keyword,
            arg,
            &entries,
            max_results,
        )))
    }

    /// Handle the action of a selected item
    pub fn on_item_enter(&mut self, action: &Action, prompt: &mut dyn PassphrasePrompt) -> Response {
        match action {
            Action::ReadPassphrase => match self.unlock(prompt) {
                Ok(_) => Response::nothing(),
                Err(e) => Response::Render(render::error(&e)),
            },
            Action::ActivateEntry {
                keyword,
                entry,
                prev_query_arg,
            } => {
                self.session.set_active_entry(keyword, entry);
                self.session.set_search_restore(entry, prev_query_arg);
                self.session
                    .add_recent_entry(entry, self.preferences.max_results);
                Response::set_user_query(keyword, entry)
            }
            _ => Response::nothing(),
        }
    }

    /// Apply a preference change. Unchanged values and unknown ids are
    /// ignored.
    pub fn on_preferences_update(&mut self, id: &str, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        match id {
            PREF_DATABASE_PATH => {
                self.preferences.database_path = new.to_string();
                self.db.change_path(new);
                self.session.database_path_changed();
            }
            PREF_INACTIVITY_LOCK_TIMEOUT => {
                let secs = parse_number(id, new)?;
                self.preferences.inactivity_lock_timeout = secs;
                self.db.change_inactivity_lock_timeout(secs);
            }
            PREF_MAX_RESULTS => {
                self.preferences.max_results = parse_number(id, new)?;
            }
            _ => tracing::debug!(id, "Ignoring unknown preference"),
        }
        tracing::info!(id, value = new, "Preference updated");
        Ok(())
    }
}
