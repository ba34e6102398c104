//! Per-process interaction state between queries

/// What the user did since the last query.
///
/// Selecting a search result sets the query to `<keyword> <entry>`. The
/// next query then shows the entry details instead of searching, and
/// erasing characters from it brings back the previous search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    active_entry: Option<(String, String)>,
    search_restore: Option<(String, String)>,
    recent_entries: Vec<String>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the entry the user just selected under `keyword`
    pub fn set_active_entry(&mut self, keyword: &str, entry: &str) {
        self.active_entry = Some((keyword.to_string(), entry.to_string()));
    }

    /// Whether this query is the one produced by selecting the active
    /// entry. The active entry is cleared either way.
    pub fn check_and_reset_active_entry(&mut self, keyword: &str, entry: &str) -> bool {
        self.active_entry
            .take()
            .is_some_and(|(k, e)| k == keyword && e == entry)
    }

    /// Remember the search that led to `entry`
    pub fn set_search_restore(&mut self, entry: &str, prev_arg: &str) {
        self.search_restore = Some((entry.to_string(), prev_arg.to_string()));
    }

    /// The search to go back to when `arg` is the selected entry with some
    /// characters erased. The restore state is cleared either way.
    pub fn check_and_reset_search_restore(&mut self, arg: &str) -> Option<String> {
        let (entry, prev_arg) = self.search_restore.take()?;
        entry.starts_with(arg).then_some(prev_arg)
    }

    /// Move `entry` to the front of the recents, keeping at most `max`
    pub fn add_recent_entry(&mut self, entry: &str, max: usize) {
        self.recent_entries.retain(|e| e != entry);
        self.recent_entries.insert(0, entry.to_string());
        self.recent_entries.truncate(max);
    }

    /// Most recently selected entries, newest first
    pub fn recent_entries(&self) -> &[String] {
        &self.recent_entries
    }

    /// Forget everything tied to the previous database
    pub fn database_path_changed(&mut self) {
        self.recent_entries.clear();
        self.active_entry = None;
        self.search_restore = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn active_entry_matches_once() {
        let mut session = SearchSession::new();
        session.set_active_entry("kp", "bank");

        assert!(session.check_and_reset_active_entry("kp", "bank"));
        assert!(!session.check_and_reset_active_entry("kp", "bank"));
    }

    #[test]
    fn active_entry_mismatch_still_resets() {
        let mut session = SearchSession::new();
        session.set_active_entry("kp", "bank");

        assert!(!session.check_and_reset_active_entry("kp", "ban"));
        assert!(!session.check_and_reset_active_entry("kp", "bank"));
    }

    #[test]
    fn search_restore_after_backspace() {
        let mut session = SearchSession::new();
        session.set_search_restore("onlinesite work", "online");

        assert_eq!(
            session.check_and_reset_search_restore("onlinesite wor"),
            Some("online".to_string())
        );
        assert_eq!(session.check_and_reset_search_restore("onlinesite wor"), None);
    }

    #[test]
    fn search_restore_ignores_other_queries() {
        let mut session = SearchSession::new();
        session.set_search_restore("onlinesite work", "online");

        assert_eq!(session.check_and_reset_search_restore("bank"), None);
    }

    #[test]
    fn recents_move_to_front() {
        let mut session = SearchSession::new();
        session.add_recent_entry("a", 3);
        session.add_recent_entry("b", 3);
        session.add_recent_entry("a", 3);
        session.add_recent_entry("c", 3);
        session.add_recent_entry("d", 3);

        assert_eq!(session.recent_entries(), ["d", "c", "a"]);
    }

    #[test]
    fn database_change_clears_state() {
        let mut session = SearchSession::new();
        session.add_recent_entry("a", 3);
        session.set_active_entry("kp", "a");
        session.set_search_restore("a", "");

        session.database_path_changed();

        assert_eq!(session, SearchSession::new());
    }
}
