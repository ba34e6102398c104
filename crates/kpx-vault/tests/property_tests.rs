//! Property tests for the recents list.

use kpx_vault::SearchSession;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn recents_are_bounded_unique_and_newest_first(
        entries in prop::collection::vec("[a-e]{1,2}", 1..40),
        max in 1usize..8,
    ) {
        let mut session = SearchSession::new();
        for entry in &entries {
            session.add_recent_entry(entry, max);
        }
        let recents = session.recent_entries();

        prop_assert!(recents.len() <= max);
        let unique: HashSet<_> = recents.iter().collect();
        prop_assert_eq!(unique.len(), recents.len());
        prop_assert_eq!(&recents[0], entries.last().unwrap());

        // Order matches the last occurrence of each entry, newest first
        let mut expected: Vec<&String> = Vec::new();
        for entry in entries.iter().rev() {
            if !expected.contains(&entry) {
                expected.push(entry);
            }
        }
        expected.truncate(max);
        let actual: Vec<&String> = recents.iter().collect();
        prop_assert_eq!(actual, expected);
    }
}
