use kpx_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalization_invariants(s in "[a-z./\\\\]{0,40}") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(as_str == "." || !as_str.split('/').any(|part| part == "."));
        prop_assert!(as_str == "/" || as_str == "." || !as_str.ends_with('/'));
    }

    #[test]
    fn normalization_is_idempotent(s in "[a-z./\\\\]{0,40}") {
        let once = NormalizedPath::new(&s);
        let twice = NormalizedPath::new(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn absolute_paths_never_contain_parent_segments(s in "/[a-z./]{0,40}") {
        let path = NormalizedPath::new(&s);
        prop_assert!(path.as_str().starts_with('/'));
        prop_assert!(!path.as_str().split('/').any(|part| part == ".."));
    }
}
