//! Result items shown to the user and the actions behind them

use crate::entry::{Attribute, EntryDetails};
use crate::Error;
use serde::Serialize;

const ICON_NOT_FOUND: &str = "images/not_found.svg";
const ICON_EMPTY: &str = "images/empty.png";
const ICON_ERROR: &str = "images/error.svg";
const ICON_LOCKED: &str = "images/keepassxc-search-locked.svg";
const ICON_SEARCH: &str = "images/keepassxc-search.svg";
const ICON_KEY: &str = "images/key.svg";
const ICON_COPY: &str = "images/copy.svg";

/// What happens when an item is selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    DoNothing,
    /// Ask for the passphrase and unlock the database
    ReadPassphrase,
    /// Show the details of `entry` by setting the query to it
    ActivateEntry {
        keyword: String,
        entry: String,
        prev_query_arg: String,
    },
    /// Replace the whole query text
    SetUserQuery(String),
    /// Copy `text` and tell the user with `notification`
    CopyToClipboard { text: String, notification: String },
}

/// One row of the result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub icon: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rendered as a compact single-line item
    pub small: bool,
    pub on_enter: Action,
}

impl ResultItem {
    fn new(icon: &str, name: impl Into<String>, description: impl Into<String>, on_enter: Action) -> Self {
        Self {
            icon: icon.to_string(),
            name: name.into(),
            description: Some(description.into()),
            small: false,
            on_enter,
        }
    }

    fn small(icon: &str, name: impl Into<String>, on_enter: Action) -> Self {
        Self {
            icon: icon.to_string(),
            name: name.into(),
            description: None,
            small: true,
            on_enter,
        }
    }
}

/// Reply to a query or a selected item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Response {
    /// Show these items
    Render(Vec<ResultItem>),
    /// Perform an action without changing the list
    Action(Action),
}

impl Response {
    pub fn nothing() -> Self {
        Self::Action(Action::DoNothing)
    }

    pub fn set_user_query(keyword: &str, arg: &str) -> Self {
        Self::Action(Action::SetUserQuery(format!("{} {}", keyword, arg)))
    }
}

pub fn no_search_results() -> ResultItem {
    ResultItem::new(
        ICON_NOT_FOUND,
        "No matching entries found...",
        "Please check spelling or make the query less specific",
        Action::DoNothing,
    )
}

pub fn more_results_available(count: usize) -> ResultItem {
    ResultItem::small(
        ICON_EMPTY,
        format!(
            "...{} more results available, please refine the search query...",
            count
        ),
        Action::DoNothing,
    )
}

pub fn cli_not_found_error() -> Vec<ResultItem> {
    vec![ResultItem::new(
        ICON_ERROR,
        "Cannot execute keepassxc-cli",
        "Please make sure keepassxc-cli is installed and accessible",
        Action::DoNothing,
    )]
}

pub fn db_file_not_found_error() -> Vec<ResultItem> {
    vec![ResultItem::new(
        ICON_ERROR,
        "Cannot find the database file",
        "Please verify database file path in extension preferences",
        Action::DoNothing,
    )]
}

pub fn keepassxc_cli_error(message: &str) -> Vec<ResultItem> {
    vec![ResultItem::new(
        ICON_ERROR,
        "Error while calling keepassxc CLI",
        message,
        Action::DoNothing,
    )]
}

pub fn ask_to_enter_passphrase() -> Vec<ResultItem> {
    vec![ResultItem::new(
        ICON_LOCKED,
        "Unlock KeePassXC database",
        "Enter passphrase to unlock the KeePassXC database",
        Action::ReadPassphrase,
    )]
}

pub fn ask_to_enter_query() -> Vec<ResultItem> {
    vec![ResultItem::new(
        ICON_SEARCH,
        "Enter search query...",
        "Please enter your search query",
        Action::DoNothing,
    )]
}

/// Map an error to the items explaining it
pub fn error(err: &Error) -> Vec<ResultItem> {
    match err {
        Error::CliNotFound => cli_not_found_error(),
        Error::FileNotFound { .. } | Error::NoDatabase => db_file_not_found_error(),
        Error::LockedDatabase => ask_to_enter_passphrase(),
        Error::Cli { message } => keepassxc_cli_error(message),
        other => keepassxc_cli_error(&other.to_string()),
    }
}

/// At most `max_items` entries, then a hint about how many were left out
pub fn search_results(keyword: &str, arg: &str, entries: &[String], max_items: usize) -> Vec<ResultItem> {
    if entries.is_empty() {
        return vec![no_search_results()];
    }

    let mut items: Vec<ResultItem> = entries
        .iter()
        .take(max_items)
        .map(|entry| {
            let action = Action::ActivateEntry {
                keyword: keyword.to_string(),
                entry: entry.clone(),
                prev_query_arg: arg.to_string(),
            };
            ResultItem::small(ICON_KEY, entry.as_str(), action)
        })
        .collect();

    if entries.len() > max_items {
        items.push(more_results_available(entries.len() - max_items));
    }
    items
}

/// One item per non-empty attribute, each copying its value
pub fn active_entry(details: &EntryDetails) -> Vec<ResultItem> {
    details
        .present()
        .map(|(attr, value)| {
            let label = attr.label();
            let action = Action::CopyToClipboard {
                text: value.to_string(),
                notification: format!("{} copied to the clipboard.", capitalize(label)),
            };
            if attr == Attribute::Password {
                ResultItem::small(ICON_COPY, "Copy password to the clipboard", action)
            } else {
                ResultItem::new(
                    ICON_COPY,
                    format!("{}: {}", capitalize(label), value),
                    format!("Copy {} to the clipboard", label),
                    action,
                )
            }
        })
        .collect()
}

/// First letter upper case, the rest lower case
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("entry {}", i)).collect()
    }

    #[test]
    fn empty_search_shows_not_found() {
        let items = search_results("kp", "zzz", &[], 10);
        assert_eq!(items, vec![no_search_results()]);
    }

    #[test]
    fn search_results_truncate_with_hint() {
        let items = search_results("kp", "entry", &entries(12), 10);

        assert_eq!(items.len(), 11);
        assert!(items[..10].iter().all(|i| i.small));
        assert_eq!(
            items[10].name,
            "...2 more results available, please refine the search query..."
        );
    }

    #[test]
    fn search_results_exact_fit_has_no_hint() {
        let items = search_results("kp", "entry", &entries(3), 3);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn search_result_action_carries_query() {
        let items = search_results("kp", "onl", &["onlinesite work".to_string()], 10);
        assert_eq!(
            items[0].on_enter,
            Action::ActivateEntry {
                keyword: "kp".into(),
                entry: "onlinesite work".into(),
                prev_query_arg: "onl".into(),
            }
        );
    }

    #[test]
    fn active_entry_texts() {
        let details = EntryDetails {
            username: "me".into(),
            password: "pw".into(),
            url: "https://example.com".into(),
            notes: String::new(),
        };
        let items = active_entry(&details);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Copy password to the clipboard",
                "Username: me",
                "Url: https://example.com",
            ]
        );
        assert_eq!(items[2].description.as_deref(), Some("Copy URL to the clipboard"));
        assert_eq!(
            items[0].on_enter,
            Action::CopyToClipboard {
                text: "pw".into(),
                notification: "Password copied to the clipboard.".into(),
            }
        );
    }

    #[test]
    fn errors_map_to_items() {
        assert_eq!(error(&Error::CliNotFound)[0].name, "Cannot execute keepassxc-cli");
        assert_eq!(
            error(&Error::Cli { message: "boom".into() })[0].description.as_deref(),
            Some("boom")
        );
        assert_eq!(error(&Error::LockedDatabase)[0].on_enter, Action::ReadPassphrase);
    }

    #[test]
    fn capitalize_lowers_the_rest() {
        assert_eq!(capitalize("URL"), "Url");
        assert_eq!(capitalize("username"), "Username");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn items_serialize_without_empty_description() {
        let json = serde_json::to_value(more_results_available(1)).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["on_enter"]["type"], "do_nothing");
    }
}
