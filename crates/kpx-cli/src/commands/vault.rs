//! Database commands: search, show, query
//!
//! These drive the same state machine the launcher does. Passphrases are
//! read with a hidden prompt on a terminal, or as one line from stdin
//! otherwise.

use std::io::{BufRead, IsTerminal};

use colored::Colorize;
use dialoguer::{Input, Password};
use kpx_vault::{Action, Attribute, Extension, PassphrasePrompt, Response, ResultItem};

use crate::cli::{DEFAULT_KEYWORD, DatabaseArgs};
use crate::context::Context;
use crate::error::{CliError, Result};

/// Reads passphrases from the terminal, or from piped stdin
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    piped_read: bool,
}

impl PassphrasePrompt for TerminalPrompt {
    fn read_passphrase(&mut self, retry: bool) -> Option<String> {
        if !std::io::stdin().is_terminal() {
            // A pipe gets exactly one attempt
            if self.piped_read {
                return None;
            }
            self.piped_read = true;
            let mut line = String::new();
            return match std::io::stdin().lock().read_line(&mut line) {
                Ok(0) | Err(_) => None,
                Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            };
        }

        if retry {
            eprintln!("{}", "Incorrect passphrase, please try again".red());
        }
        Password::new()
            .with_prompt("KeePassXC passphrase")
            .allow_empty_password(false)
            .interact()
            .ok()
            .filter(|p| !p.is_empty())
    }

    fn unlocked(&mut self) {
        eprintln!("{}", "KeePassXC database unlocked.".green());
    }
}

/// Check the database and make sure it is unlocked
fn open_extension(ctx: &Context, args: &DatabaseArgs) -> Result<Extension> {
    let mut ext = Extension::new(ctx.database()?, ctx.preferences(args));
    if ext.preferences().database_path.is_empty() {
        return Err(CliError::user(
            "No database configured: pass --database or set database-path in [extension]",
        ));
    }
    ext.initialize()?;

    if ext.database().is_passphrase_needed() && !ext.unlock(&mut TerminalPrompt::default())? {
        return Err(CliError::user("Database is locked"));
    }
    Ok(ext)
}

/// Search entry titles and print the rendered results
pub fn run_search(ctx: &Context, query: &str, json: bool, args: &DatabaseArgs) -> Result<()> {
    let mut ext = open_extension(ctx, args)?;
    let response = ext.on_keyword_query(DEFAULT_KEYWORD, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    match response {
        Response::Render(items) => print_items(&items, false),
        Response::Action(action) => tracing::debug!(?action, "Query produced no items"),
    }
    Ok(())
}

/// Print the details of one entry, or a single attribute of it
pub fn run_show(
    ctx: &Context,
    entry: &str,
    attr: Option<Attribute>,
    json: bool,
    args: &DatabaseArgs,
) -> Result<()> {
    let mut ext = open_extension(ctx, args)?;
    let details = ext.database().get_entry_details(entry)?;

    if let Some(attr) = attr {
        println!("{}", details.get(attr));
        return Ok(());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{}", entry.bold());
    for (attr, value) in details.present() {
        let shown = if attr == Attribute::Password {
            "********".to_string()
        } else {
            value.replace('\n', "\n            ")
        };
        println!("  {:<9} {}", format!("{}:", attr.label()).dimmed(), shown);
    }
    Ok(())
}

/// Interactive session: type a query, pick an item with `#N`, `q` quits
pub fn run_query(ctx: &Context, keyword: &str, args: &DatabaseArgs) -> Result<()> {
    let mut ext = Extension::new(ctx.database()?, ctx.preferences(args));
    let mut prompt = TerminalPrompt::default();
    let mut items: Vec<ResultItem> = Vec::new();
    let mut initial = String::new();

    println!(
        "Type a search query, {} to select a result, {} to quit.",
        "#N".cyan(),
        "q".cyan()
    );

    loop {
        let line: String = Input::new()
            .with_prompt(keyword)
            .with_initial_text(initial.clone())
            .allow_empty(true)
            .interact_text()?;
        initial.clear();
        let line = line.trim();

        if line == "q" {
            return Ok(());
        }

        let mut response = match parse_selection(line, items.len()) {
            Some(index) => select(&mut ext, keyword, &items[index], &mut prompt),
            None => ext.on_keyword_query(keyword, line),
        };

        // Setting the query makes the launcher query again
        while let Response::Action(Action::SetUserQuery(query)) = &response {
            let arg = query
                .strip_prefix(keyword)
                .map(str::trim_start)
                .unwrap_or(query)
                .to_string();
            println!("{} {} {}", "=>".blue().bold(), keyword, arg);
            response = ext.on_keyword_query(keyword, &arg);
            initial = arg;
        }

        if let Response::Render(rendered) = response {
            print_items(&rendered, true);
            items = rendered;
        }
    }
}

fn select(
    ext: &mut Extension,
    keyword: &str,
    item: &ResultItem,
    prompt: &mut TerminalPrompt,
) -> Response {
    match &item.on_enter {
        Action::CopyToClipboard { text, notification } => {
            println!("{}", text);
            eprintln!("{}", notification.green());
            Response::nothing()
        }
        Action::ReadPassphrase => {
            match ext.on_item_enter(&Action::ReadPassphrase, prompt) {
                // Query again now that the database is unlocked
                Response::Action(_) => Response::set_user_query(keyword, ""),
                errors => errors,
            }
        }
        action => ext.on_item_enter(action, prompt),
    }
}

/// `#N` with N in `1..=count`, as a zero-based index
fn parse_selection(line: &str, count: usize) -> Option<usize> {
    let n: usize = line.strip_prefix('#')?.trim().parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

fn print_items(items: &[ResultItem], numbered: bool) {
    for (i, item) in items.iter().enumerate() {
        let marker = if numbered {
            format!("{:>3}", format!("#{}", i + 1)).cyan().to_string()
        } else {
            "  -".dimmed().to_string()
        };
        match &item.description {
            Some(description) if !item.small => {
                println!("{} {}", marker, item.name.bold());
                println!("    {}", description.dimmed());
            }
            _ => println!("{} {}", marker, item.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_one_based_and_bounded() {
        assert_eq!(parse_selection("#1", 3), Some(0));
        assert_eq!(parse_selection("# 3", 3), Some(2));
        assert_eq!(parse_selection("#0", 3), None);
        assert_eq!(parse_selection("#4", 3), None);
        assert_eq!(parse_selection("3", 3), None);
        assert_eq!(parse_selection("#x", 3), None);
    }
}
