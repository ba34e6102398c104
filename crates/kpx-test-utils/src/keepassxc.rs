//! A scripted stand-in for `keepassxc-cli`.
//!
//! The "database" is a plain text file: the passphrase on line one, a mode
//! on line two, then one `title|username|password|url|notes` entry per line.
//! Notes may use `\n` for line breaks. The script is run through `sh` so it
//! never has to be executable.

use std::fs;
use std::path::{Path, PathBuf};

const SCRIPT: &str = r#"#!/bin/sh
IFS= read -r pass || true
if [ $# -eq 0 ]; then
  echo "Usage: keepassxc-cli [options] command" >&2
  exit 1
fi
cmd="$1"; shift
attr=""
while [ $# -gt 0 ]; do
  case "$1" in
    -q|--quiet) shift ;;
    -a|--attributes) attr="$2"; shift 2 ;;
    *) break ;;
  esac
done
db="$1"; shift
if [ ! -f "$db" ]; then
  echo "Failed to open database file $db: not found" >&2
  exit 1
fi
expected=$(sed -n 1p "$db")
mode=$(sed -n 2p "$db")
if [ "$pass" != "$expected" ]; then
  echo "Error while reading the database: Invalid credentials were provided, please try again." >&2
  exit 1
fi
entries() { sed -n '3,$p' "$db"; }
case "$cmd" in
  ls)
    entries | cut -d'|' -f1
    ;;
  locate|search)
    if [ "$cmd" = locate ] && [ "$mode" = "no-locate" ]; then
      echo "Invalid command locate." >&2
      exit 1
    fi
    out=$(entries | awk -F'|' -v q="$1" 'index(tolower($1), tolower(q)) { print "/" $1 }')
    if [ -z "$out" ]; then
      echo "No results for that search term." >&2
      exit 1
    fi
    printf '%s\n' "$out"
    ;;
  show)
    name="${1#/}"
    line=$(entries | awk -F'|' -v n="$name" '$1 == n')
    if [ -z "$line" ]; then
      echo "Could not find entry with path $1." >&2
      exit 1
    fi
    case "$attr" in
      UserName) f=2 ;;
      Password) f=3 ;;
      URL) f=4 ;;
      Notes) f=5 ;;
      *) echo "ERROR: unknown attribute $attr." >&2; exit 1 ;;
    esac
    printf '%b\n' "$(printf '%s' "$line" | cut -d'|' -f$f)"
    ;;
  *)
    echo "Invalid command $cmd." >&2
    exit 1
    ;;
esac
"#;

/// One fake database entry
#[derive(Debug, Clone)]
pub struct FakeEntry {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
}

impl FakeEntry {
    pub fn new(title: &str, username: &str, password: &str, url: &str, notes: &str) -> Self {
        Self {
            title: title.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            url: url.to_string(),
            notes: notes.to_string(),
        }
    }
}

/// A fake database file plus the script that serves it
#[derive(Debug, Clone)]
pub struct FakeKeepassxc {
    /// Path of the script; run it as `sh <script> ...`
    pub script: PathBuf,
    /// Path of the database file
    pub database: PathBuf,
}

impl FakeKeepassxc {
    /// Write the script and a database with the standard fixture entries.
    ///
    /// The passphrase is `right passphrase`.
    pub fn standard(dir: &Path) -> Self {
        Self::with_entries(
            dir,
            "test.kdbx",
            "right passphrase",
            true,
            &[
                FakeEntry::new("onlinesite personal", "username", "password", "url", "line1\\nline2"),
                FakeEntry::new("onlinesite work", "worker", "hunter2", "https://work.example", ""),
                FakeEntry::new("bank", "me", "s3cret", "", ""),
            ],
        )
    }

    /// Write the script and a database with the given entries.
    ///
    /// When `locate_supported` is false the `locate` command fails the way
    /// older CLI versions do, forcing a fallback to `search`.
    pub fn with_entries(
        dir: &Path,
        db_name: &str,
        passphrase: &str,
        locate_supported: bool,
        entries: &[FakeEntry],
    ) -> Self {
        fs::create_dir_all(dir).unwrap();
        let script = dir.join("keepassxc-cli.sh");
        fs::write(&script, SCRIPT).unwrap();

        let mode = if locate_supported { "normal" } else { "no-locate" };
        let mut content = format!("{}\n{}\n", passphrase, mode);
        for e in entries {
            content.push_str(&format!(
                "{}|{}|{}|{}|{}\n",
                e.title, e.username, e.password, e.url, e.notes
            ));
        }
        let database = dir.join(db_name);
        fs::write(&database, content).unwrap();

        Self { script, database }
    }

    /// Program and leading arguments that invoke the fake CLI
    pub fn command(&self) -> (String, Vec<String>) {
        (
            "sh".to_string(),
            vec![self.script.to_string_lossy().to_string()],
        )
    }
}
