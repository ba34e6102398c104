//! Entry attributes as exposed by `keepassxc-cli show`

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An entry attribute the extension knows how to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    UserName,
    Password,
    Url,
    Notes,
}

impl Attribute {
    /// In the order they are fetched and displayed
    pub const ALL: [Attribute; 4] = [Self::Password, Self::UserName, Self::Url, Self::Notes];

    /// Attribute name understood by `keepassxc-cli show -a`
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::UserName => "UserName",
            Self::Password => "Password",
            Self::Url => "URL",
            Self::Notes => "Notes",
        }
    }

    /// Human readable name, used in item descriptions
    pub fn label(&self) -> &'static str {
        match self {
            Self::UserName => "username",
            Self::Password => "password",
            Self::Url => "URL",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "username" | "user" => Ok(Self::UserName),
            "password" => Ok(Self::Password),
            "url" => Ok(Self::Url),
            "notes" => Ok(Self::Notes),
            _ => Err(format!(
                "unknown attribute '{}' (expected username, password, url or notes)",
                s
            )),
        }
    }
}

/// The attributes of one entry; any of them may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryDetails {
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
}

impl EntryDetails {
    pub fn get(&self, attr: Attribute) -> &str {
        match attr {
            Attribute::UserName => &self.username,
            Attribute::Password => &self.password,
            Attribute::Url => &self.url,
            Attribute::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, attr: Attribute, value: String) {
        match attr {
            Attribute::UserName => self.username = value,
            Attribute::Password => self.password = value,
            Attribute::Url => self.url = value,
            Attribute::Notes => self.notes = value,
        }
    }

    /// Non-empty attributes in display order
    pub fn present(&self) -> impl Iterator<Item = (Attribute, &str)> {
        Attribute::ALL
            .into_iter()
            .map(|attr| (attr, self.get(attr)))
            .filter(|(_, value)| !value.is_empty())
    }
}
