use std::fmt;
use std::str::FromStr;

/// The documents the front end knows about.
/// Each one is persisted as `<name>.json` inside the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    Tasks,
    Emails,
    CompletedTasks,
    Projects,
    Meetings,
    Settings,
}

impl Document {
    /// Every known document, in the order they are loaded.
    pub const ALL: [Document; 6] = [
        Document::Tasks,
        Document::Emails,
        Document::CompletedTasks,
        Document::Projects,
        Document::Meetings,
        Document::Settings,
    ];

    /// Returns the wire name used as the JSON key and file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Document::Tasks => "tasks",
            Document::Emails => "emails",
            Document::CompletedTasks => "completedTasks",
            Document::Projects => "projects",
            Document::Meetings => "meetings",
            Document::Settings => "settings",
        }
    }

    /// Returns the file name this document is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Document {
    type Err = String;

    // Names are case sensitive, the front end sends them verbatim
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::ALL
            .iter()
            .copied()
            .find(|doc| doc.as_str() == s)
            .ok_or_else(|| format!("Unknown document: '{}'", s))
    }
}
