use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Project and database a document reference points into.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatabaseId {
    project_id: String,
    database: String,
}

impl DatabaseId {
    pub fn new(project_id: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: database.into(),
        }
    }

    pub fn default(project_id: impl Into<String>) -> Self {
        Self::new(project_id, DEFAULT_DATABASE_ID)
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn is_default_database(&self) -> bool {
        self.database == DEFAULT_DATABASE_ID
    }
}

impl Ord for DatabaseId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.project_id
            .cmp(&other.project_id)
            .then_with(|| self.database.cmp(&other.database))
    }
}

impl PartialOrd for DatabaseId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for DatabaseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "projects/{}/databases/{}", self.project_id, self.database)
    }
}
