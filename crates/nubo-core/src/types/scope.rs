//! Listing scope: the container a directory listing targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// The container a listing or lookup is scoped to.
///
/// Folder trees hang off a nullable parent column, so "the root" and
/// "inside folder X" are two shapes of the same filter. `FolderScope`
/// carries that distinction through query strings and repository calls
/// without resorting to `Option<Option<Uuid>>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FolderScope {
    /// Top level: rows whose parent column is NULL.
    Root,
    /// Inside a specific folder: rows whose parent column equals the id.
    In(Uuid),
}

impl FolderScope {
    /// Build a scope from a nullable parent id.
    pub fn from_parent(parent_id: Option<Uuid>) -> Self {
        match parent_id {
            Some(id) => Self::In(id),
            None => Self::Root,
        }
    }

    /// The nullable parent id this scope filters on.
    pub fn parent_id(&self) -> Option<Uuid> {
        match self {
            Self::Root => None,
            Self::In(id) => Some(*id),
        }
    }

    /// Whether this is the root scope.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for FolderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::In(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for FolderScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("root") {
            return Ok(Self::Root);
        }
        Uuid::parse_str(s)
            .map(Self::In)
            .map_err(|_| AppError::validation(format!("Invalid folder scope '{s}'")))
    }
}

impl From<FolderScope> for String {
    fn from(scope: FolderScope) -> Self {
        scope.to_string()
    }
}

impl TryFrom<String> for FolderScope {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_and_ids() {
        assert_eq!("root".parse::<FolderScope>().unwrap(), FolderScope::Root);
        assert_eq!("ROOT".parse::<FolderScope>().unwrap(), FolderScope::Root);

        let id = Uuid::new_v4();
        assert_eq!(
            id.to_string().parse::<FolderScope>().unwrap(),
            FolderScope::In(id)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-uuid".parse::<FolderScope>().is_err());
        assert!("".parse::<FolderScope>().is_err());
    }

    #[test]
    fn round_trips_through_display() {
        let id = Uuid::new_v4();
        for scope in [FolderScope::Root, FolderScope::In(id)] {
            assert_eq!(scope.to_string().parse::<FolderScope>().unwrap(), scope);
        }
    }

    #[test]
    fn maps_to_nullable_parent() {
        let id = Uuid::new_v4();
        assert_eq!(FolderScope::Root.parent_id(), None);
        assert_eq!(FolderScope::In(id).parent_id(), Some(id));
        assert_eq!(FolderScope::from_parent(None), FolderScope::Root);
        assert_eq!(FolderScope::from_parent(Some(id)), FolderScope::In(id));
    }
}
