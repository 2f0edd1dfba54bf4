//! Creator roles as seen by the name strategy.

use std::fmt;

/// Whether a creator is cited as a primary creator or in a subordinate
/// ("in X (ed.), Y") position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatorRole {
    /// Author, director, and anything not known to be a container role.
    Primary,
    /// Editor, translator, series editor, container author.
    Container,
}

/// Name variables that appear in a subordinate citation position.
const CONTAINER_VARIABLES: [&str; 5] = [
    "editor",
    "translator",
    "collection-editor",
    "series-editor",
    "container-author",
];

impl CreatorRole {
    /// Classify a name variable (`author`, `editor`, ...). Unrecognized
    /// strings are primary.
    pub fn from_variable(variable: &str) -> CreatorRole {
        let variable = variable.trim();
        if CONTAINER_VARIABLES
            .iter()
            .any(|v| v.eq_ignore_ascii_case(variable))
        {
            CreatorRole::Container
        } else {
            CreatorRole::Primary
        }
    }

    pub fn is_container(self) -> bool {
        self == CreatorRole::Container
    }
}

impl fmt::Display for CreatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatorRole::Primary => f.write_str("primary"),
            CreatorRole::Container => f.write_str("container"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_roles() {
        for variable in ["editor", "translator", "collection-editor", "Series-Editor"] {
            assert_eq!(CreatorRole::from_variable(variable), CreatorRole::Container);
        }
    }

    #[test]
    fn test_unknown_roles_are_primary() {
        for variable in ["author", "director", "composer", "", "editorial-whatever"] {
            assert_eq!(CreatorRole::from_variable(variable), CreatorRole::Primary);
        }
    }
}
