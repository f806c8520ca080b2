use serde::{Deserialize, Serialize};

/// How the winning profile link was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Nearest anchor enclosing the timestamp
    EnclosingLink,
    /// The ancestor level element was itself the profile link
    SelfLink,
    /// First profile link in the ancestor level's subtree
    Subtree,
}

/// Diagnostic detail about which link satisfied the match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMatch {
    pub href: String,
    /// Ancestor steps from the timestamp (0 = the timestamp itself)
    pub level: usize,
    pub source: MatchSource,
}

/// Outcome of author resolution.
///
/// `username` is `None` when no profile link was reachable before the post
/// boundary or document root. That is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matched: Option<LinkMatch>,
}

impl Resolution {
    pub fn found(username: String, href: String, level: usize, source: MatchSource) -> Self {
        Self {
            username: Some(username),
            matched: Some(LinkMatch {
                href,
                level,
                source,
            }),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn is_found(&self) -> bool {
        self.username.is_some()
    }
}
