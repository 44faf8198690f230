//! Application pages and access decisions.

use serde::{Deserialize, Serialize};

/// Navigable application page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Login,
    Register,
    Home,
    Model,
    Metrics,
    About,
}

/// Pages reachable without an authenticated session
pub const PUBLIC_PAGES: &[Page] = &[Page::Login, Page::Register];

impl Page {
    /// All pages in menu order
    pub const ALL: [Page; 6] = [
        Page::Login,
        Page::Register,
        Page::Home,
        Page::Model,
        Page::Metrics,
        Page::About,
    ];

    /// Check if this page is reachable while anonymous
    pub fn is_public(&self) -> bool {
        PUBLIC_PAGES.contains(self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::Login => "Login",
            Page::Register => "Register",
            Page::Home => "Home",
            Page::Model => "Model",
            Page::Metrics => "Metrics",
            Page::About => "About",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a page name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown page: {0}")]
pub struct UnknownPage(pub String);

impl std::str::FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .iter()
            .copied()
            .find(|page| page.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }
}

impl From<bool> for Access {
    fn from(allowed: bool) -> Self {
        if allowed {
            Access::Allowed
        } else {
            Access::Denied
        }
    }
}
