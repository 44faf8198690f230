//! Per-process authentication state.

use domain::Username;

/// Authentication state of the current interactive session.
///
/// Created `Anonymous`; changed only by the gate's login and logout
/// transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Username),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// The bound identity, present only while authenticated
    pub fn identity(&self) -> Option<&Username> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Anonymous => None,
        }
    }
}
