//! The user viewing the rendered article.

/// Identity of the current viewer, supplied by the host application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    /// Numeric user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Whether the viewer is not logged in.
    pub is_guest: bool,
}

impl Viewer {
    /// An anonymous visitor.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            is_guest: true,
            ..Self::default()
        }
    }

    /// A logged-in user.
    #[must_use]
    pub fn user(
        id: i64,
        username: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            full_name: full_name.into(),
            email: email.into(),
            is_guest: false,
        }
    }

    /// Composite id sent to SuperSaaS: the numeric id followed by `fk`.
    #[must_use]
    pub fn foreign_key(&self) -> String {
        format!("{}fk", self.id)
    }
}
