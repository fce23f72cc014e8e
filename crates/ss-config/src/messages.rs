//! Localized strings shown by the booking button.

use serde::Deserialize;

/// Fixed message keys resolved through [`Messages::text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKey {
    /// Shown instead of the button when account settings are missing.
    SetupIncomplete,
    /// Default submit button label.
    BookNow,
    /// Confirmation prompt for usernames that look reserved.
    ReservedWord,
    /// Default SuperSaaS booking domain.
    Domain,
}

/// Localized message table.
///
/// Every field can be overridden from the `[messages]` section of
/// `supersaas.toml`; missing fields keep the English defaults.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    /// Setup-incomplete notice.
    pub setup_incomplete: String,
    /// Default button label.
    pub book_now: String,
    /// Reserved-word confirmation prompt.
    pub reserved_word: String,
    /// Default booking domain.
    pub domain: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            setup_incomplete: "The SuperSaaS settings are incomplete. Please set the account name, \
                               password and schedule in the plugin configuration."
                .to_owned(),
            book_now: "Book now".to_owned(),
            reserved_word: "Your username is a reserved word in SuperSaaS. \
                            You may not be able to log in. Continue anyway?"
                .to_owned(),
            domain: "www.supersaas.com".to_owned(),
        }
    }
}

impl Messages {
    /// Resolve a message key to its display string.
    #[must_use]
    pub fn text(&self, key: MessageKey) -> &str {
        match key {
            MessageKey::SetupIncomplete => &self.setup_incomplete,
            MessageKey::BookNow => &self.book_now,
            MessageKey::ReservedWord => &self.reserved_word,
            MessageKey::Domain => &self.domain,
        }
    }
}
