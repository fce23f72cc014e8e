//! Article processing: replaces every shortcode with its rendered output.

use ss_config::{Config, MessageKey, Messages, SiteDefaults};

use crate::render::render_form;
use crate::scanner::{ShortcodeMatch, scan};
use crate::{AttributeMap, ResolveError, ResolvedSettings, Viewer};

/// Context tag of the search indexer. Articles rendered for indexing are
/// left untouched.
pub const INDEXER_CONTEXT: &str = "com_finder.indexer";

/// Article handed over by the host application.
///
/// `text` is `None` when the article body is not plain text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Article {
    /// Article body.
    pub text: Option<String>,
}

impl Article {
    /// Article with a text body.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// What a single shortcode was replaced with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonOutcome {
    /// The booking form.
    Form,
    /// Nothing, because the viewer is a guest.
    Hidden,
    /// The setup-incomplete message, naming the first missing setting.
    SetupIncomplete {
        /// Missing setting.
        missing: &'static str,
    },
}

impl ButtonOutcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Hidden => "hidden",
            Self::SetupIncomplete { .. } => "setup_incomplete",
        }
    }
}

/// Result of processing one body of text.
#[derive(Debug, PartialEq, Eq)]
pub struct ProcessResult {
    /// Text with every shortcode replaced.
    pub text: String,
    /// One outcome per shortcode, in source order.
    pub outcomes: Vec<ButtonOutcome>,
}

/// Replaces `[supersaas]` shortcodes with booking forms.
///
/// Holds the read-only site defaults and messages; one instance can process
/// any number of articles, from any thread.
///
/// # Example
///
/// ```
/// use ss_config::{Messages, SiteDefaults};
/// use ss_shortcode::{ShortcodeProcessor, Viewer};
///
/// let defaults = SiteDefaults {
///     account_name: "demo".to_owned(),
///     password: "secret".to_owned(),
///     custom_domain: String::new(),
///     after: "/schedule/demo".to_owned(),
/// };
/// let processor = ShortcodeProcessor::new(defaults, Messages::default());
///
/// let viewer = Viewer::user(42, "jdoe", "Jane Doe", "jane@example.com");
/// let result = processor.process("Book here: [supersaas label=Go]", &viewer);
/// assert!(result.text.starts_with("Book here: <form"));
///
/// let result = processor.process("Book here: [supersaas label=Go]", &Viewer::guest());
/// assert_eq!(result.text, "Book here: ");
/// ```
#[derive(Debug, Clone)]
pub struct ShortcodeProcessor {
    defaults: SiteDefaults,
    messages: Messages,
}

impl ShortcodeProcessor {
    /// Create a processor from explicit defaults and messages.
    #[must_use]
    pub fn new(defaults: SiteDefaults, messages: Messages) -> Self {
        Self { defaults, messages }
    }

    /// Create a processor from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.site_defaults(), config.messages.clone())
    }

    /// Site defaults used for every shortcode.
    #[must_use]
    pub fn defaults(&self) -> &SiteDefaults {
        &self.defaults
    }

    /// Process an article in place.
    ///
    /// Does nothing for the search indexer context or a non-text body.
    pub fn process_article(&self, context: &str, article: &mut Article, viewer: &Viewer) {
        if context == INDEXER_CONTEXT {
            tracing::debug!(context, "Skipping shortcodes for indexer");
            return;
        }

        let Some(text) = article.text.as_deref() else {
            tracing::debug!(context, "Skipping article without text body");
            return;
        };

        let result = self.process(text, viewer);
        if !result.outcomes.is_empty() {
            article.text = Some(result.text);
        }
    }

    /// Replace every shortcode in `text`, left to right.
    #[must_use]
    pub fn process(&self, text: &str, viewer: &Viewer) -> ProcessResult {
        let mut output = String::with_capacity(text.len());
        let mut outcomes = Vec::new();
        let mut last_end = 0;

        for found in scan(text) {
            let (html, outcome) = self.render(&found, viewer);
            output.push_str(&text[last_end..found.range.start]);
            output.push_str(&html);
            last_end = found.range.end;
            outcomes.push(outcome);
        }
        output.push_str(&text[last_end..]);

        if !outcomes.is_empty() {
            tracing::debug!(matches = outcomes.len(), "Replaced shortcodes");
        }

        ProcessResult {
            text: output,
            outcomes,
        }
    }

    /// Render the replacement for a single shortcode.
    #[must_use]
    pub fn render(&self, found: &ShortcodeMatch<'_>, viewer: &Viewer) -> (String, ButtonOutcome) {
        if viewer.is_guest {
            return (String::new(), ButtonOutcome::Hidden);
        }

        let attrs = AttributeMap::parse(found.raw_attrs);
        let (html, outcome) = match ResolvedSettings::resolve(&self.defaults, &attrs, &self.messages)
        {
            Ok(settings) => (
                render_form(&settings, viewer, &self.messages),
                ButtonOutcome::Form,
            ),
            Err(ResolveError::MissingField(missing)) => {
                tracing::warn!(missing, "Booking button setup incomplete");
                (
                    self.messages.text(MessageKey::SetupIncomplete).to_owned(),
                    ButtonOutcome::SetupIncomplete { missing },
                )
            }
        };

        tracing::debug!(outcome = outcome.as_str(), "Rendered shortcode");
        (html, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn defaults() -> SiteDefaults {
        SiteDefaults {
            account_name: "demo".to_owned(),
            password: "secret".to_owned(),
            custom_domain: String::new(),
            after: "/schedule/demo".to_owned(),
        }
    }

    fn processor() -> ShortcodeProcessor {
        ShortcodeProcessor::new(defaults(), Messages::default())
    }

    fn user() -> Viewer {
        Viewer::user(42, "jdoe", "Jane Doe", "jane@example.com")
    }

    #[test]
    fn test_no_tokens_unchanged() {
        let text = "<p>No booking here [other] at all.</p>";
        let result = processor().process(text, &user());
        assert_eq!(result.text, text);
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_guest_gets_empty_string() {
        let result = processor().process("a[supersaas]b", &Viewer::guest());
        assert_eq!(result.text, "ab");
        assert_eq!(result.outcomes, vec![ButtonOutcome::Hidden]);
    }

    #[test]
    fn test_guest_skips_setup_check() {
        let processor = ShortcodeProcessor::new(SiteDefaults::default(), Messages::default());
        let result = processor.process("[supersaas]", &Viewer::guest());
        assert_eq!(result.text, "");
        assert_eq!(result.outcomes, vec![ButtonOutcome::Hidden]);
    }

    #[test]
    fn test_missing_password_shows_message() {
        let messages = Messages::default();
        let processor = ShortcodeProcessor::new(
            SiteDefaults {
                password: String::new(),
                ..defaults()
            },
            messages.clone(),
        );

        let result = processor.process("[supersaas label=Go]", &user());
        assert_eq!(result.text, messages.setup_incomplete);
        assert_eq!(
            result.outcomes,
            vec![ButtonOutcome::SetupIncomplete {
                missing: "password"
            }]
        );
    }

    #[test]
    fn test_form_replaces_token_in_place() {
        let result = processor().process("before [supersaas] after", &user());
        assert!(result.text.starts_with("before <form"));
        assert!(result.text.ends_with("</script> after"));
        assert_eq!(result.outcomes, vec![ButtonOutcome::Form]);
    }

    #[test]
    fn test_failed_match_does_not_stop_later_matches() {
        let processor = ShortcodeProcessor::new(
            SiteDefaults {
                after: String::new(),
                ..defaults()
            },
            Messages::default(),
        );

        let result = processor.process("[supersaas] | [supersaas after=/x]", &user());
        assert_eq!(
            result.outcomes,
            vec![
                ButtonOutcome::SetupIncomplete { missing: "after" },
                ButtonOutcome::Form
            ]
        );
        assert!(result.text.contains(r#"name="after" value="/x""#));
    }

    #[test]
    fn test_outcome_count_matches_scanner() {
        let text = "[supersaas] x [SUPERSAAS label=A] y [supersaas image='i.png']";
        let result = processor().process(text, &user());
        assert_eq!(result.outcomes.len(), crate::scanner::count(text));
    }

    #[test]
    fn test_setup_warning_names_field_only() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let processor = ShortcodeProcessor::new(
            SiteDefaults {
                password: String::new(),
                ..defaults()
            },
            Messages::default(),
        );

        tracing::subscriber::with_default(subscriber, || {
            processor.process(r#"[supersaas label="Private label" after=/members]"#, &user())
        });

        let output = logs.contents();
        assert!(output.contains("Booking button setup incomplete"), "{output}");
        assert!(output.contains("missing="), "{output}");
        assert!(output.contains("password"), "{output}");
        assert!(!output.contains("Private label"), "{output}");
        assert!(!output.contains("/members"), "{output}");
    }

    #[test]
    fn test_process_article_indexer_context() {
        let mut article = Article::new("[supersaas]");
        processor().process_article(INDEXER_CONTEXT, &mut article, &user());
        assert_eq!(article.text.as_deref(), Some("[supersaas]"));
    }

    #[test]
    fn test_process_article_without_text() {
        let mut article = Article::default();
        processor().process_article("com_content.article", &mut article, &user());
        assert_eq!(article.text, None);
    }

    #[test]
    fn test_process_article_replaces_text() {
        let mut article = Article::new("[supersaas]");
        processor().process_article("com_content.article", &mut article, &Viewer::guest());
        assert_eq!(article.text.as_deref(), Some(""));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            account_name: Some("demo".to_owned()),
            password: Some("secret".to_owned()),
            schedule: Some("/schedule/demo".to_owned()),
            custom_domain: Some("https://book.example.com/x".to_owned()),
            ..Default::default()
        };

        let processor = ShortcodeProcessor::from_config(&config);
        assert_eq!(processor.defaults().after, "/schedule/demo");
        assert_eq!(processor.defaults().custom_domain, "book.example.com");

        let result = processor.process("[supersaas]", &user());
        assert!(result.text.contains(r#"action="https://book.example.com""#));
    }

    /// In-memory log sink for a test subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
