//! `[supersaas]` booking shortcode.
//!
//! Replaces `[supersaas ...]` tokens in article text with a login form that
//! sends the current user to a SuperSaaS schedule.
//!
//! # Pipeline
//!
//! 1. [`scan`] finds every token and isolates its raw attribute string.
//! 2. [`AttributeMap::parse`] extracts the `after`, `label` and `image` options.
//! 3. [`ResolvedSettings::resolve`] merges them over the site
//!    [`SiteDefaults`](ss_config::SiteDefaults) and checks the required fields.
//! 4. [`render_form`] emits the form and its confirmation script.
//!
//! [`ShortcodeProcessor`] runs the whole pipeline over an article. Nothing in
//! it fails: guests get an empty string, an incomplete setup gets a message
//! and malformed attributes are skipped.
//!
//! # Example
//!
//! ```
//! use ss_config::{Messages, SiteDefaults};
//! use ss_shortcode::{Article, ShortcodeProcessor, Viewer};
//!
//! let processor = ShortcodeProcessor::new(
//!     SiteDefaults {
//!         account_name: "demo".to_owned(),
//!         password: "secret".to_owned(),
//!         custom_domain: String::new(),
//!         after: "/schedule/demo".to_owned(),
//!     },
//!     Messages::default(),
//! );
//!
//! let mut article = Article::new(r#"<p>[supersaas label="Book a lesson"]</p>"#);
//! let viewer = Viewer::user(7, "jdoe", "Jane Doe", "jane@example.com");
//! processor.process_article("com_content.article", &mut article, &viewer);
//!
//! let html = article.text.unwrap();
//! assert!(html.contains(r#"value="Book a lesson""#));
//! assert!(html.contains(r#"action="https://www.supersaas.com/api/users""#));
//! ```

mod attrs;
mod processor;
mod render;
mod resolve;
mod scanner;
mod viewer;

pub use attrs::{AttributeMap, SHORTCODE_OPTIONS, is_allowed_option};
pub use processor::{Article, ButtonOutcome, INDEXER_CONTEXT, ProcessResult, ShortcodeProcessor};
pub use render::{RESERVED_WORDS, escape_html, render_form};
pub use resolve::{ResolveError, ResolvedSettings, api_endpoint, checksum};
pub use scanner::{ShortcodeMatch, count, scan};
pub use viewer::Viewer;
