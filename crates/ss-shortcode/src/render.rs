//! HTML for the booking button.

use std::fmt::Write;

use ss_config::{MessageKey, Messages};

use crate::{ResolvedSettings, Viewer};

/// Usernames that SuperSaaS treats as reserved. Logging in with one of them
/// asks for confirmation first.
pub const RESERVED_WORDS: [&str; 7] = [
    "administrator",
    "supervise",
    "supervisor",
    "superuser",
    "user",
    "admin",
    "supersaas",
];

/// Escape a string for HTML text and double- or single-quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a string for a single-quoted JavaScript literal inside `<script>`.
fn escape_js(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '<' => result.push_str("\\x3C"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(c),
        }
    }
    result
}

/// Render the login form and its confirmation script for a logged-in viewer.
///
/// The form posts the viewer's identity and the account checksum to the
/// SuperSaaS user API, which logs the viewer in and redirects to `after`.
#[must_use]
pub fn render_form(settings: &ResolvedSettings, viewer: &Viewer, messages: &Messages) -> String {
    let endpoint = settings.api_endpoint(messages);
    let checksum = settings.checksum(&viewer.username);
    let mut out = String::with_capacity(1024);

    write!(out, r#"<form method="post" action="{}">"#, escape_html(&endpoint)).unwrap();
    hidden(&mut out, "account", &settings.account_name);
    hidden(&mut out, "id", &viewer.foreign_key());
    hidden(&mut out, "user[name]", &viewer.username);
    hidden(&mut out, "user[full_name]", &viewer.full_name);
    hidden(&mut out, "user[email]", &viewer.email);
    hidden(&mut out, "checksum", &checksum);
    hidden(&mut out, "after", &settings.after);

    if let Some(image) = &settings.image {
        write!(
            out,
            r#"<input type="image" src="{}" alt="{}" name="submit" onclick="return confirmBooking()" class="supersaas_login"/>"#,
            escape_html(image),
            escape_html(&settings.label)
        )
        .unwrap();
    } else {
        write!(
            out,
            r#"<input type="submit" value="{}" onclick="return confirmBooking()" class="supersaas_login"/>"#,
            escape_html(&settings.label)
        )
        .unwrap();
    }

    out.push_str("</form>");
    confirm_script(&viewer.username, messages.text(MessageKey::ReservedWord), &mut out);
    out
}

fn hidden(out: &mut String, name: &str, value: &str) {
    write!(
        out,
        r#"<input type="hidden" name="{name}" value="{}"/>"#,
        escape_html(value)
    )
    .unwrap();
}

/// Inline `confirmBooking()` guard. The username is compared case-sensitively,
/// in its HTML-escaped form, against [`RESERVED_WORDS`].
fn confirm_script(username: &str, prompt: &str, out: &mut String) {
    let words = RESERVED_WORDS
        .iter()
        .map(|word| format!("'{word}'"))
        .collect::<Vec<_>>()
        .join(",");

    write!(
        out,
        "<script type=\"text/javascript\">function confirmBooking() {{\
         var reservedWords = [{words}];\
         for (var i = 0; i < reservedWords.length; i++) {{\
         if (reservedWords[i] === '{}') {{return confirm('{}');}}}}\
         return true;}}</script>",
        escape_js(&escape_html(username)),
        escape_js(prompt)
    )
    .unwrap();
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn settings(label: String, image: Option<String>) -> ResolvedSettings {
        ResolvedSettings {
            account_name: "demo".to_owned(),
            password: "secret".to_owned(),
            custom_domain: String::new(),
            after: "/schedule/demo".to_owned(),
            label,
            image,
        }
    }

    fn markup_chars(html: &str) -> [usize; 3] {
        ['<', '>', '"'].map(|c| html.matches(c).count())
    }

    proptest! {
        #[test]
        fn untrusted_values_add_no_markup(
            username in ".*",
            full_name in ".*",
            email in ".*",
            label in ".*",
            image in prop::option::of(".+"),
        ) {
            let messages = Messages::default();
            let plain = render_form(
                &settings("x".to_owned(), image.as_ref().map(|_| "x".to_owned())),
                &Viewer::user(7, "x", "x", "x"),
                &messages,
            );
            let html = render_form(
                &settings(label, image),
                &Viewer::user(7, username, full_name, email),
                &messages,
            );

            prop_assert_eq!(markup_chars(&html), markup_chars(&plain));
            prop_assert_eq!(html.matches("</script>").count(), 1);
        }
    }
}
