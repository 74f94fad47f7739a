//! HTML Presentation
//!
//! Server-rendered pages for the clipboard UI:
//!
//! - [`home_page`] - editor form that posts to `/api/create`
//! - [`about_page`] - static about page
//! - [`view_page`] - a stored note with share and raw links
//!
//! Anything user-controlled goes through [`escape_html`] before it is
//! embedded.

mod pages;

pub use pages::{about_page, home_page, view_page};

/// Escape text for embedding in HTML element content or quoted attributes
///
/// Replaces `&`, `<`, `>`, `"` and `'` with entities. `&` is handled first
/// so the entities produced for the others are never escaped again.
///
/// ```rust
/// use zanile_core::render::escape_html;
///
/// assert_eq!(
///     escape_html(r#"<script>&"'"#),
///     "&lt;script&gt;&amp;&quot;&#39;"
/// );
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
