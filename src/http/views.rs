//! HTML shells.
//!
//! Each shell is the same page: a heading, an optional subtitle and the
//! client script that fetches the matching `/content` route.

use axum::response::Html;

use crate::routing::{PathParams, ShellView, Subtitle};

pub fn render_shell(view: &ShellView, params: &PathParams) -> Html<String> {
    let subtitle = match &view.subtitle {
        Subtitle::None => None,
        Subtitle::Static(text) => Some(text.as_str()),
        Subtitle::Param(name) => params.get(name).map(String::as_str),
    };

    let subtitle_html = subtitle
        .map(|s| format!("    <h2>{}</h2>\n", escape_html(s)))
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n    <meta charset=\"utf-8\">\n    <title>Tournaments</title>\n</head>\n\
         <body>\n    <h1>Tournaments</h1>\n{subtitle_html}    <div id=\"content\"></div>\n    \
         <script src=\"{src}\"></script>\n</body>\n\
         </html>\n",
        src = escape_html(&view.src_loc),
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_without_subtitle() {
        let Html(page) = render_shell(&ShellView::new("/tournamentList.js"), &PathParams::new());
        assert!(page.contains(r#"<script src="/tournamentList.js"></script>"#));
        assert!(!page.contains("<h2>"));
    }

    #[test]
    fn test_param_subtitle_is_escaped() {
        let view = ShellView::new("/tournamentInfo.js")
            .with_subtitle(Subtitle::Param("tournament".into()));
        let mut params = PathParams::new();
        params.insert("tournament".into(), "<b>cup</b>".into());

        let Html(page) = render_shell(&view, &params);
        assert!(page.contains("<h2>&lt;b&gt;cup&lt;/b&gt;</h2>"));
    }

    #[test]
    fn test_static_subtitle() {
        let view = ShellView::new("/tournamentCreate.js")
            .with_subtitle(Subtitle::Static("Add a Tournament".into()));
        let Html(page) = render_shell(&view, &PathParams::new());
        assert!(page.contains("<h2>Add a Tournament</h2>"));
    }
}
