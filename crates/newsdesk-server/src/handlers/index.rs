use axum::{extract::State, response::Html};

use newsdesk_core::feed::Source;

use crate::state::AppState;

/// Landing page listing the sources, with a form querying `/api/news`
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.aggregator.registry().all()))
}

pub fn render_index(sources: &[Source]) -> String {
    let rows: String = sources
        .iter()
        .map(|source| {
            format!(
                "      <li><code>{}</code> <a href=\"{}\">{}</a></li>\n",
                escape_html(&source.key),
                escape_html(&source.url),
                escape_html(&source.name),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>newsdesk</title>
  </head>
  <body>
    <h1>newsdesk</h1>
    <h2>Sources</h2>
    <ul>
{rows}    </ul>
    <h2>Search</h2>
    <form action="/api/news" method="get">
      <label>Sources <input name="sources" placeholder="bbc,meduza"></label>
      <label>Keywords <input name="q"></label>
      <label>Limit <input name="limit" type="number" min="1" max="50" value="20"></label>
      <button type="submit">Get news</button>
    </form>
    <p>JSON endpoints: <a href="/api/news">/api/news</a>, <a href="/api/sources">/api/sources</a>, <a href="/api/cache">/api/cache</a>, <a href="/api/feed.json">/api/feed.json</a></p>
  </body>
</html>
"#
    )
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape_html(text: &str) -> String {
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
