use html2text::render::TrivialDecorator;

/// Line width handed to the renderer; lines are joined again afterwards
const RENDER_WIDTH: usize = 4096;

/// Turn an HTML fragment from a feed into plain text.
///
/// Tags are dropped without any decoration, entities decoded and runs of
/// whitespace collapsed to a single space.
pub fn clean_markup(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let text = html2text::from_read_with_decorator(html.as_bytes(), RENDER_WIDTH, TrivialDecorator::new())
        .unwrap_or_else(|_| html.to_string());

    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
