use pulldown_cmark::{Event, Options, Parser, html};

/// Renders a post body to HTML. Tables, strikethrough and task lists are
/// enabled; raw HTML and MDX component tags are dropped.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_extended_markdown() {
        let html = markdown_to_html("# Title\n\n~~old~~\n\n- [x] done\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("checkbox"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn raw_html_is_dropped() {
        let html = markdown_to_html("before\n\n<Chart data={points} />\n\nafter <b>bold</b>");
        assert!(!html.contains("<Chart"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("after"));
    }
}
