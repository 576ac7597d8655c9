use pulldown_cmark::{Event, Options as CmarkOptions, Parser, Tag, TagEnd};

pub const MORE_MARKER: &str = "<!-- more -->";

fn cmark_options() -> CmarkOptions {
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);
    options.insert(CmarkOptions::ENABLE_TABLES);
    options
}

/// Auto excerpt for a post body, as plain text.
///
/// Everything before an explicit `<!-- more -->` marker wins; otherwise the
/// first paragraph is used. Returns `None` when that leaves no text.
pub fn excerpt_of(body: &str) -> Option<String> {
    let raw = match body.split_once(MORE_MARKER) {
        Some((before, _)) => plain_text(Parser::new_ext(before, cmark_options())),
        None => plain_text(first_paragraph(body)),
    };

    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

fn first_paragraph(body: &str) -> Vec<Event<'_>> {
    let mut paragraph = Vec::new();
    let mut inside = false;

    for event in Parser::new_ext(body, cmark_options()) {
        match event {
            Event::Start(Tag::Paragraph) if !inside => inside = true,
            Event::End(TagEnd::Paragraph) if inside => break,
            event if inside => paragraph.push(event),
            _ => {}
        }
    }

    paragraph
}

// text straight from the event stream, so entities are never escaped.
// raw html is dropped, block ends and line breaks become spaces
fn plain_text<'a>(events: impl IntoIterator<Item = Event<'a>>) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(..)
                | TagEnd::CodeBlock
                | TagEnd::Item
                | TagEnd::TableCell,
            ) => text.push(' '),
            _ => {}
        }
    }
    text
}
