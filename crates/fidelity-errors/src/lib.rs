use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// A problem found in the source, anchored to a byte range.
///
/// Malformed input is never a hard error: the tree still covers every byte,
/// and diagnostics describe what the parser had to skip or synthesize.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::*;

    #[test]
    fn renders_with_origin_and_label() {
        let text = "let x = 1\nlet = 2;\n";
        let range = TextRange::at(TextSize::new(14), TextSize::new(1));
        let diagnostic = Diagnostic::error("expected an identifier", range);

        let rendered = diagnostic.render(&Renderer::plain(), "main.ts", text).to_string();
        assert!(rendered.starts_with("error: expected an identifier"), "{rendered}");
        assert!(rendered.contains("main.ts:2:5"), "{rendered}");
        assert!(rendered.contains("here"), "{rendered}");
    }
}
