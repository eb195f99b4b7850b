use drop_bomb::DropBomb;
use fidelity_errors::Diagnostic;
use fidelity_syntax::{
    SyntaxKind, SyntaxNode, SyntaxToken, TreeBuilder, Trivia, TriviaKind, TriviaList,
};
use fidelity_tokenizer::{Token, Tokenizer};
use text_size::{TextRange, TextSize};

use crate::ParseOptions;

pub(crate) struct Parser<'a> {
    text: &'a str,
    options: &'a ParseOptions,
    tokenizer: Tokenizer<'a>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    /// Trivia of skipped tokens, waiting for the next real token.
    skipped: TriviaList,
    /// End of the significant text of the last consumed or skipped token.
    last_end: TextSize,
    after_line_break: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            text,
            options,
            tokenizer: Tokenizer::new(text),
            events: Vec::new(),
            diagnostics: Vec::new(),
            skipped: TriviaList::empty(),
            last_end: TextSize::new(0),
            after_line_break: false,
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokenizer.peek().kind
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    /// `true` if a line break separates the peeked token from the previous one.
    pub(crate) fn at_line_break(&self) -> bool {
        self.after_line_break || self.tokenizer.peek().leading.has_newline()
    }

    pub(crate) fn automatic_semicolon_insertion(&self) -> bool {
        self.options.allow_automatic_semicolon_insertion
    }

    pub(crate) fn advance(&mut self) {
        let mut token = self.tokenizer.next_token();
        self.consumed(&token);
        if !self.skipped.is_empty() {
            token.leading = std::mem::take(&mut self.skipped).concat(&token.leading);
        }
        self.events.push(Event::Token(token));
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    /// Consumes `kind`, or reports it and stands in a zero-width token.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let message = match kind.fixed_text() {
            Some(text) => format!("expected `{text}`"),
            None if kind == SyntaxKind::IDENTIFIER => "expected an identifier".to_owned(),
            None => format!("expected {kind:?}"),
        };
        self.error_at(message, TextRange::empty(self.last_end));
        self.missing(kind);
        false
    }

    /// Adds a zero-width token without reporting anything.
    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Missing(kind));
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self.tokenizer.peek().kind_range;
        self.error_at(message, range);
    }

    fn error_at(&mut self, message: impl Into<String>, range: TextRange) {
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    /// Reports the peeked token and turns it into skipped text in front of the
    /// next real token.
    pub(crate) fn error_and_skip(&mut self, message: impl Into<String>) {
        self.error(message);
        if self.at(SyntaxKind::EOF) {
            return;
        }
        let token = self.tokenizer.next_token();
        self.consumed(&token);
        tracing::trace!(kind = ?token.kind, range = ?token.kind_range, "skipping token");

        let text = Trivia::new(TriviaKind::SkippedText, &self.text[token.kind_range]);
        self.skipped = self
            .skipped
            .concat(&token.leading)
            .concat(&TriviaList::new([text]))
            .concat(&token.trailing);
    }

    fn consumed(&mut self, token: &Token) {
        self.last_end = token.kind_range.end();
        self.after_line_break = token.trailing.has_newline();
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn start_list(&mut self) -> ListMarker {
        self.events.push(Event::StartList);
        ListMarker::new(Event::FinishList)
    }

    pub(crate) fn start_separated_list(&mut self) -> ListMarker {
        self.events.push(Event::StartSeparatedList);
        ListMarker::new(Event::FinishSeparatedList)
    }

    pub(crate) fn build_tree(mut self) -> (SyntaxNode, Vec<Diagnostic>) {
        let mut diagnostics = self.tokenizer.take_diagnostics();
        diagnostics.append(&mut self.diagnostics);
        diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());

        let Parser { text, mut events, .. } = self;
        let mut builder = TreeBuilder::new();
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => builder.finish_node(),
                Event::StartList => builder.start_list(),
                Event::FinishList => builder.finish_list(),
                Event::StartSeparatedList => builder.start_separated_list(),
                Event::FinishSeparatedList => builder.finish_separated_list(),
                Event::Token(Token { leading, kind, kind_range, trailing }) => {
                    builder.token(kind, &text[kind_range], leading, trailing);
                }
                Event::Missing(kind) => builder.push_token(SyntaxToken::missing(kind)),
            }
        }

        (builder.finish(), diagnostics)
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Finish,
    StartList,
    FinishList,
    StartSeparatedList,
    FinishSeparatedList,
    Token(Token),
    Missing(SyntaxKind),
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Self {
        Self { position: pos, bomb: DropBomb::new("Marker must be completed") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        Self { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}

pub(crate) struct ListMarker {
    finish: Option<Event>,
    bomb: DropBomb,
}

impl ListMarker {
    fn new(finish: Event) -> Self {
        Self { finish: Some(finish), bomb: DropBomb::new("ListMarker must be completed") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();
        p.events.extend(self.finish.take());
    }
}
