use fidelity_syntax::SyntaxKind::{self, *};
use crate::parser::Parser;
use crate::token_set::TokenSet;

mod expressions;
mod statements;
mod types;

pub(crate) fn source_unit(p: &mut Parser<'_>) {
    let m = p.start();

    let list = p.start_list();
    while !p.at(EOF) {
        statements::statement(p);
    }
    list.complete(p);

    p.expect(EOF);
    m.complete(p, SOURCE_UNIT);
}

/// Parses `element (separator element)* separator?` into a separated list.
///
/// `element` must complete exactly one node. It runs while the peeked token is
/// in `first_set`, and once unconditionally when `required` is set. A missing
/// separator between two elements on the same line is reported and stood in
/// by a zero-width token.
pub(crate) fn separated(
    p: &mut Parser<'_>,
    separator: SyntaxKind,
    first_set: TokenSet,
    required: bool,
    mut element: impl FnMut(&mut Parser<'_>),
) {
    let list = p.start_separated_list();

    if required || first_set.contains(p.peek_kind()) {
        loop {
            element(p);

            if p.eat(separator) {
                if !first_set.contains(p.peek_kind()) {
                    break;
                }
            } else if first_set.contains(p.peek_kind()) && !p.at_line_break() {
                p.expect(separator);
            } else {
                break;
            }
        }
    }

    list.complete(p);
}

/// Skips tokens up to the first one in `stop` or the end of the line.
pub(crate) fn skip_until(p: &mut Parser<'_>, stop: TokenSet, message: &str) {
    while !p.at(EOF) && !stop.contains(p.peek_kind()) && !p.at_line_break() {
        p.error_and_skip(message);
    }
}

pub(crate) fn name(p: &mut Parser<'_>) {
    p.expect(IDENTIFIER);
}

/// Ends a statement, applying automatic semicolon insertion.
///
/// A missing `;` is accepted silently before a line break, a `}` or the end
/// of the file when the options allow it.
pub(crate) fn semicolon(p: &mut Parser<'_>) {
    if p.eat(SEMICOLON) {
        return;
    }
    if p.automatic_semicolon_insertion() && (p.at_line_break() || p.at(CLOSE_BRACE) || p.at(EOF))
    {
        return;
    }
    p.expect(SEMICOLON);
}
