use fidelity_syntax::SyntaxKind::{self, *};

use super::{name, separated, skip_until};
use crate::parser::{CompletedMarker, Parser};
use crate::token_set::TokenSet;

const LITERAL_FIRST: TokenSet =
    TokenSet::new(&[NUMERIC_LITERAL, STRING_LITERAL, TRUE_KW, FALSE_KW, NULL_KW]);
const PREFIX_OPERATORS: TokenSet = TokenSet::new(&[EXCLAMATION, MINUS, PLUS]);

pub(crate) const EXPRESSION_FIRST: TokenSet = TokenSet::new(&[IDENTIFIER, OPEN_PAREN])
    .union(LITERAL_FIRST)
    .union(PREFIX_OPERATORS);

const ARGUMENT_LIST_END: TokenSet =
    TokenSet::new(&[CLOSE_PAREN, SEMICOLON, OPEN_BRACE, CLOSE_BRACE]);

/// Always completes a node. When nothing can start an expression, the node
/// is a name with a zero-width identifier.
pub(crate) fn expression(p: &mut Parser<'_>) -> CompletedMarker {
    assignment(p)
}

fn assignment(p: &mut Parser<'_>) -> CompletedMarker {
    let lhs = binary(p, 0);
    if !p.at(EQUALS) {
        return lhs;
    }

    let m = lhs.precede(p);
    p.advance();
    assignment(p);
    m.complete(p, ASSIGNMENT_EXPRESSION)
}

fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    let precedence = match kind {
        BAR_BAR => 1,
        AMPERSAND_AMPERSAND => 2,
        EQUALS_EQUALS | EXCLAMATION_EQUALS | EQUALS_EQUALS_EQUALS | EXCLAMATION_EQUALS_EQUALS => 3,
        LESS_THAN | LESS_THAN_EQUALS | GREATER_THAN | GREATER_THAN_EQUALS => 4,
        PLUS | MINUS => 5,
        ASTERISK | SLASH | PERCENT => 6,
        _ => return None,
    };
    Some(precedence)
}

fn binary(p: &mut Parser<'_>, min_precedence: u8) -> CompletedMarker {
    let mut lhs = unary(p);

    while let Some(precedence) = binary_precedence(p.peek_kind()) {
        if precedence <= min_precedence {
            break;
        }
        let m = lhs.precede(p);
        p.advance();
        binary(p, precedence);
        lhs = m.complete(p, BINARY_EXPRESSION);
    }

    lhs
}

fn unary(p: &mut Parser<'_>) -> CompletedMarker {
    match p.peek_kind() {
        EXCLAMATION | MINUS | PLUS => {
            let m = p.start();
            p.advance();
            unary(p);
            m.complete(p, PREFIX_UNARY_EXPRESSION)
        }
        _ => postfix(p),
    }
}

fn postfix(p: &mut Parser<'_>) -> CompletedMarker {
    let mut lhs = primary(p);

    loop {
        lhs = match p.peek_kind() {
            OPEN_PAREN => {
                let m = lhs.precede(p);
                argument_list(p);
                m.complete(p, INVOCATION_EXPRESSION)
            }
            DOT => {
                let m = lhs.precede(p);
                p.advance();
                name(p);
                m.complete(p, MEMBER_ACCESS_EXPRESSION)
            }
            _ => return lhs,
        };
    }
}

fn primary(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    match p.peek_kind() {
        IDENTIFIER => {
            p.advance();
            m.complete(p, NAME_EXPRESSION)
        }
        NUMERIC_LITERAL | STRING_LITERAL | TRUE_KW | FALSE_KW | NULL_KW => {
            p.advance();
            m.complete(p, LITERAL_EXPRESSION)
        }
        OPEN_PAREN => {
            p.advance();
            expression(p);
            p.expect(CLOSE_PAREN);
            m.complete(p, PARENTHESIZED_EXPRESSION)
        }
        _ => {
            p.error("expected an expression");
            p.missing(IDENTIFIER);
            m.complete(p, NAME_EXPRESSION)
        }
    }
}

fn argument_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    separated(p, COMMA, EXPRESSION_FIRST, false, |p| {
        expression(p);
    });
    skip_until(p, ARGUMENT_LIST_END, "expected an argument");
    p.expect(CLOSE_PAREN);
    m.complete(p, ARGUMENT_LIST);
}
