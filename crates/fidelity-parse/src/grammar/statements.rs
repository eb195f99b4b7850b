use fidelity_syntax::SyntaxKind::*;

use super::expressions::{EXPRESSION_FIRST, expression};
use super::types::type_annotation;
use super::{name, semicolon, separated, skip_until};
use crate::parser::Parser;
use crate::token_set::TokenSet;

const NAME_FIRST: TokenSet = TokenSet::new(&[IDENTIFIER]);
const PARAMETER_LIST_END: TokenSet =
    TokenSet::new(&[CLOSE_PAREN, OPEN_BRACE, CLOSE_BRACE, SEMICOLON, COLON]);

pub(crate) fn statement(p: &mut Parser<'_>) {
    match p.peek_kind() {
        VAR_KW | LET_KW | CONST_KW => variable_statement(p),
        FUNCTION_KW => function_declaration(p),
        INTERFACE_KW => interface_declaration(p),
        OPEN_BRACE => block(p),
        SEMICOLON => {
            let m = p.start();
            p.advance();
            m.complete(p, EMPTY_STATEMENT);
        }
        IF_KW => if_statement(p),
        WHILE_KW => while_statement(p),
        RETURN_KW => return_statement(p),
        kind if EXPRESSION_FIRST.contains(kind) => {
            let m = p.start();
            expression(p);
            semicolon(p);
            m.complete(p, EXPRESSION_STATEMENT);
        }
        _ => p.error_and_skip("expected a statement"),
    }
}

fn block(p: &mut Parser<'_>) {
    let m = p.start();
    if p.expect(OPEN_BRACE) {
        let list = p.start_list();
        while !p.at(CLOSE_BRACE) && !p.at(EOF) {
            statement(p);
        }
        list.complete(p);
        p.expect(CLOSE_BRACE);
    } else {
        p.start_list().complete(p);
        p.missing(CLOSE_BRACE);
    }
    m.complete(p, BLOCK);
}

fn variable_statement(p: &mut Parser<'_>) {
    let m = p.start();

    let declaration = p.start();
    p.advance();
    separated(p, COMMA, NAME_FIRST, true, variable_declarator);
    declaration.complete(p, VARIABLE_DECLARATION);

    semicolon(p);
    m.complete(p, VARIABLE_STATEMENT);
}

fn variable_declarator(p: &mut Parser<'_>) {
    let m = p.start();
    name(p);
    if p.at(COLON) {
        type_annotation(p);
    }
    if p.at(EQUALS) {
        let clause = p.start();
        p.advance();
        expression(p);
        clause.complete(p, EQUALS_VALUE_CLAUSE);
    }
    m.complete(p, VARIABLE_DECLARATOR);
}

fn function_declaration(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    name(p);

    let parameters = p.start();
    p.expect(OPEN_PAREN);
    separated(p, COMMA, NAME_FIRST, false, parameter);
    skip_until(p, PARAMETER_LIST_END, "expected a parameter");
    p.expect(CLOSE_PAREN);
    parameters.complete(p, PARAMETER_LIST);

    if p.at(COLON) {
        type_annotation(p);
    }
    block(p);
    m.complete(p, FUNCTION_DECLARATION);
}

fn parameter(p: &mut Parser<'_>) {
    let m = p.start();
    name(p);
    if p.at(COLON) {
        type_annotation(p);
    }
    m.complete(p, PARAMETER);
}

fn interface_declaration(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    name(p);
    p.expect(OPEN_BRACE);

    let members = p.start_list();
    while !p.at(CLOSE_BRACE) && !p.at(EOF) {
        if p.at(IDENTIFIER) {
            property_signature(p);
        } else {
            p.error_and_skip("expected a property signature");
        }
    }
    members.complete(p);

    p.expect(CLOSE_BRACE);
    m.complete(p, INTERFACE_DECLARATION);
}

fn property_signature(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.eat(QUESTION);
    type_annotation(p);
    if !p.eat(SEMICOLON) && !p.eat(COMMA) && !p.at(CLOSE_BRACE) && !p.at_line_break() {
        p.expect(SEMICOLON);
    }
    m.complete(p, PROPERTY_SIGNATURE);
}

fn if_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    condition(p);
    statement(p);

    if p.at(ELSE_KW) {
        let clause = p.start();
        p.advance();
        statement(p);
        clause.complete(p, ELSE_CLAUSE);
    }
    m.complete(p, IF_STATEMENT);
}

fn while_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    condition(p);
    statement(p);
    m.complete(p, WHILE_STATEMENT);
}

fn condition(p: &mut Parser<'_>) {
    p.expect(OPEN_PAREN);
    expression(p);
    p.expect(CLOSE_PAREN);
}

fn return_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    if EXPRESSION_FIRST.contains(p.peek_kind()) && !p.at_line_break() {
        expression(p);
    }
    semicolon(p);
    m.complete(p, RETURN_STATEMENT);
}
