#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u16)]
pub enum SyntaxKind {
    TOMBSTONE,

    // Trivia
    WHITESPACE_TRIVIA,
    NEWLINE_TRIVIA,
    SINGLE_LINE_COMMENT_TRIVIA,
    MULTI_LINE_COMMENT_TRIVIA,
    SKIPPED_TEXT_TRIVIA,

    // Elements without a grammatical kind of their own
    LIST,
    SEPARATED_LIST,
    TRIVIA_LIST,

    // Tokens
    EOF,
    UNKNOWN,
    IDENTIFIER,
    NUMERIC_LITERAL,
    STRING_LITERAL,

    OPEN_BRACE,
    CLOSE_BRACE,
    OPEN_PAREN,
    CLOSE_PAREN,
    OPEN_BRACKET,
    CLOSE_BRACKET,
    DOT,
    SEMICOLON,
    COMMA,
    COLON,
    QUESTION,

    EQUALS,
    EQUALS_EQUALS,
    EQUALS_EQUALS_EQUALS,
    EXCLAMATION,
    EXCLAMATION_EQUALS,
    EXCLAMATION_EQUALS_EQUALS,
    LESS_THAN,
    LESS_THAN_EQUALS,
    GREATER_THAN,
    GREATER_THAN_EQUALS,
    PLUS,
    MINUS,
    ASTERISK,
    SLASH,
    PERCENT,
    AMPERSAND_AMPERSAND,
    BAR_BAR,

    CONST_KW,
    ELSE_KW,
    FALSE_KW,
    FUNCTION_KW,
    IF_KW,
    INTERFACE_KW,
    LET_KW,
    NULL_KW,
    RETURN_KW,
    TRUE_KW,
    VAR_KW,
    WHILE_KW,

    // Nodes
    SOURCE_UNIT,
    VARIABLE_STATEMENT,
    VARIABLE_DECLARATION,
    VARIABLE_DECLARATOR,
    EQUALS_VALUE_CLAUSE,
    FUNCTION_DECLARATION,
    PARAMETER_LIST,
    PARAMETER,
    BLOCK,
    EXPRESSION_STATEMENT,
    EMPTY_STATEMENT,
    IF_STATEMENT,
    ELSE_CLAUSE,
    WHILE_STATEMENT,
    RETURN_STATEMENT,

    NAME_EXPRESSION,
    LITERAL_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    PREFIX_UNARY_EXPRESSION,
    BINARY_EXPRESSION,
    ASSIGNMENT_EXPRESSION,
    INVOCATION_EXPRESSION,
    ARGUMENT_LIST,
    MEMBER_ACCESS_EXPRESSION,

    // TypeScript-only nodes
    TYPE_ANNOTATION,
    TYPE_REFERENCE,
    INTERFACE_DECLARATION,
    PROPERTY_SIGNATURE,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Returns `true` for kinds that only ever label trivia.
    pub const fn is_trivia(self) -> bool {
        self as u16 >= WHITESPACE_TRIVIA as u16 && self as u16 <= SKIPPED_TEXT_TRIVIA as u16
    }

    /// Returns `true` for kinds that label a token.
    pub const fn is_token(self) -> bool {
        self as u16 >= EOF as u16 && self as u16 <= WHILE_KW as u16
    }

    pub const fn is_keyword(self) -> bool {
        self as u16 >= CONST_KW as u16 && self as u16 <= WHILE_KW as u16
    }

    /// Returns `true` for kinds that label a composite node.
    pub const fn is_node(self) -> bool {
        self as u16 >= SOURCE_UNIT as u16
    }

    /// Constructs that have no JavaScript counterpart and must be handled by
    /// language-specific passes.
    pub const fn is_typescript_specific(self) -> bool {
        matches!(
            self,
            TYPE_ANNOTATION | TYPE_REFERENCE | INTERFACE_DECLARATION | PROPERTY_SIGNATURE
        )
    }

    /// Source text of punctuation, operators and keywords.
    pub const fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            OPEN_BRACE => "{",
            CLOSE_BRACE => "}",
            OPEN_PAREN => "(",
            CLOSE_PAREN => ")",
            OPEN_BRACKET => "[",
            CLOSE_BRACKET => "]",
            DOT => ".",
            SEMICOLON => ";",
            COMMA => ",",
            COLON => ":",
            QUESTION => "?",
            EQUALS => "=",
            EQUALS_EQUALS => "==",
            EQUALS_EQUALS_EQUALS => "===",
            EXCLAMATION => "!",
            EXCLAMATION_EQUALS => "!=",
            EXCLAMATION_EQUALS_EQUALS => "!==",
            LESS_THAN => "<",
            LESS_THAN_EQUALS => "<=",
            GREATER_THAN => ">",
            GREATER_THAN_EQUALS => ">=",
            PLUS => "+",
            MINUS => "-",
            ASTERISK => "*",
            SLASH => "/",
            PERCENT => "%",
            AMPERSAND_AMPERSAND => "&&",
            BAR_BAR => "||",
            CONST_KW => "const",
            ELSE_KW => "else",
            FALSE_KW => "false",
            FUNCTION_KW => "function",
            IF_KW => "if",
            INTERFACE_KW => "interface",
            LET_KW => "let",
            NULL_KW => "null",
            RETURN_KW => "return",
            TRUE_KW => "true",
            VAR_KW => "var",
            WHILE_KW => "while",
            _ => return None,
        };
        Some(text)
    }

    /// Maps an identifier-like word to its keyword kind.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "const" => CONST_KW,
            "else" => ELSE_KW,
            "false" => FALSE_KW,
            "function" => FUNCTION_KW,
            "if" => IF_KW,
            "interface" => INTERFACE_KW,
            "let" => LET_KW,
            "null" => NULL_KW,
            "return" => RETURN_KW,
            "true" => TRUE_KW,
            "var" => VAR_KW,
            "while" => WHILE_KW,
            _ => return None,
        };
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_disjoint() {
        for kind in [WHITESPACE_TRIVIA, IDENTIFIER, EOF, VAR_KW, SOURCE_UNIT, TYPE_ANNOTATION] {
            let categories = [kind.is_trivia(), kind.is_token(), kind.is_node()];
            assert_eq!(categories.iter().filter(|it| **it).count(), 1, "{kind:?}");
        }
        assert!(!LIST.is_node() && !LIST.is_token() && !LIST.is_trivia());
    }

    #[test]
    fn keywords() {
        assert_eq!(SyntaxKind::from_keyword("while"), Some(WHILE_KW));
        assert_eq!(SyntaxKind::from_keyword("While"), None);
        assert!(INTERFACE_KW.is_keyword());
        assert!(!IDENTIFIER.is_keyword());
        assert!(INTERFACE_DECLARATION.is_typescript_specific());
        assert!(!FUNCTION_DECLARATION.is_typescript_specific());
        assert_eq!(EXCLAMATION_EQUALS_EQUALS.fixed_text(), Some("!=="));
        assert_eq!(RETURN_KW.fixed_text(), Some("return"));
        assert_eq!(IDENTIFIER.fixed_text(), None);
    }
}
