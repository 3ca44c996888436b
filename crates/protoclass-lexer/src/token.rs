use protoclass_ast::Span;

/// Represents the different kinds of tokens in ECMAScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords - reserved
    Var,
    Const,
    Function,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    Switch,
    Case,
    Default,
    Class,
    Extends,
    Import,
    Export,
    New,
    This,
    Super,
    Typeof,
    Instanceof,
    In,
    Void,
    Delete,
    Null,
    True,
    False,
    Try,
    Catch,
    Finally,
    Throw,
    Debugger,
    With,

    // Keywords - contextual (also valid identifiers)
    Let,
    Static,
    Async,
    Await,
    Yield,
    Of,
    Get,
    Set,
    From,
    As,

    // Literals
    NumberLiteral,
    StringLiteral,
    TemplateLiteral,
    RegexLiteral,
    BigIntLiteral,

    // Identifier
    Identifier,
    PrivateName, // #name

    // Operators
    Plus,              // +
    Minus,             // -
    Star,              // *
    Slash,             // /
    Percent,           // %
    StarStar,          // **
    Eq,                // =
    EqEq,              // ==
    EqEqEq,            // ===
    BangEq,            // !=
    BangEqEq,          // !==
    Lt,                // <
    Gt,                // >
    LtEq,              // <=
    GtEq,              // >=
    AmpAmp,            // &&
    PipePipe,          // ||
    Bang,              // !
    Amp,               // &
    Pipe,              // |
    Caret,             // ^
    Tilde,             // ~
    LtLt,              // <<
    GtGt,              // >>
    GtGtGt,            // >>>
    PlusEq,            // +=
    MinusEq,           // -=
    StarEq,            // *=
    SlashEq,           // /=
    PercentEq,         // %=
    StarStarEq,        // **=
    AmpAmpEq,          // &&=
    PipePipeEq,        // ||=
    QuestionQuestionEq,// ??=
    LtLtEq,            // <<=
    GtGtEq,            // >>=
    GtGtGtEq,          // >>>=
    AmpEq,             // &=
    PipeEq,            // |=
    CaretEq,           // ^=
    QuestionQuestion,  // ??
    QuestionDot,       // ?.
    PlusPlus,          // ++
    MinusMinus,        // --
    FatArrow,          // =>
    DotDotDot,         // ...

    // Delimiters
    LParen,            // (
    RParen,            // )
    LBrace,            // {
    RBrace,            // }
    LBracket,          // [
    RBracket,          // ]
    Semicolon,         // ;
    Comma,             // ,
    Dot,               // .
    Colon,             // :
    Question,          // ?

    // Special
    Eof,
    Error,
}

impl TokenKind {
    /// Maps a word to its keyword kind, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "var" => TokenKind::Var,
            "const" => TokenKind::Const,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "class" => TokenKind::Class,
            "extends" => TokenKind::Extends,
            "import" => TokenKind::Import,
            "export" => TokenKind::Export,
            "new" => TokenKind::New,
            "this" => TokenKind::This,
            "super" => TokenKind::Super,
            "typeof" => TokenKind::Typeof,
            "instanceof" => TokenKind::Instanceof,
            "in" => TokenKind::In,
            "void" => TokenKind::Void,
            "delete" => TokenKind::Delete,
            "null" => TokenKind::Null,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "finally" => TokenKind::Finally,
            "throw" => TokenKind::Throw,
            "debugger" => TokenKind::Debugger,
            "with" => TokenKind::With,
            "let" => TokenKind::Let,
            "static" => TokenKind::Static,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            "yield" => TokenKind::Yield,
            "of" => TokenKind::Of,
            "get" => TokenKind::Get,
            "set" => TokenKind::Set,
            "from" => TokenKind::From,
            "as" => TokenKind::As,
            _ => return None,
        };
        Some(kind)
    }

    /// Keywords that are plain identifiers outside their special position.
    pub fn is_contextual(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Static
                | TokenKind::Async
                | TokenKind::Await
                | TokenKind::Yield
                | TokenKind::Of
                | TokenKind::Get
                | TokenKind::Set
                | TokenKind::From
                | TokenKind::As
        )
    }

    /// Anything that reads as an identifier binding or reference.
    pub fn is_identifier_like(&self) -> bool {
        *self == TokenKind::Identifier || self.is_contextual()
    }

    pub fn is_keyword(&self) -> bool {
        (*self as u8) <= (TokenKind::As as u8)
    }

    /// Valid after `.` and as an object/class key: identifiers and every keyword.
    pub fn is_property_name(&self) -> bool {
        *self == TokenKind::Identifier || self.is_keyword()
    }

    /// True when a `/` after this token starts division rather than a regex.
    pub fn ends_expression(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::PrivateName
                | TokenKind::NumberLiteral
                | TokenKind::StringLiteral
                | TokenKind::TemplateLiteral
                | TokenKind::RegexLiteral
                | TokenKind::BigIntLiteral
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        ) || self.is_contextual()
    }
}

/// Represents a token with its kind, span, and value.
///
/// `value` is the cooked string for string literals, the digits without
/// separators for numbers, the message for `Error` tokens, and the source
/// text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub value: String,
    /// A line terminator occurs between the previous token and this one
    pub newline_before: bool,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, span: Span, value: String) -> Self {
        Self {
            kind,
            span,
            value,
            newline_before: false,
        }
    }
}

/// Numeric value of a number token's `value` (decimal, `0x`, `0o`, `0b`).
pub fn parse_number(text: &str) -> Option<f64> {
    let radix = |prefix: &[&str]| prefix.iter().find_map(|p| text.strip_prefix(p));
    if let Some(digits) = radix(&["0x", "0X"]) {
        return u64::from_str_radix(digits, 16).ok().map(|n| n as f64);
    }
    if let Some(digits) = radix(&["0o", "0O"]) {
        return u64::from_str_radix(digits, 8).ok().map(|n| n as f64);
    }
    if let Some(digits) = radix(&["0b", "0B"]) {
        return u64::from_str_radix(digits, 2).ok().map(|n| n as f64);
    }
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("0.5"), Some(0.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("0x1A"), Some(26.0));
        assert_eq!(parse_number("0o17"), Some(15.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("0x"), None);
    }

    #[test]
    fn test_keyword_classes() {
        assert_eq!(TokenKind::keyword("delete"), Some(TokenKind::Delete));
        assert_eq!(TokenKind::keyword("undefined"), None);
        assert!(TokenKind::Of.is_identifier_like());
        assert!(!TokenKind::Return.is_identifier_like());
        assert!(TokenKind::Return.is_property_name());
        assert!(TokenKind::As.is_keyword());
        assert!(!TokenKind::NumberLiteral.is_keyword());
    }
}
