use protoclass_ast::{Comment, CommentKind, Span};
use crate::token::{Token, TokenKind};

/// The lexer/tokenizer for ECMAScript source.
///
/// Comments are not tokens; they are collected in source order and handed
/// out by [`Lexer::take_comments`].
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current_pos: usize,
    current_char: Option<char>,
    file_id: usize,
    comments: Vec<Comment>,
    /// Kind of the last token produced, for regex/division disambiguation
    last_kind: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer from source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_file_id(source, 0)
    }

    /// Creates a new lexer with a specific file ID.
    pub fn with_file_id(source: &'a str, file_id: usize) -> Self {
        let mut chars = source.char_indices();
        let current_char = chars.next().map(|(_, c)| c);
        Self {
            source,
            chars,
            current_pos: 0,
            current_char,
            file_id,
            comments: Vec::new(),
            last_kind: None,
        }
    }

    /// Tokenizes the entire source code and returns all tokens.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Comments seen so far, in source order.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// Gets the next token from the source.
    pub fn next_token(&mut self) -> Token {
        let newline_before = match self.skip_whitespace_and_comments() {
            Ok(newline) => newline,
            Err(error_token) => return error_token,
        };
        let mut token = self.scan_token();
        token.newline_before = newline_before;
        self.last_kind = Some(token.kind);
        token
    }

    fn scan_token(&mut self) -> Token {
        let start = self.current_pos;

        let Some(ch) = self.current_char else {
            return self.make(TokenKind::Eof, start, String::new());
        };

        match ch {
            // String literals
            '"' | '\'' => self.read_string_literal(ch),
            '`' => self.read_template_literal(),

            // Numbers
            '0'..='9' => self.read_number(),

            // Identifiers and keywords
            'a'..='z' | 'A'..='Z' | '_' | '$' => self.read_identifier_or_keyword(),
            '#' => self.read_private_name(),

            // Operators and delimiters
            '+' => self.read_plus(),
            '-' => self.read_minus(),
            '*' => self.read_star(),
            '/' => self.read_slash_or_regex(),
            '%' => self.read_with_eq(TokenKind::Percent, TokenKind::PercentEq),
            '^' => self.read_with_eq(TokenKind::Caret, TokenKind::CaretEq),
            '=' => self.read_eq(),
            '!' => self.read_bang(),
            '<' => self.read_lt(),
            '>' => self.read_gt(),
            '&' => self.read_amp(),
            '|' => self.read_pipe(),
            '?' => self.read_question(),
            '.' => self.read_dot(),
            '~' => self.single(TokenKind::Tilde),

            // Delimiters
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),

            // Unicode identifiers
            _ if ch.is_alphabetic() => self.read_identifier_or_keyword(),

            // Error
            _ => {
                self.advance();
                self.make(TokenKind::Error, start, format!("Unexpected character: {}", ch))
            }
        }
    }

    // Helper methods

    fn advance(&mut self) {
        if let Some((pos, ch)) = self.chars.next() {
            self.current_pos = pos;
            self.current_char = Some(ch);
        } else {
            self.current_pos = self.source.len();
            self.current_char = None;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next().map(|(_, c)| c)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.current_pos, self.file_id)
    }

    fn make(&self, kind: TokenKind, start: usize, value: String) -> Token {
        Token::new(kind, self.span_from(start), value)
    }

    /// Token whose value is its own source text.
    fn punct(&self, kind: TokenKind, start: usize) -> Token {
        let text = self.source[start..self.current_pos].to_string();
        self.make(kind, start, text)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.current_pos;
        self.advance();
        self.punct(kind, start)
    }

    fn read_with_eq(&mut self, plain: TokenKind, with_eq: TokenKind) -> Token {
        let start = self.current_pos;
        self.advance();
        if self.current_char == Some('=') {
            self.advance();
            self.punct(with_eq, start)
        } else {
            self.punct(plain, start)
        }
    }

    /// Skips trivia, recording comments. Returns whether a line break was seen.
    fn skip_whitespace_and_comments(&mut self) -> Result<bool, Token> {
        let mut newline = false;

        // Hashbang line
        if self.current_pos == 0 && self.current_char == Some('#') && self.peek() == Some('!') {
            self.skip_single_line_comment();
        }

        loop {
            match self.current_char {
                Some(ch) if is_line_terminator(ch) => {
                    newline = true;
                    self.advance();
                }
                Some(ch) if ch.is_whitespace() || ch == '\u{feff}' => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek() == Some('/') {
                        self.skip_single_line_comment();
                    } else if self.peek() == Some('*') {
                        let start = self.current_pos;
                        match self.skip_multi_line_comment() {
                            Some(has_newline) => newline |= has_newline,
                            None => {
                                return Err(self.make(
                                    TokenKind::Error,
                                    start,
                                    "Unterminated multi-line comment".to_string(),
                                ));
                            }
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(newline)
    }

    /// Stops before the line terminator so it counts as a newline.
    fn skip_single_line_comment(&mut self) {
        let start = self.current_pos;
        self.advance();
        self.advance();

        while let Some(ch) = self.current_char {
            if is_line_terminator(ch) {
                break;
            }
            self.advance();
        }
        self.comments.push(Comment {
            kind: CommentKind::Line,
            span: self.span_from(start),
        });
    }

    /// Returns `Some(contains_newline)`, or `None` when unterminated.
    fn skip_multi_line_comment(&mut self) -> Option<bool> {
        let start = self.current_pos;
        self.advance(); // /
        self.advance(); // *

        let mut newline = false;
        while let Some(ch) = self.current_char {
            if ch == '*' && self.peek() == Some('/') {
                self.advance(); // *
                self.advance(); // /
                self.comments.push(Comment {
                    kind: CommentKind::Block,
                    span: self.span_from(start),
                });
                return Some(newline);
            }
            newline |= is_line_terminator(ch);
            self.advance();
        }
        None
    }

    fn read_string_literal(&mut self, quote: char) -> Token {
        let start = self.current_pos;
        self.advance(); // Skip opening quote

        let mut value = String::new();

        while let Some(ch) = self.current_char {
            if ch == quote {
                self.advance(); // Skip closing quote
                return self.make(TokenKind::StringLiteral, start, value);
            } else if ch == '\\' {
                self.advance();
                if let Some(escaped) = self.current_char {
                    match escaped {
                        'u' => {
                            self.advance();
                            value.push(self.read_unicode_escape());
                        }
                        'x' => {
                            self.advance();
                            value.push(self.read_hex_escape());
                        }
                        '\r' => {
                            // Line continuation
                            self.advance();
                            if self.current_char == Some('\n') {
                                self.advance();
                            }
                        }
                        '\n' | '\u{2028}' | '\u{2029}' => self.advance(),
                        _ => {
                            let unescaped = match escaped {
                                'n' => '\n',
                                'r' => '\r',
                                't' => '\t',
                                'b' => '\u{8}',
                                'f' => '\u{c}',
                                'v' => '\u{b}',
                                '0' => '\0',
                                _ => escaped,
                            };
                            value.push(unescaped);
                            self.advance();
                        }
                    }
                }
            } else if ch == '\n' || ch == '\r' {
                return self.make(
                    TokenKind::Error,
                    start,
                    "Unterminated string literal".to_string(),
                );
            } else {
                value.push(ch);
                self.advance();
            }
        }

        self.make(
            TokenKind::Error,
            start,
            "Unterminated string literal".to_string(),
        )
    }

    /// `\uXXXX` or `\u{X...}`; the `u` is already consumed.
    fn read_unicode_escape(&mut self) -> char {
        let braced = self.current_char == Some('{');
        if braced {
            self.advance();
        }
        let mut code = 0u32;
        let mut count = 0;
        while let Some(digit) = self.current_char.and_then(|ch| ch.to_digit(16)) {
            if !braced && count == 4 {
                break;
            }
            code = code.saturating_mul(16).saturating_add(digit);
            count += 1;
            self.advance();
        }
        if braced && self.current_char == Some('}') {
            self.advance();
        }
        char::from_u32(code).unwrap_or('\u{FFFD}')
    }

    fn read_hex_escape(&mut self) -> char {
        let mut code = 0u32;
        for _ in 0..2 {
            if let Some(digit) = self.current_char.and_then(|ch| ch.to_digit(16)) {
                code = code * 16 + digit;
                self.advance();
            } else {
                break;
            }
        }
        char::from_u32(code).unwrap_or('\u{FFFD}')
    }

    /// The whole literal, substitutions included, is one token whose value
    /// is the raw source text.
    fn read_template_literal(&mut self) -> Token {
        let start = self.current_pos;
        if self.skip_template() {
            self.punct(TokenKind::TemplateLiteral, start)
        } else {
            self.make(
                TokenKind::Error,
                start,
                "Unterminated template literal".to_string(),
            )
        }
    }

    /// Consumes a template starting at its opening backtick.
    fn skip_template(&mut self) -> bool {
        self.advance(); // `
        while let Some(ch) = self.current_char {
            match ch {
                '`' => {
                    self.advance();
                    return true;
                }
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '$' if self.peek() == Some('{') => {
                    self.advance(); // $
                    self.advance(); // {
                    if !self.skip_substitution() {
                        return false;
                    }
                }
                _ => self.advance(),
            }
        }
        false
    }

    /// Consumes `...}` of a `${...}` substitution.
    fn skip_substitution(&mut self) -> bool {
        let mut depth = 0usize;
        while let Some(ch) = self.current_char {
            match ch {
                '{' => {
                    depth += 1;
                    self.advance();
                }
                '}' if depth == 0 => {
                    self.advance();
                    return true;
                }
                '}' => {
                    depth -= 1;
                    self.advance();
                }
                '`' => {
                    if !self.skip_template() {
                        return false;
                    }
                }
                '"' | '\'' => {
                    if self.read_string_literal(ch).kind == TokenKind::Error {
                        return false;
                    }
                }
                _ => self.advance(),
            }
        }
        false
    }

    fn read_digits(&mut self, value: &mut String, is_digit: fn(char) -> bool) {
        while let Some(ch) = self.current_char {
            if is_digit(ch) || ch == '_' {
                if ch != '_' {
                    value.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.current_pos;

        // Check for special number formats
        if self.current_char == Some('0') {
            match self.peek() {
                Some('x') | Some('X') => return self.read_radix_number(start, "0x", |c| c.is_ascii_hexdigit()),
                Some('o') | Some('O') => return self.read_radix_number(start, "0o", |c| ('0'..='7').contains(&c)),
                Some('b') | Some('B') => return self.read_radix_number(start, "0b", |c| c == '0' || c == '1'),
                _ => {}
            }
        }

        let mut value = String::new();
        self.read_digits(&mut value, |c| c.is_ascii_digit());

        // Check for decimal point
        if self.current_char == Some('.') && self.peek().map_or(false, |c| c.is_ascii_digit()) {
            value.push('.');
            self.advance();
            self.read_digits(&mut value, |c| c.is_ascii_digit());
        }

        self.read_exponent(&mut value);

        // Check for BigInt suffix
        if self.current_char == Some('n') {
            self.advance();
            return self.make(TokenKind::BigIntLiteral, start, value);
        }

        self.make(TokenKind::NumberLiteral, start, value)
    }

    fn read_exponent(&mut self, value: &mut String) {
        if matches!(self.current_char, Some('e') | Some('E')) {
            value.push('e');
            self.advance();

            if let Some(sign @ ('+' | '-')) = self.current_char {
                value.push(sign);
                self.advance();
            }

            self.read_digits(value, |c| c.is_ascii_digit());
        }
    }

    fn read_radix_number(&mut self, start: usize, prefix: &str, is_digit: fn(char) -> bool) -> Token {
        let mut value = String::from(prefix);
        self.advance(); // 0
        self.advance(); // x, o or b

        self.read_digits(&mut value, is_digit);

        if self.current_char == Some('n') {
            self.advance();
            return self.make(TokenKind::BigIntLiteral, start, value);
        }
        self.make(TokenKind::NumberLiteral, start, value)
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.current_pos;
        let mut value = String::new();

        while let Some(ch) = self.current_char {
            if is_identifier_part(ch) {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = TokenKind::keyword(&value).unwrap_or(TokenKind::Identifier);
        self.make(kind, start, value)
    }

    fn read_private_name(&mut self) -> Token {
        let start = self.current_pos;
        self.advance(); // #
        while let Some(ch) = self.current_char {
            if is_identifier_part(ch) {
                self.advance();
            } else {
                break;
            }
        }
        if self.current_pos - start == 1 {
            return self.make(TokenKind::Error, start, "Unexpected character: #".to_string());
        }
        self.punct(TokenKind::PrivateName, start)
    }

    fn read_plus(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('+') => {
                self.advance();
                self.punct(TokenKind::PlusPlus, start)
            }
            Some('=') => {
                self.advance();
                self.punct(TokenKind::PlusEq, start)
            }
            _ => self.punct(TokenKind::Plus, start),
        }
    }

    fn read_minus(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('-') => {
                self.advance();
                self.punct(TokenKind::MinusMinus, start)
            }
            Some('=') => {
                self.advance();
                self.punct(TokenKind::MinusEq, start)
            }
            _ => self.punct(TokenKind::Minus, start),
        }
    }

    fn read_star(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('*') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.punct(TokenKind::StarStarEq, start)
                } else {
                    self.punct(TokenKind::StarStar, start)
                }
            }
            Some('=') => {
                self.advance();
                self.punct(TokenKind::StarEq, start)
            }
            _ => self.punct(TokenKind::Star, start),
        }
    }

    fn regex_allowed(&self) -> bool {
        match self.last_kind {
            None => true,
            Some(kind) => !kind.ends_expression(),
        }
    }

    fn read_slash_or_regex(&mut self) -> Token {
        if self.regex_allowed() {
            return self.read_regex();
        }

        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('=') => {
                self.advance();
                self.punct(TokenKind::SlashEq, start)
            }
            _ => self.punct(TokenKind::Slash, start),
        }
    }

    /// `/pattern/flags`; the value is the raw text.
    fn read_regex(&mut self) -> Token {
        let start = self.current_pos;
        self.advance(); // /

        let mut in_class = false;
        loop {
            match self.current_char {
                None => {
                    return self.make(TokenKind::Error, start, "Unterminated regular expression".to_string());
                }
                Some(ch) if is_line_terminator(ch) => {
                    return self.make(TokenKind::Error, start, "Unterminated regular expression".to_string());
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }

        // Flags
        while let Some(ch) = self.current_char {
            if is_identifier_part(ch) {
                self.advance();
            } else {
                break;
            }
        }

        self.punct(TokenKind::RegexLiteral, start)
    }

    fn read_eq(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('=') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.punct(TokenKind::EqEqEq, start)
                } else {
                    self.punct(TokenKind::EqEq, start)
                }
            }
            Some('>') => {
                self.advance();
                self.punct(TokenKind::FatArrow, start)
            }
            _ => self.punct(TokenKind::Eq, start),
        }
    }

    fn read_bang(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('=') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.punct(TokenKind::BangEqEq, start)
                } else {
                    self.punct(TokenKind::BangEq, start)
                }
            }
            _ => self.punct(TokenKind::Bang, start),
        }
    }

    fn read_lt(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('<') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.punct(TokenKind::LtLtEq, start)
                } else {
                    self.punct(TokenKind::LtLt, start)
                }
            }
            Some('=') => {
                self.advance();
                self.punct(TokenKind::LtEq, start)
            }
            _ => self.punct(TokenKind::Lt, start),
        }
    }

    fn read_gt(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('>') => {
                self.advance();
                match self.current_char {
                    Some('>') => {
                        self.advance();
                        if self.current_char == Some('=') {
                            self.advance();
                            self.punct(TokenKind::GtGtGtEq, start)
                        } else {
                            self.punct(TokenKind::GtGtGt, start)
                        }
                    }
                    Some('=') => {
                        self.advance();
                        self.punct(TokenKind::GtGtEq, start)
                    }
                    _ => self.punct(TokenKind::GtGt, start),
                }
            }
            Some('=') => {
                self.advance();
                self.punct(TokenKind::GtEq, start)
            }
            _ => self.punct(TokenKind::Gt, start),
        }
    }

    fn read_amp(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('&') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.punct(TokenKind::AmpAmpEq, start)
                } else {
                    self.punct(TokenKind::AmpAmp, start)
                }
            }
            Some('=') => {
                self.advance();
                self.punct(TokenKind::AmpEq, start)
            }
            _ => self.punct(TokenKind::Amp, start),
        }
    }

    fn read_pipe(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('|') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.punct(TokenKind::PipePipeEq, start)
                } else {
                    self.punct(TokenKind::PipePipe, start)
                }
            }
            Some('=') => {
                self.advance();
                self.punct(TokenKind::PipeEq, start)
            }
            _ => self.punct(TokenKind::Pipe, start),
        }
    }

    fn read_question(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        match self.current_char {
            Some('?') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.punct(TokenKind::QuestionQuestionEq, start)
                } else {
                    self.punct(TokenKind::QuestionQuestion, start)
                }
            }
            // `a?.5:b` is a ternary, not optional chaining
            Some('.') if !self.peek().map_or(false, |c| c.is_ascii_digit()) => {
                self.advance();
                self.punct(TokenKind::QuestionDot, start)
            }
            _ => self.punct(TokenKind::Question, start),
        }
    }

    fn read_dot(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();

        if self.current_char == Some('.') && self.peek() == Some('.') {
            self.advance();
            self.advance();
            self.punct(TokenKind::DotDotDot, start)
        } else if self.current_char.map_or(false, |c| c.is_ascii_digit()) {
            // Number starting with dot (e.g., .5)
            let mut value = String::from("0.");
            self.read_digits(&mut value, |c| c.is_ascii_digit());
            self.read_exponent(&mut value);
            self.make(TokenKind::NumberLiteral, start, value)
        } else {
            self.punct(TokenKind::Dot, start)
        }
    }
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '\u{200c}' || ch == '\u{200d}'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords() {
        let source = "var const function return if else delete typeof";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[1].kind, TokenKind::Const);
        assert_eq!(tokens[2].kind, TokenKind::Function);
        assert_eq!(tokens[3].kind, TokenKind::Return);
        assert_eq!(tokens[4].kind, TokenKind::If);
        assert_eq!(tokens[5].kind, TokenKind::Else);
        assert_eq!(tokens[6].kind, TokenKind::Delete);
        assert_eq!(tokens[7].kind, TokenKind::Typeof);
    }

    #[test]
    fn test_numbers() {
        let source = "123 45.67 0x1A 0o77 0b1010 1_000_000 .5e2";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].kind, TokenKind::NumberLiteral);
        assert_eq!(tokens[0].value, "123");
        assert_eq!(tokens[1].value, "45.67");
        assert_eq!(tokens[2].value, "0x1A");
        assert_eq!(tokens[3].value, "0o77");
        assert_eq!(tokens[4].value, "0b1010");
        assert_eq!(tokens[5].value, "1000000");
        assert_eq!(tokens[6].value, "0.5e2");
        assert!(tokens[..7].iter().all(|t| t.kind == TokenKind::NumberLiteral));
    }

    #[test]
    fn test_strings() {
        let source = r#""hello" 'it\'s' "a\nb" "A\u{1F600}""#;
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].value, "hello");
        assert_eq!(tokens[1].value, "it's");
        assert_eq!(tokens[2].value, "a\nb");
        assert_eq!(tokens[3].value, "A\u{1F600}");
    }

    #[test]
    fn test_template_with_substitutions() {
        let source = "`a ${b + `c ${d}`} {e}` x";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].kind, TokenKind::TemplateLiteral);
        assert_eq!(tokens[0].value, "`a ${b + `c ${d}`} {e}`");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].value, "x");
    }

    #[test]
    fn test_operators() {
        let source = "+ - * % ** += -= === !== <= >= && || ?? ?. >>>= ??=";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Percent,
                TokenKind::StarStar,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::EqEqEq,
                TokenKind::BangEqEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::QuestionQuestion,
                TokenKind::QuestionDot,
                TokenKind::GtGtGtEq,
                TokenKind::QuestionQuestionEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_regex_versus_division() {
        let tokens = Lexer::new("a = /[/]x/g.test(b) / 2").tokenize();
        assert_eq!(tokens[2].kind, TokenKind::RegexLiteral);
        assert_eq!(tokens[2].value, "/[/]x/g");
        assert_eq!(tokens[8].kind, TokenKind::Slash);

        let tokens = Lexer::new("return /ab+c/i;").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::RegexLiteral);

        let tokens = Lexer::new("x /= 2").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::SlashEq);
    }

    #[test]
    fn test_comments_are_collected() {
        let source = "// head\nlet x = 5; /* tail */\n/** doc\n */ y";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();
        let comments = lexer.take_comments();

        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert_eq!(tokens[5].kind, TokenKind::Identifier);
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].kind, CommentKind::Line);
        assert_eq!(comments[0].text(source), "// head");
        assert_eq!(comments[1].text(source), "/* tail */");
        assert_eq!(comments[2].kind, CommentKind::Block);
        assert_eq!(comments[2].text(source), "/** doc\n */");
    }

    #[test]
    fn test_newline_before() {
        let tokens = Lexer::new("a\nb /* x\n */ c d").tokenize();
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before);
        assert!(tokens[2].newline_before);
        assert!(!tokens[3].newline_before);
    }

    #[test]
    fn test_identifiers() {
        let source = "foo bar_123 _private $jquery undefined of ünïcode";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].value, "foo");
        assert_eq!(tokens[1].value, "bar_123");
        assert_eq!(tokens[2].value, "_private");
        assert_eq!(tokens[3].value, "$jquery");
        assert_eq!(tokens[4].kind, TokenKind::Identifier);
        assert_eq!(tokens[5].kind, TokenKind::Of);
        assert_eq!(tokens[6].kind, TokenKind::Identifier);
        assert_eq!(tokens[6].value, "ünïcode");
    }

    #[test]
    fn test_prototype_assignment() {
        let source = "Foo.prototype.bar = function (x) { return x * 2; };";
        let tokens = Lexer::new(source).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].value, "Foo");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].value, "prototype");
        assert_eq!(tokens[4].value, "bar");
        assert_eq!(tokens[5].kind, TokenKind::Eq);
        assert_eq!(tokens[6].kind, TokenKind::Function);
        assert_eq!(tokens[7].kind, TokenKind::LParen);
        assert_eq!(tokens[7].span, Span::new(29, 30, 0));
    }

    #[test]
    fn test_bigint_and_errors() {
        let tokens = Lexer::new("42n 0x1Fn").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::BigIntLiteral);
        assert_eq!(tokens[0].value, "42");
        assert_eq!(tokens[1].kind, TokenKind::BigIntLiteral);

        let tokens = Lexer::new("'open\n").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].value, "Unterminated string literal");

        let tokens = Lexer::new("a @ b").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[2].value, "b");
    }

    #[test]
    fn test_hashbang() {
        let mut lexer = Lexer::new("#!/usr/bin/env node\nx");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].value, "x");
        assert!(tokens[0].newline_before);
        assert_eq!(lexer.take_comments().len(), 1);
    }
}
