//! Helper methods and utilities

use super::*;

impl Parser {
    pub(crate) fn parse_identifier(&mut self) -> ParseResult<Node<Ident>> {
        if !self.current_token().kind.is_identifier_like() {
            return Err(self.error(format!(
                "Expected identifier, found {:?}",
                self.current_token().kind
            )));
        }
        let token = self.advance();
        Ok(Node::new(Ident::new(token.value.clone()), token.span))
    }

    /// Identifier after `.` or `?.`: any keyword is allowed, and `#private` names.
    pub(crate) fn parse_member_name(&mut self) -> ParseResult<Node<Ident>> {
        let kind = self.current_token().kind;
        if !kind.is_property_name() && kind != TokenKind::PrivateName {
            return Err(self.error(format!("Expected property name, found {:?}", kind)));
        }
        let token = self.advance();
        Ok(Node::new(Ident::new(token.value.clone()), token.span))
    }

    pub(crate) fn parse_property_name(&mut self) -> ParseResult<PropertyName> {
        match self.current_token().kind {
            kind if kind.is_property_name() || kind == TokenKind::PrivateName => {
                let ident = self.parse_member_name()?;
                Ok(PropertyName::Ident(ident))
            }
            TokenKind::StringLiteral => {
                let value = self.advance().value.clone();
                Ok(PropertyName::String(value))
            }
            TokenKind::NumberLiteral => {
                let value = self.advance().value.clone();
                let num = parse_number(&value).unwrap_or(0.0);
                Ok(PropertyName::Number(num))
            }
            TokenKind::LBracket => {
                self.advance();
                let expr = Box::new(self.parse_assignment_expression()?);
                self.consume(TokenKind::RBracket)?;
                Ok(PropertyName::Computed(expr))
            }
            _ => Err(self.error("Expected property name".to_string())),
        }
    }

    /// Parses `(params)`, returning the parameters and the span of the parentheses.
    pub(crate) fn parse_function_params(&mut self) -> ParseResult<(Vec<Param>, Span)> {
        let open = self.consume(TokenKind::LParen)?.span;
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            params.push(self.parse_function_param()?);
            if !self.check(&TokenKind::RParen) {
                self.consume(TokenKind::Comma)?;
            }
        }

        let close = self.consume(TokenKind::RParen)?.span;
        Ok((params, open.merge(&close)))
    }

    pub(crate) fn parse_function_param(&mut self) -> ParseResult<Param> {
        let start = self.current_token().span;
        let is_rest = if self.check(&TokenKind::DotDotDot) {
            self.advance();
            true
        } else {
            false
        };

        let pattern = self.parse_pattern_with_default()?;
        let span = start.merge(&self.previous_token().span);

        Ok(Param {
            pattern,
            is_rest,
            span,
        })
    }

    pub(crate) fn parse_binary_operator(&mut self) -> ParseResult<BinaryOp> {
        let op = match self.current_token().kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::StarStar => BinaryOp::Pow,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq => BinaryOp::NotEq,
            TokenKind::EqEqEq => BinaryOp::StrictEq,
            TokenKind::BangEqEq => BinaryOp::StrictNotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::QuestionQuestion => BinaryOp::NullishCoalesce,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::LtLt => BinaryOp::LeftShift,
            TokenKind::GtGt => BinaryOp::RightShift,
            TokenKind::GtGtGt => BinaryOp::UnsignedRightShift,
            TokenKind::In => BinaryOp::In,
            TokenKind::Instanceof => BinaryOp::InstanceOf,
            _ => return Err(self.error("Expected binary operator".to_string())),
        };
        self.advance();
        Ok(op)
    }

    pub(crate) fn parse_assignment_operator(&mut self) -> ParseResult<AssignmentOp> {
        let op = match self.current_token().kind {
            TokenKind::Eq => AssignmentOp::Assign,
            TokenKind::PlusEq => AssignmentOp::AddAssign,
            TokenKind::MinusEq => AssignmentOp::SubAssign,
            TokenKind::StarEq => AssignmentOp::MulAssign,
            TokenKind::SlashEq => AssignmentOp::DivAssign,
            TokenKind::PercentEq => AssignmentOp::ModAssign,
            TokenKind::StarStarEq => AssignmentOp::PowAssign,
            TokenKind::AmpAmpEq => AssignmentOp::AndAssign,
            TokenKind::PipePipeEq => AssignmentOp::OrAssign,
            TokenKind::QuestionQuestionEq => AssignmentOp::NullishAssign,
            TokenKind::LtLtEq => AssignmentOp::LeftShiftAssign,
            TokenKind::GtGtEq => AssignmentOp::RightShiftAssign,
            TokenKind::GtGtGtEq => AssignmentOp::UnsignedRightShiftAssign,
            TokenKind::AmpEq => AssignmentOp::BitAndAssign,
            TokenKind::PipeEq => AssignmentOp::BitOrAssign,
            TokenKind::CaretEq => AssignmentOp::BitXorAssign,
            _ => return Err(self.error("Expected assignment operator".to_string())),
        };
        self.advance();
        Ok(op)
    }

    pub(crate) fn parse_var_declaration_without_semicolon(&mut self) -> ParseResult<VarDecl> {
        let kind = match self.current_token().kind {
            TokenKind::Const => VarDeclKind::Const,
            TokenKind::Let => VarDeclKind::Let,
            TokenKind::Var => VarDeclKind::Var,
            _ => return Err(self.error("Expected var, let, or const".to_string())),
        };
        self.advance();

        let mut declarations = Vec::new();

        loop {
            let pattern = self.parse_pattern()?;
            let init = if self.check(&TokenKind::Eq) {
                self.advance();
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };

            declarations.push(VarDeclarator { pattern, init });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(VarDecl { kind, declarations })
    }

    // =========================================================================
    // Operator Precedence
    // =========================================================================

    pub(crate) fn get_infix_precedence(&self) -> u8 {
        let token = self.current_token();
        match token.kind {
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::StarStarEq
            | TokenKind::AmpAmpEq
            | TokenKind::PipePipeEq
            | TokenKind::QuestionQuestionEq
            | TokenKind::LtLtEq
            | TokenKind::GtGtEq
            | TokenKind::GtGtGtEq
            | TokenKind::AmpEq
            | TokenKind::PipeEq
            | TokenKind::CaretEq => 1,
            TokenKind::Question => 2,
            TokenKind::QuestionQuestion => 3,
            TokenKind::PipePipe => 4,
            TokenKind::AmpAmp => 5,
            TokenKind::Pipe => 6,
            TokenKind::Caret => 7,
            TokenKind::Amp => 8,
            TokenKind::EqEq | TokenKind::BangEq | TokenKind::EqEqEq | TokenKind::BangEqEq => 9,
            TokenKind::In if self.no_in => 0,
            TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::In
            | TokenKind::Instanceof => 10,
            TokenKind::LtLt | TokenKind::GtGt | TokenKind::GtGtGt => 11,
            TokenKind::Plus | TokenKind::Minus => 12,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 13,
            TokenKind::StarStar => 14,
            // Postfix update cannot follow a line break
            TokenKind::PlusPlus | TokenKind::MinusMinus if token.newline_before => 0,
            TokenKind::PlusPlus | TokenKind::MinusMinus => 16,
            TokenKind::Dot
            | TokenKind::QuestionDot
            | TokenKind::LBracket
            | TokenKind::LParen
            | TokenKind::TemplateLiteral => 17,
            _ => 0,
        }
    }

    // =========================================================================
    // Utility Methods (Token Manipulation)
    // =========================================================================

    pub(crate) fn current_token(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(crate) fn previous_token(&self) -> &Token {
        &self.tokens[(self.current.saturating_sub(1)).min(self.tokens.len() - 1)]
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous_token()
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && &self.current_token().kind == kind
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + offset).map(|token| &token.kind)
    }

    pub(crate) fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.current_token().kind == TokenKind::Eof
    }

    pub(crate) fn consume(&mut self, kind: TokenKind) -> ParseResult<&Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("Expected {:?}, found {:?}", kind, self.current_token().kind)))
        }
    }

    /// Automatic semicolon insertion: a semicolon may be omitted before `}`,
    /// at end of input, or when the next token starts a new line.
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
            return Ok(());
        }
        if self.check(&TokenKind::RBrace) || self.is_at_end() || self.current_token().newline_before {
            return Ok(());
        }
        Err(self.error(format!(
            "Expected Semicolon, found {:?}",
            self.current_token().kind
        )))
    }

    /// True when a restricted production (`return`, `break`, ...) ends here.
    pub(crate) fn is_semicolon_ahead(&self) -> bool {
        self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_at_end()
            || self.current_token().newline_before
    }

    /// Looks past the parenthesized group starting `offset` tokens ahead and
    /// reports whether `=>` follows it.
    pub(crate) fn is_arrow_after_parens(&self, offset: usize) -> bool {
        let mut depth = 0usize;
        let mut index = self.current + offset;
        while let Some(token) = self.tokens.get(index) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.tokens.get(index + 1).map_or(false, |next| {
                            next.kind == TokenKind::FatArrow && !next.newline_before
                        });
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            index += 1;
        }
        false
    }

    pub(crate) fn error(&self, message: String) -> ParseError {
        let token = self.current_token();
        // Lexical errors carry their own message
        if token.kind == TokenKind::Error {
            return ParseError::new(token.value.clone(), token.span);
        }
        ParseError::new(message, token.span)
    }

    pub(crate) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous_token().kind == TokenKind::Semicolon {
                return;
            }

            match self.current_token().kind {
                TokenKind::Class
                | TokenKind::Function
                | TokenKind::Const
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Import
                | TokenKind::Export
                | TokenKind::RBrace => return,
                _ => {}
            }

            self.advance();
        }
    }
}
