//! Expression parsing

use super::*;

impl Parser {
    /// Full expression, comma sequences included.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node<Expr>> {
        let first = self.parse_assignment_expression()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let start = first.span;
        let mut exprs = vec![first];
        while self.check(&TokenKind::Comma) {
            self.advance();
            exprs.push(self.parse_assignment_expression()?);
        }

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(Expr::Sequence(exprs), span))
    }

    /// Single expression: arguments, initializers, element values.
    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<Node<Expr>> {
        self.parse_expression_with_precedence(0)
    }

    pub(crate) fn parse_expression_with_precedence(&mut self, min_precedence: u8) -> ParseResult<Node<Expr>> {
        let mut left = self.parse_prefix_expression()?;

        // An arrow function extends as far as its body; nothing chains onto it
        if matches!(left.value, Expr::Arrow { .. }) {
            return Ok(left);
        }

        loop {
            let precedence = self.get_infix_precedence();

            if precedence == 0 || precedence < min_precedence {
                break;
            }

            left = self.parse_infix_expression(left)?;
        }

        Ok(left)
    }

    fn parse_prefix_expression(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;

        let op = match self.current_token().kind {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::TypeOf),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            TokenKind::PlusPlus => Some(UnaryOp::PreIncrement),
            TokenKind::MinusMinus => Some(UnaryOp::PreDecrement),
            _ => None,
        };

        let expr = if let Some(op) = op {
            self.advance();
            let expr = Box::new(self.parse_expression_with_precedence(14)?);
            Expr::Unary { op, expr }
        } else {
            match self.current_token().kind {
                TokenKind::Await => {
                    self.advance();
                    let expr = Box::new(self.parse_expression_with_precedence(14)?);
                    Expr::Await(expr)
                }
                TokenKind::Yield => {
                    self.advance();
                    let delegate = if self.check(&TokenKind::Star) {
                        self.advance();
                        true
                    } else {
                        false
                    };
                    // Check if there's an argument (not followed by a closing token or a new line)
                    let argument = if !self.current_token().newline_before
                        && !matches!(
                            self.current_token().kind,
                            TokenKind::Semicolon
                                | TokenKind::RBrace
                                | TokenKind::RBracket
                                | TokenKind::Comma
                                | TokenKind::RParen
                                | TokenKind::Colon
                                | TokenKind::Eof
                        )
                    {
                        Some(Box::new(self.parse_assignment_expression()?))
                    } else {
                        None
                    };
                    Expr::Yield { argument, delegate }
                }
                TokenKind::DotDotDot => {
                    self.advance();
                    let expr = Box::new(self.parse_assignment_expression()?);
                    Expr::Spread(expr)
                }
                _ => return self.parse_primary_expression(),
            }
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(expr, span))
    }

    pub(crate) fn parse_infix_expression(&mut self, left: Node<Expr>) -> ParseResult<Node<Expr>> {
        let start = left.span;

        let expr = match self.current_token().kind {
            // Assignment operators
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
            | TokenKind::CaretEq => {
                let op = self.parse_assignment_operator()?;
                let right = Box::new(self.parse_expression_with_precedence(1)?);
                Expr::Assignment {
                    target: Box::new(left),
                    op,
                    value: right,
                }
            }

            // Ternary operator
            TokenKind::Question => {
                self.advance();
                let saved_no_in = std::mem::replace(&mut self.no_in, false);
                let then_expr = self.parse_assignment_expression();
                self.no_in = saved_no_in;
                let then_expr = Box::new(then_expr?);
                self.consume(TokenKind::Colon)?;
                let else_expr = Box::new(self.parse_expression_with_precedence(1)?);
                Expr::Ternary {
                    condition: Box::new(left),
                    then_expr,
                    else_expr,
                }
            }

            // Exponentiation is right-associative
            TokenKind::StarStar => {
                let precedence = self.get_infix_precedence();
                let op = self.parse_binary_operator()?;
                let right = Box::new(self.parse_expression_with_precedence(precedence)?);
                Expr::Binary {
                    left: Box::new(left),
                    op,
                    right,
                }
            }

            // Binary operators
            TokenKind::PipePipe
            | TokenKind::AmpAmp
            | TokenKind::Pipe
            | TokenKind::Caret
            | TokenKind::Amp
            | TokenKind::EqEq
            | TokenKind::BangEq
            | TokenKind::EqEqEq
            | TokenKind::BangEqEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::In
            | TokenKind::Instanceof
            | TokenKind::LtLt
            | TokenKind::GtGt
            | TokenKind::GtGtGt
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::QuestionQuestion => {
                let precedence = self.get_infix_precedence();
                let op = self.parse_binary_operator()?;
                let right = Box::new(self.parse_expression_with_precedence(precedence + 1)?);
                Expr::Binary {
                    left: Box::new(left),
                    op,
                    right,
                }
            }

            // Member access
            TokenKind::Dot => {
                self.advance();
                let property = self.parse_member_name()?;
                Expr::Member {
                    object: Box::new(left),
                    property,
                }
            }

            // Optional chaining
            TokenKind::QuestionDot => {
                self.advance();
                // ?.( for optional call
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_arguments()?;
                    Expr::OptionalCall {
                        callee: Box::new(left),
                        args,
                    }
                }
                // ?.[ for optional index
                else if self.check(&TokenKind::LBracket) {
                    self.advance();
                    let index = Box::new(self.parse_bracketed_expression()?);
                    self.consume(TokenKind::RBracket)?;
                    Expr::OptionalIndex {
                        object: Box::new(left),
                        index,
                    }
                }
                // ?.property for optional member
                else {
                    let property = self.parse_member_name()?;
                    Expr::OptionalMember {
                        object: Box::new(left),
                        property,
                    }
                }
            }

            // Index access
            TokenKind::LBracket => {
                self.advance();
                let index = Box::new(self.parse_bracketed_expression()?);
                self.consume(TokenKind::RBracket)?;
                Expr::Index {
                    object: Box::new(left),
                    index,
                }
            }

            // Function call
            TokenKind::LParen => {
                let args = self.parse_arguments()?;
                Expr::Call {
                    callee: Box::new(left),
                    args,
                }
            }

            // Tagged template
            TokenKind::TemplateLiteral => {
                let raw = self.advance().value.clone();
                Expr::TaggedTemplate {
                    tag: Box::new(left),
                    raw,
                }
            }

            // Postfix operators
            TokenKind::PlusPlus => {
                self.advance();
                Expr::Unary {
                    op: UnaryOp::PostIncrement,
                    expr: Box::new(left),
                }
            }

            TokenKind::MinusMinus => {
                self.advance();
                Expr::Unary {
                    op: UnaryOp::PostDecrement,
                    expr: Box::new(left),
                }
            }

            _ => return Ok(left),
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(expr, span))
    }

    /// Parses `(args)`, spread arguments included.
    pub(crate) fn parse_arguments(&mut self) -> ParseResult<Vec<Node<Expr>>> {
        self.consume(TokenKind::LParen)?;
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let mut args = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            match self.parse_assignment_expression() {
                Ok(arg) => args.push(arg),
                Err(err) => {
                    self.no_in = saved_no_in;
                    return Err(err);
                }
            }
            if !self.check(&TokenKind::RParen) {
                if let Err(err) = self.consume(TokenKind::Comma) {
                    self.no_in = saved_no_in;
                    return Err(err);
                }
            }
        }

        self.no_in = saved_no_in;
        self.consume(TokenKind::RParen)?;
        Ok(args)
    }

    /// Expression between brackets, where `in` is always an operator.
    fn parse_bracketed_expression(&mut self) -> ParseResult<Node<Expr>> {
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let expr = self.parse_expression();
        self.no_in = saved_no_in;
        expr
    }

    pub(crate) fn parse_primary_expression(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;

        let expr = match self.current_token().kind {
            // Literals
            TokenKind::NumberLiteral => {
                let value = self.advance().value.clone();
                let num = parse_number(&value).unwrap_or(f64::NAN);
                Expr::Literal(Literal::Number(num))
            }
            TokenKind::BigIntLiteral => {
                let value = self.advance().value.clone();
                Expr::Literal(Literal::BigInt(value))
            }
            TokenKind::StringLiteral => {
                let value = self.advance().value.clone();
                Expr::Literal(Literal::String(value))
            }
            TokenKind::RegexLiteral => {
                let raw = self.advance().value.clone();
                let (pattern, flags) = split_regex(&raw);
                Expr::Literal(Literal::RegExp { pattern, flags })
            }
            TokenKind::True => {
                self.advance();
                Expr::Literal(Literal::Boolean(true))
            }
            TokenKind::False => {
                self.advance();
                Expr::Literal(Literal::Boolean(false))
            }
            TokenKind::Null => {
                self.advance();
                Expr::Literal(Literal::Null)
            }

            // Template literal, substitutions kept raw
            TokenKind::TemplateLiteral => {
                let raw = self.advance().value.clone();
                Expr::Template { raw }
            }

            // Async function expression or async arrow function
            TokenKind::Async if self.is_async_function_or_arrow() => {
                return self.parse_async_expression();
            }

            // Identifiers, or a single-parameter arrow function
            kind if kind.is_identifier_like() => {
                if self.peek_token(1).map_or(false, |next| {
                    next.kind == TokenKind::FatArrow && !next.newline_before
                }) {
                    return self.parse_arrow_function(start, None, false);
                }
                let name = self.advance().value.clone();
                Expr::Ident(Ident::new(name))
            }

            // This
            TokenKind::This => {
                self.advance();
                Expr::This
            }

            // Super
            TokenKind::Super => {
                self.advance();
                Expr::Super
            }

            // import.meta, or the callee of a dynamic import()
            TokenKind::Import => {
                let token = self.advance();
                let meta = Node::new(Ident::new("import"), token.span);
                if self.check(&TokenKind::Dot) {
                    self.advance();
                    let property = self.parse_member_name()?;
                    Expr::MetaProperty { meta, property }
                } else {
                    Expr::Ident(meta.value)
                }
            }

            // Array literal
            TokenKind::LBracket => {
                let saved_no_in = std::mem::replace(&mut self.no_in, false);
                let elements = self.parse_array_elements();
                self.no_in = saved_no_in;
                Expr::Array(elements?)
            }

            // Object literal
            TokenKind::LBrace => {
                let saved_no_in = std::mem::replace(&mut self.no_in, false);
                let properties = self.parse_object_literal();
                self.no_in = saved_no_in;
                Expr::Object(properties?)
            }

            // Parenthesized expression or arrow function
            TokenKind::LParen => {
                return self.parse_paren_or_arrow();
            }

            // Function expression
            TokenKind::Function => {
                let function = self.parse_function(false, false)?;
                Expr::Function(function)
            }

            // Class expression
            TokenKind::Class => {
                let class = self.parse_class(false)?;
                Expr::Class(Box::new(class))
            }

            // New expression
            TokenKind::New => {
                let token = self.advance();
                let meta = Node::new(Ident::new("new"), token.span);

                // new.target
                if self.check(&TokenKind::Dot) {
                    self.advance();
                    let property = self.parse_member_name()?;
                    Expr::MetaProperty { meta, property }
                } else {
                    let callee = Box::new(self.parse_new_callee()?);
                    let args = if self.check(&TokenKind::LParen) {
                        Some(self.parse_arguments()?)
                    } else {
                        None
                    };
                    Expr::New { callee, args }
                }
            }

            _ => {
                return Err(self.error(format!(
                    "Unexpected token in expression: {:?}",
                    self.current_token().kind
                )))
            }
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(expr, span))
    }

    /// Callee of `new`: a member chain without calls.
    fn parse_new_callee(&mut self) -> ParseResult<Node<Expr>> {
        let mut callee = self.parse_primary_expression()?;
        while matches!(
            self.current_token().kind,
            TokenKind::Dot | TokenKind::LBracket | TokenKind::TemplateLiteral
        ) {
            callee = self.parse_infix_expression(callee)?;
        }
        Ok(callee)
    }

    fn parse_array_elements(&mut self) -> ParseResult<Vec<Option<Node<Expr>>>> {
        self.consume(TokenKind::LBracket)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            if self.check(&TokenKind::Comma) {
                elements.push(None);
                self.advance();
            } else {
                elements.push(Some(self.parse_assignment_expression()?));
                if !self.check(&TokenKind::RBracket) {
                    self.consume(TokenKind::Comma)?;
                }
            }
        }

        self.consume(TokenKind::RBracket)?;
        Ok(elements)
    }

    fn parse_object_literal(&mut self) -> ParseResult<Vec<ObjectProperty>> {
        self.consume(TokenKind::LBrace)?;
        let mut properties = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            properties.push(self.parse_object_property()?);

            if !self.check(&TokenKind::RBrace) {
                self.consume(TokenKind::Comma)?;
            }
        }

        self.consume(TokenKind::RBrace)?;
        Ok(properties)
    }

    fn parse_object_property(&mut self) -> ParseResult<ObjectProperty> {
        // Spread
        if self.check(&TokenKind::DotDotDot) {
            self.advance();
            let expr = self.parse_assignment_expression()?;
            return Ok(ObjectProperty::Spread(expr));
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers();
        let key = self.parse_property_name()?;

        // Method shorthand, accessor, or property
        if kind != MethodKind::Method || is_async || is_generator || self.check(&TokenKind::LParen) {
            let function = self.parse_method_function(is_async, is_generator)?;
            return Ok(ObjectProperty::Method {
                kind,
                key,
                function,
            });
        }

        if self.check(&TokenKind::Colon) {
            self.advance();
            let value = self.parse_assignment_expression()?;
            return Ok(ObjectProperty::Property {
                key,
                value,
                shorthand: false,
            });
        }

        // Shorthand property, optionally with a destructuring default
        let PropertyName::Ident(ident) = &key else {
            return Err(self.error("Invalid property shorthand".to_string()));
        };
        let mut value = Node::new(Expr::Ident(ident.value.clone()), ident.span);
        if self.check(&TokenKind::Eq) {
            self.advance();
            let default = self.parse_assignment_expression()?;
            let span = value.span.merge(&default.span);
            value = Node::new(
                Expr::Assignment {
                    target: Box::new(value),
                    op: AssignmentOp::Assign,
                    value: Box::new(default),
                },
                span,
            );
        }

        Ok(ObjectProperty::Property {
            key,
            value,
            shorthand: true,
        })
    }

    fn parse_paren_or_arrow(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;

        if self.is_arrow_after_parens(0) {
            let (params, _) = self.parse_function_params()?;
            return self.parse_arrow_function(start, Some(params), false);
        }

        self.consume(TokenKind::LParen)?;

        let expr = self.parse_bracketed_expression()?;
        self.consume(TokenKind::RParen)?;

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(Expr::Paren(Box::new(expr)), span))
    }

    /// `async function`, `async x =>` or `async (...) =>`
    fn is_async_function_or_arrow(&self) -> bool {
        let Some(next) = self.peek_token(1) else {
            return false;
        };
        if next.newline_before {
            return false;
        }
        match next.kind {
            TokenKind::Function => true,
            TokenKind::LParen => self.is_arrow_after_parens(1),
            kind if kind.is_identifier_like() => {
                self.peek_kind(2) == Some(&TokenKind::FatArrow)
            }
            _ => false,
        }
    }

    fn parse_async_expression(&mut self) -> ParseResult<Node<Expr>> {
        let start = self.current_token().span;
        self.consume(TokenKind::Async)?;

        if self.check(&TokenKind::Function) {
            let function = self.parse_function(true, false)?;
            let span = start.merge(&self.previous_token().span);
            return Ok(Node::new(Expr::Function(function), span));
        }

        if self.check(&TokenKind::LParen) {
            let (params, _) = self.parse_function_params()?;
            self.parse_arrow_function(start, Some(params), true)
        } else {
            self.parse_arrow_function(start, None, true)
        }
    }

    fn parse_arrow_function(
        &mut self,
        start: Span,
        params: Option<Vec<Param>>,
        is_async: bool,
    ) -> ParseResult<Node<Expr>> {
        let params = if let Some(p) = params {
            p
        } else {
            // Single parameter without parentheses
            let ident = self.parse_identifier()?;
            let span = ident.span;
            vec![Param {
                pattern: Node::new(Pattern::Ident(ident), span),
                is_rest: false,
                span,
            }]
        };

        self.consume(TokenKind::FatArrow)?;

        let body = if self.check(&TokenKind::LBrace) {
            ArrowBody::Block(self.parse_block()?)
        } else {
            ArrowBody::Expr(Box::new(self.parse_assignment_expression()?))
        };

        let span = start.merge(&self.previous_token().span);
        Ok(Node::new(
            Expr::Arrow {
                params,
                body,
                is_async,
            },
            span,
        ))
    }
}

/// Splits a raw `/pattern/flags` regex token.
fn split_regex(raw: &str) -> (String, String) {
    let body = raw.strip_prefix('/').unwrap_or(raw);
    match body.rfind('/') {
        Some(end) => (body[..end].to_string(), body[end + 1..].to_string()),
        None => (body.to_string(), String::new()),
    }
}
