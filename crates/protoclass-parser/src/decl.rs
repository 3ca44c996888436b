//! Function and class parsing

use super::*;

impl Parser {
    /// Parses `function [*] [name] (params) { body }`. A leading `async` has
    /// already been consumed when `is_async` is set.
    pub(crate) fn parse_function(&mut self, is_async: bool, require_name: bool) -> ParseResult<Function> {
        self.consume(TokenKind::Function)?;

        let is_generator = if self.check(&TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };

        let name = if self.current_token().kind.is_identifier_like() {
            Some(self.parse_identifier()?)
        } else if require_name {
            return Err(self.error("Expected function name".to_string()));
        } else {
            None
        };

        let (params, params_span) = self.parse_function_params()?;
        let body = self.parse_block()?;

        Ok(Function {
            name,
            params,
            params_span,
            body,
            is_async,
            is_generator,
        })
    }

    /// Parameters and body of an object or class method.
    pub(crate) fn parse_method_function(&mut self, is_async: bool, is_generator: bool) -> ParseResult<Function> {
        let (params, params_span) = self.parse_function_params()?;
        let body = self.parse_block()?;

        Ok(Function {
            name: None,
            params,
            params_span,
            body,
            is_async,
            is_generator,
        })
    }

    /// Consumes `get`, `set`, `async` and `*` prefixes of a method key.
    ///
    /// A contextual word followed by `(`, `:`, `=`, `,`, `;` or `}` is the key
    /// itself, so `get() {}` is a method named `get`.
    pub(crate) fn parse_method_modifiers(&mut self) -> (MethodKind, bool, bool) {
        let mut kind = MethodKind::Method;
        let mut is_async = false;

        match self.current_token().kind {
            TokenKind::Get if self.is_modifier() => {
                self.advance();
                kind = MethodKind::Get;
            }
            TokenKind::Set if self.is_modifier() => {
                self.advance();
                kind = MethodKind::Set;
            }
            TokenKind::Async
                if self.is_modifier()
                    && self.peek_token(1).map_or(false, |next| !next.newline_before) =>
            {
                self.advance();
                is_async = true;
            }
            _ => {}
        }

        let is_generator = if kind == MethodKind::Method && self.check(&TokenKind::Star) {
            self.advance();
            true
        } else {
            false
        };

        (kind, is_async, is_generator)
    }

    fn is_modifier(&self) -> bool {
        !matches!(
            self.peek_kind(1),
            Some(TokenKind::LParen)
                | Some(TokenKind::Colon)
                | Some(TokenKind::Eq)
                | Some(TokenKind::Comma)
                | Some(TokenKind::Semicolon)
                | Some(TokenKind::RBrace)
                | Some(TokenKind::Eof)
                | None
        )
    }

    pub(crate) fn parse_class(&mut self, require_name: bool) -> ParseResult<Class> {
        self.consume(TokenKind::Class)?;

        let name = if self.current_token().kind.is_identifier_like() {
            Some(self.parse_identifier()?)
        } else if require_name {
            return Err(self.error("Expected class name".to_string()));
        } else {
            None
        };

        let extends = if self.check(&TokenKind::Extends) {
            self.advance();
            Some(Box::new(self.parse_expression_with_precedence(17)?))
        } else {
            None
        };

        self.consume(TokenKind::LBrace)?;
        let mut members = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.check(&TokenKind::Semicolon) {
                self.advance();
                continue;
            }
            members.push(self.parse_class_member()?);
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Class {
            name,
            extends,
            members,
        })
    }

    pub(crate) fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        let start = self.current_token().span;

        let is_static = if self.check(&TokenKind::Static) && self.is_modifier() {
            self.advance();
            true
        } else {
            false
        };

        // Static initialization block
        if is_static && self.check(&TokenKind::LBrace) {
            let block = self.parse_block()?;
            let span = start.merge(&self.previous_token().span);
            return Ok(ClassMember::StaticBlock(Node::new(block, span)));
        }

        let (mut kind, is_async, is_generator) = self.parse_method_modifiers();
        let key = self.parse_property_name()?;

        if kind != MethodKind::Method || is_async || is_generator || self.check(&TokenKind::LParen) {
            let is_constructor = !is_static
                && kind == MethodKind::Method
                && !is_async
                && !is_generator
                && key.static_name().as_deref() == Some("constructor")
                && !matches!(key, PropertyName::Computed(_));
            if is_constructor {
                kind = MethodKind::Constructor;
            }

            let function = self.parse_method_function(is_async, is_generator)?;
            let span = start.merge(&self.previous_token().span);
            return Ok(ClassMember::Method(Node::new(
                MethodDef {
                    kind,
                    key,
                    is_static,
                    function,
                },
                span,
            )));
        }

        // Field
        let value = if self.check(&TokenKind::Eq) {
            self.advance();
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };

        self.consume_semicolon()?;
        let span = start.merge(&self.previous_token().span);

        Ok(ClassMember::Property(Node::new(
            ClassProperty {
                key,
                value,
                is_static,
            },
            span,
        )))
    }
}
