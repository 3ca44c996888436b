//! Statement parsing

use super::*;

impl Parser {
    /// Parses one statement into its own arena slot.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<StmtId> {
        let leading_start = self.leading_start();
        let start = self.current_token().span;
        let stmt = self.parse_statement_kind()?;
        let span = start.merge(&self.previous_token().span);
        Ok(self.finish_statement(stmt, leading_start, span))
    }

    fn parse_statement_kind(&mut self) -> ParseResult<Stmt> {
        match self.current_token().kind {
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::Empty)
            }
            TokenKind::Var | TokenKind::Const => self.parse_var_declaration(),
            TokenKind::Let if self.is_let_declaration() => self.parse_var_declaration(),
            TokenKind::Function => {
                let function = self.parse_function(false, true)?;
                Ok(Stmt::Function(function))
            }
            TokenKind::Async
                if self.peek_token(1).map_or(false, |next| {
                    next.kind == TokenKind::Function && !next.newline_before
                }) =>
            {
                self.advance();
                let function = self.parse_function(true, true)?;
                Ok(Stmt::Function(function))
            }
            TokenKind::Class => {
                let class = self.parse_class(true)?;
                Ok(Stmt::Class(class))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Debugger => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Stmt::Debugger)
            }
            TokenKind::Import
                if !matches!(self.peek_kind(1), Some(TokenKind::LParen) | Some(TokenKind::Dot)) =>
            {
                Ok(Stmt::Import(self.parse_import_decl()?))
            }
            TokenKind::Export => Ok(Stmt::Export(self.parse_export_decl()?)),
            kind if kind.is_identifier_like() && self.peek_kind(1) == Some(&TokenKind::Colon) => {
                let label = self.parse_identifier()?;
                self.consume(TokenKind::Colon)?;
                let body = self.parse_statement()?;
                Ok(Stmt::Labeled { label, body })
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// `let` starts a declaration only when a binding follows it.
    fn is_let_declaration(&self) -> bool {
        match self.peek_kind(1) {
            Some(TokenKind::LBracket) | Some(TokenKind::LBrace) => true,
            Some(kind) => kind.is_identifier_like(),
            None => false,
        }
    }

    /// Parses `{ stmts }` into a statement list of its own.
    pub(crate) fn parse_block(&mut self) -> ParseResult<BlockId> {
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let open = self.consume(TokenKind::LBrace)?.span;

        let stmts = self.parse_statement_list(|kind| kind == TokenKind::RBrace);
        let trailing_start = self.list_trailing_start(&stmts, open.end);

        let close = self.consume(TokenKind::RBrace)?.span;
        self.no_in = saved_no_in;

        let mut block = BlockSlot::new(open.merge(&close), open.end);
        block.stmts = stmts;
        block.trailing_start = trailing_start;
        Ok(self.tree.alloc_block(block))
    }

    pub(crate) fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        let decl = self.parse_var_declaration_without_semicolon()?;
        self.consume_semicolon()?;
        Ok(Stmt::VarDecl(decl))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::If)?;
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;

        let then_stmt = self.parse_statement()?;
        let else_stmt = if self.check(&TokenKind::Else) {
            self.advance();
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_stmt,
            else_stmt,
        })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::For)?;

        let is_await = if self.check(&TokenKind::Await) {
            self.advance();
            true
        } else {
            false
        };

        self.consume(TokenKind::LParen)?;

        // Head: either `init; cond; update` or `left in/of right`
        let saved_no_in = std::mem::replace(&mut self.no_in, true);
        let head = self.parse_for_head();
        self.no_in = saved_no_in;
        let init = head?;

        if self.check(&TokenKind::In) || self.check(&TokenKind::Of) {
            let is_of = self.check(&TokenKind::Of);
            self.advance();

            let left = match init {
                Some(ForInit::VarDecl(decl)) => ForInLeft::VarDecl(decl),
                Some(ForInit::Expr(expr)) => ForInLeft::Pattern(self.expr_to_pattern(expr)?),
                None => return Err(self.error("Expected for-in/of binding".to_string())),
            };

            let right = if is_of {
                self.parse_assignment_expression()?
            } else {
                self.parse_expression()?
            };
            self.consume(TokenKind::RParen)?;
            let body = self.parse_statement()?;

            return Ok(if is_of {
                Stmt::ForOf {
                    left,
                    right,
                    body,
                    is_await,
                }
            } else {
                Stmt::ForIn { left, right, body }
            });
        }

        self.consume(TokenKind::Semicolon)?;

        let condition = if !self.check(&TokenKind::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon)?;

        let update = if !self.check(&TokenKind::RParen) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(TokenKind::RParen)?;

        let body = self.parse_statement()?;

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn parse_for_head(&mut self) -> ParseResult<Option<ForInit>> {
        match self.current_token().kind {
            TokenKind::Semicolon => Ok(None),
            TokenKind::Var | TokenKind::Const => {
                Ok(Some(ForInit::VarDecl(self.parse_var_declaration_without_semicolon()?)))
            }
            TokenKind::Let if self.is_let_declaration() => {
                Ok(Some(ForInit::VarDecl(self.parse_var_declaration_without_semicolon()?)))
            }
            _ => Ok(Some(ForInit::Expr(self.parse_expression()?))),
        }
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::While)?;
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        let body = self.parse_statement()?;

        Ok(Stmt::While { condition, body })
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Do)?;
        let body = self.parse_statement()?;
        self.consume(TokenKind::While)?;
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        // The semicolon after do-while is always optional
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }

        Ok(Stmt::DoWhile { body, condition })
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Switch)?;
        self.consume(TokenKind::LParen)?;
        let discriminant = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        self.consume(TokenKind::LBrace)?;

        let mut cases = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let test = if self.check(&TokenKind::Case) {
                self.advance();
                Some(self.parse_expression()?)
            } else {
                self.consume(TokenKind::Default)?;
                None
            };

            let colon_end = self.consume(TokenKind::Colon)?.span.end;
            let stmts = self.parse_statement_list(|kind| {
                matches!(kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace)
            });

            // A case list has no delimiters of its own
            let end = self.list_trailing_start(&stmts, colon_end);
            let mut block = BlockSlot::new(Span::new(colon_end, end, self.tree.file_id), colon_end);
            block.stmts = stmts;
            block.trailing_start = end;
            let consequent = self.tree.alloc_block(block);

            cases.push(SwitchCase { test, consequent });
        }

        self.consume(TokenKind::RBrace)?;

        Ok(Stmt::Switch {
            discriminant,
            cases,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Return)?;

        let value = if !self.is_semicolon_ahead() {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.consume_semicolon()?;
        Ok(Stmt::Return(value))
    }

    fn parse_break_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Break)?;
        let label = self.parse_optional_label()?;
        self.consume_semicolon()?;
        Ok(Stmt::Break(label))
    }

    fn parse_continue_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Continue)?;
        let label = self.parse_optional_label()?;
        self.consume_semicolon()?;
        Ok(Stmt::Continue(label))
    }

    fn parse_optional_label(&mut self) -> ParseResult<Option<Node<Ident>>> {
        if !self.is_semicolon_ahead() && self.current_token().kind.is_identifier_like() {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    fn parse_throw_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Throw)?;
        if self.current_token().newline_before {
            return Err(self.error("Illegal newline after throw".to_string()));
        }
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Stmt::Throw(expr))
    }

    fn parse_try_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::Try)?;
        let block = self.parse_block()?;

        let catch = if self.check(&TokenKind::Catch) {
            self.advance();

            // Optional catch binding
            let param = if self.check(&TokenKind::LParen) {
                self.advance();
                let pattern = self.parse_pattern()?;
                self.consume(TokenKind::RParen)?;
                Some(pattern)
            } else {
                None
            };

            let body = self.parse_block()?;
            Some(CatchClause { param, body })
        } else {
            None
        };

        let finally = if self.check(&TokenKind::Finally) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        if catch.is_none() && finally.is_none() {
            return Err(self.error("Expected catch or finally after try block".to_string()));
        }

        Ok(Stmt::Try {
            block,
            catch,
            finally,
        })
    }
}
