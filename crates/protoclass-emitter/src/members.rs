//! Rendering of generated classes, members and expressions

use super::*;

impl<'t> Printer<'t> {
    pub(crate) fn print_class(&mut self, class: &Class, indent: &str) {
        self.out.push_str("class");
        if let Some(name) = &class.name {
            self.out.push(' ');
            self.out.push_str(&name.value.name);
        }
        if let Some(extends) = &class.extends {
            self.out.push_str(" extends ");
            self.print_expr(extends);
        }

        if class.members.is_empty() {
            self.out.push_str(" {}");
            return;
        }

        self.out.push_str(" {");
        let member_indent = format!("{}{}", indent, self.indent);
        for (i, member) in class.members.iter().enumerate() {
            self.out.push_str(self.newline);
            if i > 0 {
                self.out.push_str(self.newline);
            }
            self.out.push_str(&member_indent);
            self.print_member(member, &member_indent);
        }
        self.out.push_str(self.newline);
        self.out.push_str(indent);
        self.out.push('}');
    }

    fn print_member(&mut self, member: &ClassMember, indent: &str) {
        match member {
            ClassMember::Method(method) if method.span.is_synthesized() => {
                self.print_method(&method.value, indent)
            }
            ClassMember::Property(property) if property.span.is_synthesized() => {
                let property = &property.value;
                if property.is_static {
                    self.out.push_str("static ");
                }
                self.print_property_name(&property.key);
                if let Some(value) = &property.value {
                    self.out.push_str(" = ");
                    self.print_expr(value);
                }
                self.out.push(';');
            }
            ClassMember::StaticBlock(block) if block.span.is_synthesized() => {
                self.out.push_str("static ");
                self.print_body(block.value, indent);
            }
            ClassMember::Method(Node { span, .. })
            | ClassMember::Property(Node { span, .. })
            | ClassMember::StaticBlock(Node { span, .. }) => {
                let start = self.out.len();
                self.copy_span(*span);
                let original = text::line_indent(&self.tree.source, span.start);
                self.reindent(start, &original, indent);
            }
        }
    }

    fn print_method(&mut self, method: &MethodDef, indent: &str) {
        let function = &method.function;
        if method.is_static {
            self.out.push_str("static ");
        }
        match method.kind {
            MethodKind::Get => self.out.push_str("get "),
            MethodKind::Set => self.out.push_str("set "),
            MethodKind::Constructor | MethodKind::Method => {}
        }
        if function.is_async {
            self.out.push_str("async ");
        }
        if function.is_generator {
            self.out.push('*');
        }
        self.print_property_name(&method.key);
        self.print_params(function);
        self.out.push(' ');
        self.print_body(function.body, indent);
    }

    fn print_params(&mut self, function: &Function) {
        if !function.params_span.is_synthesized() {
            self.copy_span(function.params_span);
            return;
        }
        self.out.push('(');
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.copy_span(param.span);
        }
        self.out.push(')');
    }

    fn print_property_name(&mut self, key: &PropertyName) {
        match key {
            PropertyName::Ident(ident) => self.out.push_str(&ident.value.name),
            PropertyName::String(name) if is_identifier_name(name) => self.out.push_str(name),
            PropertyName::String(name) => self.out.push_str(&quote_string(name)),
            PropertyName::Number(n) => self.out.push_str(&format_number(*n)),
            PropertyName::Computed(expr) => {
                self.out.push('[');
                self.print_expr(expr);
                self.out.push(']');
            }
        }
    }

    /// Expressions from source print as their original text; generated ones
    /// cover the shapes the transform produces.
    pub(crate) fn print_expr(&mut self, expr: &Node<Expr>) {
        if !expr.span.is_synthesized() {
            self.copy_span(expr.span);
            return;
        }

        match &expr.value {
            Expr::This => self.out.push_str("this"),
            Expr::Super => self.out.push_str("super"),
            Expr::Ident(ident) => self.out.push_str(&ident.name),
            Expr::Literal(literal) => self.print_literal(literal),
            Expr::Member { object, property } => {
                self.print_expr(object);
                self.out.push('.');
                self.out.push_str(&property.value.name);
            }
            Expr::Index { object, index } => {
                self.print_expr(object);
                self.out.push('[');
                self.print_expr(index);
                self.out.push(']');
            }
            Expr::Assignment { target, op, value } => {
                self.print_expr(target);
                self.out.push_str(&format!(" {} ", op));
                self.print_expr(value);
            }
            Expr::Binary { left, op, right } => {
                self.print_expr(left);
                self.out.push_str(&format!(" {} ", op));
                self.print_expr(right);
            }
            Expr::Call { callee, args } => {
                self.print_expr(callee);
                self.print_args(args);
            }
            Expr::New { callee, args } => {
                self.out.push_str("new ");
                self.print_expr(callee);
                if let Some(args) = args {
                    self.print_args(args);
                }
            }
            Expr::Paren(inner) => {
                self.out.push('(');
                self.print_expr(inner);
                self.out.push(')');
            }
            _ => self.copy_span(expr.span),
        }
    }

    fn print_args(&mut self, args: &[Node<Expr>]) {
        self.out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.print_expr(arg);
        }
        self.out.push(')');
    }

    fn print_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Number(n) => self.out.push_str(&format_number(*n)),
            Literal::String(s) => self.out.push_str(&quote_string(s)),
            Literal::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Literal::Null => self.out.push_str("null"),
            Literal::BigInt(digits) => {
                self.out.push_str(digits);
                self.out.push('n');
            }
            Literal::RegExp { pattern, flags } => {
                self.out.push('/');
                self.out.push_str(pattern);
                self.out.push('/');
                self.out.push_str(flags);
            }
        }
    }
}
