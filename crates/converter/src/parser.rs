use crate::{
    ast::{BinOp, CmpOp, Compare, Expr, Operand, Program, Stmt, StmtKind},
    error::ConvertError,
    instruction::WORD_RANGE,
    lexer::{tokenize, Token, TokenKind},
};

/// Python keywords outside the accepted subset. Seeing one at the start of a
/// statement is reported as unsupported rather than as a syntax error.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "except",
    "finally", "from", "global", "import", "is", "lambda", "nonlocal", "not", "or", "raise",
    "return", "try", "with", "yield",
];

const RESERVED: &[&str] = &[
    "if", "elif", "else", "while", "for", "in", "pass", "True", "False", "None",
];

fn word_literal(line: usize, value: i64) -> Result<Operand, ConvertError> {
    if WORD_RANGE.contains(&value) {
        Ok(Operand::Int(value))
    } else {
        Err(ConvertError::unsupported(
            line,
            "integer literal outside the 16-bit range",
        ))
    }
}

pub fn parse(source: &str) -> Result<Program, ConvertError> {
    let tokens = tokenize(source)?;
    Parser { tokens, pos: 0 }.program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn program(mut self) -> Result<Program, ConvertError> {
        let mut body = Vec::new();
        while !self.at(&TokenKind::Eof) {
            body.push(self.statement()?);
        }
        Ok(Program { body })
    }

    fn statement(&mut self) -> Result<Stmt, ConvertError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Indent => Err(ConvertError::Indentation {
                line: token.line,
                message: "unexpected indent".into(),
            }),
            TokenKind::Name(word) => match word.as_str() {
                "if" => {
                    self.advance();
                    self.if_statement(token.line)
                }
                "while" => {
                    self.advance();
                    let test = self.compare()?;
                    let body = self.block()?;
                    Ok(Stmt {
                        line: token.line,
                        kind: StmtKind::While { test, body },
                    })
                }
                "for" => {
                    self.advance();
                    self.for_statement(token.line)
                }
                "elif" | "else" => Err(ConvertError::syntax(
                    token.line,
                    format!("'{word}' without a matching 'if'"),
                )),
                _ => {
                    let stmt = self.simple_statement()?;
                    self.expect_newline()?;
                    Ok(stmt)
                }
            },
            _ => Err(self.unexpected(&token)),
        }
    }

    /// `pass` or an assignment, without the trailing newline.
    fn simple_statement(&mut self) -> Result<Stmt, ConvertError> {
        let token = self.peek().clone();
        let TokenKind::Name(word) = &token.kind else {
            return Err(self.unexpected(&token));
        };
        if word == "pass" {
            self.advance();
            return Ok(Stmt {
                line: token.line,
                kind: StmtKind::Pass,
            });
        }
        if UNSUPPORTED_KEYWORDS.contains(&word.as_str()) {
            return Err(ConvertError::unsupported(
                token.line,
                format!("the '{word}' statement"),
            ));
        }
        if RESERVED.contains(&word.as_str()) {
            return Err(self.unexpected(&token));
        }
        self.assignment(token.line)
    }

    fn assignment(&mut self, line: usize) -> Result<Stmt, ConvertError> {
        let mut targets = Vec::new();
        let mut value = self.expression()?;
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Assign => {
                    self.advance();
                    match value {
                        Expr::Operand(Operand::Name(name)) => targets.push(name),
                        _ => {
                            return Err(ConvertError::syntax(
                                token.line,
                                "cannot assign to an expression",
                            ))
                        }
                    }
                    value = self.expression()?;
                }
                TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
                    if self.peek_nth(1).kind == TokenKind::Assign =>
                {
                    return Err(ConvertError::unsupported(line, "augmented assignment"));
                }
                _ => break,
            }
        }
        if targets.is_empty() {
            return Err(ConvertError::unsupported(line, "an expression statement"));
        }
        Ok(Stmt {
            line,
            kind: StmtKind::Assign { targets, value },
        })
    }

    fn if_statement(&mut self, line: usize) -> Result<Stmt, ConvertError> {
        let test = self.compare()?;
        let body = self.block()?;
        let next = self.peek().clone();
        let orelse = match &next.kind {
            TokenKind::Name(word) if word == "elif" => {
                self.advance();
                vec![self.if_statement(next.line)?]
            }
            TokenKind::Name(word) if word == "else" => {
                self.advance();
                self.block()?
            }
            _ => Vec::new(),
        };
        Ok(Stmt {
            line,
            kind: StmtKind::If { test, body, orelse },
        })
    }

    fn for_statement(&mut self, line: usize) -> Result<Stmt, ConvertError> {
        let target = self.name()?;
        let token = self.advance();
        if !matches!(&token.kind, TokenKind::Name(word) if word == "in") {
            return Err(ConvertError::syntax(token.line, "expected 'in'"));
        }
        let token = self.advance();
        if !matches!(&token.kind, TokenKind::Name(word) if word == "range") {
            return Err(ConvertError::unsupported(
                token.line,
                "iteration over anything other than range()",
            ));
        }
        self.expect(TokenKind::LParen, "expected '(' after range")?;
        let mut args = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                args.push(self.operand()?);
                if !self.eat(&TokenKind::Comma) || self.at(&TokenKind::RParen) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')'")?;
        let (start, end) = match args.len() {
            1 => (Operand::Int(0), args.remove(0)),
            2 => {
                let end = args.remove(1);
                (args.remove(0), end)
            }
            0 => {
                return Err(ConvertError::syntax(
                    line,
                    "range expected at least 1 argument, got 0",
                ))
            }
            _ => return Err(ConvertError::unsupported(line, "range() with a step")),
        };
        let body = self.block()?;
        Ok(Stmt {
            line,
            kind: StmtKind::For {
                target,
                start,
                end,
                body,
            },
        })
    }

    /// `:` followed by either an indented suite or one simple statement on the
    /// same line.
    fn block(&mut self) -> Result<Vec<Stmt>, ConvertError> {
        self.expect(TokenKind::Colon, "expected ':'")?;
        if !self.at(&TokenKind::Newline) {
            let stmt = self.simple_statement()?;
            self.expect_newline()?;
            return Ok(vec![stmt]);
        }
        self.advance();
        let token = self.peek().clone();
        if token.kind != TokenKind::Indent {
            return Err(ConvertError::Indentation {
                line: token.line,
                message: "expected an indented block".into(),
            });
        }
        self.advance();
        let mut body = Vec::new();
        while !self.eat(&TokenKind::Dedent) {
            if self.at(&TokenKind::Eof) {
                break;
            }
            body.push(self.statement()?);
        }
        Ok(body)
    }

    fn compare(&mut self) -> Result<Compare, ConvertError> {
        let line = self.peek().line;
        let left = self.operand()?;
        let op = match self.cmp_op() {
            Some(op) => op,
            None if self.at(&TokenKind::Assign) => {
                return Err(ConvertError::syntax(line, "use '==' to compare values"))
            }
            None if self.arith_op().is_some() => {
                return Err(ConvertError::unsupported(line, "arithmetic inside a condition"))
            }
            None => return Err(ConvertError::unsupported(line, "a condition without a comparison")),
        };
        let right = self.operand()?;
        if self.cmp_op().is_some() {
            return Err(ConvertError::unsupported(line, "a chained comparison"));
        }
        if self.arith_op().is_some() {
            return Err(ConvertError::unsupported(line, "arithmetic inside a condition"));
        }
        Ok(Compare { left, op, right })
    }

    fn expression(&mut self) -> Result<Expr, ConvertError> {
        let line = self.peek().line;
        let left = self.operand()?;
        let Some(op) = self.arith_op_before_operand() else {
            return Ok(Expr::Operand(left));
        };
        let right = self.operand()?;
        if self.arith_op_before_operand().is_some() {
            return Err(ConvertError::unsupported(
                line,
                "an expression with more than one operator",
            ));
        }
        Ok(Expr::BinOp { left, op, right })
    }

    fn operand(&mut self) -> Result<Operand, ConvertError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Int(value) => word_literal(token.line, value),
            TokenKind::Minus => {
                let next = self.advance();
                match next.kind {
                    TokenKind::Int(value) => word_literal(next.line, -value),
                    TokenKind::Name(_) => Err(ConvertError::unsupported(
                        next.line,
                        "unary minus on a variable",
                    )),
                    _ => Err(self.unexpected(&next)),
                }
            }
            TokenKind::Name(name) => {
                if self.at(&TokenKind::LParen) {
                    return Err(ConvertError::unsupported(
                        token.line,
                        format!("calling '{name}'"),
                    ));
                }
                match name.as_str() {
                    "True" | "False" => {
                        Err(ConvertError::unsupported(token.line, "boolean literal"))
                    }
                    "None" => Err(ConvertError::unsupported(token.line, "None")),
                    word if RESERVED.contains(&word) || UNSUPPORTED_KEYWORDS.contains(&word) => {
                        Err(ConvertError::syntax(
                            token.line,
                            format!("unexpected keyword '{word}'"),
                        ))
                    }
                    _ => Ok(Operand::Name(name)),
                }
            }
            TokenKind::LParen => Err(ConvertError::unsupported(
                token.line,
                "a parenthesised expression",
            )),
            _ => Err(self.unexpected(&token)),
        }
    }

    fn name(&mut self) -> Result<String, ConvertError> {
        match self.operand()? {
            Operand::Name(name) => Ok(name),
            Operand::Int(_) => Err(ConvertError::syntax(
                self.tokens[self.pos.saturating_sub(1)].line,
                "expected a variable name",
            )),
        }
    }

    fn cmp_op(&mut self) -> Option<CmpOp> {
        let op = match self.peek().kind {
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::Ge => CmpOp::Ge,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Le => CmpOp::Le,
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::NotEq => CmpOp::Ne,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn arith_op(&self) -> Option<BinOp> {
        match self.peek().kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            _ => None,
        }
    }

    /// Consumes an arithmetic operator unless it starts an augmented
    /// assignment (`+=`), which `assignment` reports.
    fn arith_op_before_operand(&mut self) -> Option<BinOp> {
        let op = self.arith_op()?;
        if self.peek_nth(1).kind == TokenKind::Assign {
            return None;
        }
        self.advance();
        Some(op)
    }

    fn expect_newline(&mut self) -> Result<(), ConvertError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected(&token)),
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<(), ConvertError> {
        let token = self.peek().clone();
        if token.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(ConvertError::syntax(token.line, message))
        }
    }

    fn unexpected(&self, token: &Token) -> ConvertError {
        let what = match &token.kind {
            TokenKind::Name(name) => format!("unexpected name '{name}'"),
            TokenKind::Int(value) => format!("unexpected number {value}"),
            TokenKind::Newline => "unexpected end of line".to_string(),
            TokenKind::Eof => "unexpected end of file".to_string(),
            TokenKind::Indent => "unexpected indent".to_string(),
            TokenKind::Dedent => "unexpected dedent".to_string(),
            other => format!("unexpected token {other:?}"),
        };
        ConvertError::syntax(token.line, what)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
