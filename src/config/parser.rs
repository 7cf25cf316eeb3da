//! Parser for the parameter-file language.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{ConverterError, Result};

/// Parser for parameter files.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire parameter file.
    pub fn parse(&mut self) -> Result<ConfigAst> {
        let mut ast = ConfigAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                // Skip empty lines
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let assignment = self.parse_assignment()?;
                    ast.assignments.push(assignment);
                }
                _ => {
                    return Err(ConverterError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            self.expect_line_end()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(ConverterError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn expect_line_end(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(ConverterError::parse(
                self.current.line,
                format!("unexpected trailing token: {:?}", self.current.text),
            )),
        }
    }

    fn is_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn expect_value(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| ConverterError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Equals)?;
        let value = self.expect_value()?;

        Ok(Assignment {
            name: name.text.to_lowercase(),
            value,
            line: name.line,
        })
    }

    fn parse_directive(&mut self, ast: &mut ConfigAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".thermal" => {
                let def = self.parse_thermal_def(line)?;
                ast.thermal.push(def);
            }
            ".tran" => {
                let tsim = self.expect_value()?;
                let dt = if self.is_line_end() {
                    None
                } else {
                    Some(self.expect_value()?)
                };
                ast.tran.push(TranDef { tsim, dt, line });
            }
            ".init" => {
                let mode = self.expect(TokenKind::Identifier)?.text.to_lowercase();
                ast.init.push(InitDef { mode, line });
            }
            _ => {
                return Err(ConverterError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_thermal_def(&mut self, line: usize) -> Result<ThermalDef> {
        let device_str = self.expect(TokenKind::Identifier)?.text;
        let device = Device::from_str(&device_str).ok_or_else(|| {
            ConverterError::parse(line, format!("unknown device: {}", device_str))
        })?;

        let mut params = HashMap::new();

        // Parameters, optionally in parentheses: (rth=value cth=value)
        let parenthesized = self.current.kind == TokenKind::OpenParen;
        if parenthesized {
            self.advance()?;
        }

        while !self.is_line_end() && self.current.kind != TokenKind::CloseParen {
            let param = self.expect(TokenKind::Identifier)?;
            self.expect(TokenKind::Equals)?;
            let value = self.expect_value()?;

            let key = param.text.to_lowercase();
            if params.insert(key.clone(), value).is_some() {
                return Err(ConverterError::DuplicateParameter {
                    name: format!("{}.{}", device.name(), key),
                    line,
                });
            }
        }

        if parenthesized {
            self.expect(TokenKind::CloseParen)?;
        }

        Ok(ThermalDef {
            device,
            params,
            line,
        })
    }
}
