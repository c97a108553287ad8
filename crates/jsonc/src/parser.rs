//! Error-tolerant recursive-descent parser.
//!
//! Builds a [`Cst`] from JSONC source. Malformed input degrades to a
//! best-effort tree plus diagnostics: properties may lack value nodes,
//! containers may be unclosed, and unparseable stretches are skipped.
//! Comments are skipped at the token level; trailing commas keep the tree
//! intact and are reported as diagnostics.

use serde_json::Value;

use crate::cst::{Cst, Node, NodeId, NodeKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::tokenizer::{Scanner, Token, TokenKind};

/// Parses JSONC source into a tree. Never fails: an empty or hopeless
/// document yields a [`Cst`] without a root.
pub fn parse(text: &str) -> Cst {
    let mut parser = Parser::new(text);
    parser.parse_document();
    parser.cst
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    token: Token,
    last_end: usize,
    cst: Cst,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            scanner: Scanner::new(text),
            token: Token {
                kind: TokenKind::Eof,
                offset: 0,
                length: 0,
                error: None,
            },
            last_end: 0,
            cst: Cst::default(),
        }
    }

    /// Advances to the next non-comment token, recording any scan problem
    /// attached to the tokens passed over.
    fn next(&mut self) {
        self.last_end = self.token.end();
        loop {
            let token = self.scanner.scan();
            if let Some(kind) = token.error {
                self.cst.record(ParseError {
                    kind: ParseErrorKind::Scan(kind),
                    offset: token.offset,
                    length: token.length,
                });
            }
            match token.kind {
                TokenKind::LineComment | TokenKind::BlockComment => continue,
                _ => {
                    self.token = token;
                    return;
                }
            }
        }
    }

    fn record(&mut self, kind: ParseErrorKind) {
        self.cst.record(ParseError {
            kind,
            offset: self.token.offset,
            length: self.token.length,
        });
    }

    /// Skips tokens until one of the structural recovery points. Tokens
    /// already at a recovery point are left in place.
    fn skip_until(&mut self, stop: &[TokenKind]) {
        while self.token.kind != TokenKind::Eof && !stop.contains(&self.token.kind) {
            self.next();
        }
    }

    fn finish_node(&mut self, id: NodeId) {
        let end = self.last_end;
        let node = self.cst.node_mut(id);
        node.length = end.saturating_sub(node.offset);
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>, scalar: Option<Value>) -> NodeId {
        self.cst.push(Node {
            kind,
            offset: self.token.offset,
            length: self.token.length,
            parent,
            children: Vec::new(),
            scalar,
        })
    }

    fn parse_document(&mut self) {
        self.next();
        let root = self.parse_value(None);
        if root.is_none() && self.token.kind != TokenKind::Eof {
            self.record(ParseErrorKind::ValueExpected);
        }
        self.cst.set_root(root);
        if root.is_some() && self.token.kind != TokenKind::Eof {
            self.record(ParseErrorKind::EndOfFileExpected);
        }
    }

    /// Parses one value, leaving the cursor after it. Returns `None` when
    /// the current token cannot start a value; the cursor does not move in
    /// that case.
    fn parse_value(&mut self, parent: Option<NodeId>) -> Option<NodeId> {
        match self.token.kind {
            TokenKind::OpenBrace => Some(self.parse_object(parent)),
            TokenKind::OpenBracket => Some(self.parse_array(parent)),
            TokenKind::String => {
                let value = Value::String(self.scanner.string_value().to_string());
                let id = self.push_node(NodeKind::String, parent, Some(value));
                self.next();
                Some(id)
            }
            TokenKind::Number => {
                // A number that failed to scan keeps its node but has no
                // cached value
                let scalar = if self.token.error.is_none() {
                    serde_json::from_str(self.scanner.token_text(&self.token)).ok()
                } else {
                    None
                };
                let id = self.push_node(NodeKind::Number, parent, scalar);
                self.next();
                Some(id)
            }
            TokenKind::True => {
                let id = self.push_node(NodeKind::Bool, parent, Some(Value::Bool(true)));
                self.next();
                Some(id)
            }
            TokenKind::False => {
                let id = self.push_node(NodeKind::Bool, parent, Some(Value::Bool(false)));
                self.next();
                Some(id)
            }
            TokenKind::Null => {
                let id = self.push_node(NodeKind::Null, parent, Some(Value::Null));
                self.next();
                Some(id)
            }
            _ => None,
        }
    }

    fn parse_object(&mut self, parent: Option<NodeId>) -> NodeId {
        let object = self.push_node(NodeKind::Object, parent, None);
        self.next();
        let mut saw_comma = false;

        loop {
            match self.token.kind {
                TokenKind::CloseBrace => {
                    if saw_comma {
                        self.record(ParseErrorKind::TrailingComma);
                    }
                    self.next();
                    break;
                }
                TokenKind::Eof => {
                    self.record(ParseErrorKind::ClosingBraceExpected);
                    break;
                }
                TokenKind::String => {
                    let property = self.parse_property(object);
                    self.cst.node_mut(object).children.push(property);
                    saw_comma = false;
                }
                _ => {
                    self.record(ParseErrorKind::PropertyNameExpected);
                    self.skip_until(&[TokenKind::Comma, TokenKind::CloseBrace]);
                }
            }

            match self.token.kind {
                TokenKind::Comma => {
                    self.next();
                    saw_comma = true;
                }
                TokenKind::CloseBrace | TokenKind::Eof => {}
                _ => self.record(ParseErrorKind::CommaExpected),
            }
        }

        self.finish_node(object);
        object
    }

    fn parse_property(&mut self, object: NodeId) -> NodeId {
        let property = self.push_node(NodeKind::Property, Some(object), None);
        let key_value = Value::String(self.scanner.string_value().to_string());
        let key = self.push_node(NodeKind::String, Some(property), Some(key_value));
        self.cst.node_mut(property).children.push(key);
        self.next();

        if self.token.kind == TokenKind::Colon {
            self.next();
        } else {
            self.record(ParseErrorKind::ColonExpected);
        }

        match self.parse_value(Some(property)) {
            Some(value) => self.cst.node_mut(property).children.push(value),
            None => self.record(ParseErrorKind::ValueExpected),
        }

        self.finish_node(property);
        property
    }

    fn parse_array(&mut self, parent: Option<NodeId>) -> NodeId {
        let array = self.push_node(NodeKind::Array, parent, None);
        self.next();
        let mut saw_comma = false;

        loop {
            match self.token.kind {
                TokenKind::CloseBracket => {
                    if saw_comma {
                        self.record(ParseErrorKind::TrailingComma);
                    }
                    self.next();
                    break;
                }
                TokenKind::Eof => {
                    self.record(ParseErrorKind::ClosingBracketExpected);
                    break;
                }
                _ => match self.parse_value(Some(array)) {
                    Some(element) => {
                        self.cst.node_mut(array).children.push(element);
                        saw_comma = false;
                    }
                    None => {
                        self.record(ParseErrorKind::ValueExpected);
                        self.skip_until(&[TokenKind::Comma, TokenKind::CloseBracket]);
                    }
                },
            }

            match self.token.kind {
                TokenKind::Comma => {
                    self.next();
                    saw_comma = true;
                }
                TokenKind::CloseBracket | TokenKind::Eof => {}
                _ => self.record(ParseErrorKind::CommaExpected),
            }
        }

        self.finish_node(array);
        array
    }
}
