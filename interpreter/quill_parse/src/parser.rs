//! Recursive-descent parser producing the generic parse tree.

use quill_ast::{ParseNode, ROOT_TAG};

use crate::lexer::{lex, Lexeme, Token};
use crate::ParseError;

/// Parse a whole source string into a tree rooted at a [`ROOT_TAG`] node.
pub fn parse(source: &str) -> Result<ParseNode, ParseError> {
    let lexemes = lex(source)?;
    let mut parser = Parser {
        lexemes: &lexemes,
        pos: 0,
    };
    let children = parser.parse_exprs(None)?;
    Ok(ParseNode::branch(ROOT_TAG, children))
}

struct Parser<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Lexeme> {
        let lexeme = self.lexemes.get(self.pos);
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    /// Parse expressions until the given closer (or end of input for
    /// the root). Returns the children, closer token included, so the
    /// bracket tokens stay visible in the tree for the reader to skip.
    fn parse_exprs(&mut self, closer: Option<Token>) -> Result<Vec<ParseNode>, ParseError> {
        let mut children = Vec::new();
        loop {
            let Some(next) = self.peek() else {
                return match closer {
                    None => Ok(children),
                    Some(Token::RParen) => Err(ParseError::UnclosedDelimiter {
                        open: '(',
                        expected: ')',
                    }),
                    Some(_) => Err(ParseError::UnclosedDelimiter {
                        open: '{',
                        expected: '}',
                    }),
                };
            };
            match next.token {
                t @ (Token::RParen | Token::RBrace) => {
                    let found = if t == Token::RParen { ')' } else { '}' };
                    let offset = next.offset;
                    return match closer {
                        Some(expected) if expected == t => {
                            children.push(bracket_node(found));
                            self.pos += 1;
                            Ok(children)
                        }
                        Some(Token::RParen) => Err(ParseError::MismatchedClose {
                            open: '(',
                            found,
                            offset,
                        }),
                        Some(_) => Err(ParseError::MismatchedClose {
                            open: '{',
                            found,
                            offset,
                        }),
                        None => Err(ParseError::UnexpectedClose { found, offset }),
                    };
                }
                _ => children.push(self.parse_expr()?),
            }
        }
    }

    fn parse_expr(&mut self) -> Result<ParseNode, ParseError> {
        let lexeme = self
            .bump()
            .cloned()
            .unwrap_or_else(|| unreachable!("parse_expr called at end of input"));
        match lexeme.token {
            Token::Int => Ok(ParseNode::leaf("expr|integer", lexeme.text)),
            Token::Decimal => Ok(ParseNode::leaf("expr|decimal", lexeme.text)),
            Token::Str => Ok(ParseNode::leaf("expr|string", lexeme.text)),
            Token::Comment => Ok(ParseNode::leaf("expr|comment", lexeme.text)),
            Token::Symbol => Ok(ParseNode::leaf("expr|symbol", lexeme.text)),
            Token::LParen => {
                let mut children = vec![bracket_node('(')];
                children.extend(self.parse_exprs(Some(Token::RParen))?);
                Ok(ParseNode::branch("expr|sexpr", children))
            }
            Token::LBrace => {
                let mut children = vec![bracket_node('{')];
                children.extend(self.parse_exprs(Some(Token::RBrace))?);
                Ok(ParseNode::branch("expr|qexpr", children))
            }
            Token::RParen | Token::RBrace => {
                unreachable!("closers are handled by parse_exprs")
            }
        }
    }
}

fn bracket_node(c: char) -> ParseNode {
    ParseNode::leaf("char", c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_flat_expression() {
        let root = parse("+ 1 2").unwrap();
        assert!(root.is_root());
        let tags: Vec<&str> = root.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["expr|symbol", "expr|integer", "expr|integer"]);
    }

    #[test]
    fn parse_nested_sexpr() {
        let root = parse("(+ 1 (* 2 3))").unwrap();
        let sexpr = &root.children[0];
        assert!(sexpr.tag_contains("sexpr"));
        // '(' sym int sexpr ')'
        assert_eq!(sexpr.children.len(), 5);
        assert_eq!(sexpr.children[0].contents, "(");
        assert_eq!(sexpr.children[4].contents, ")");
        assert!(sexpr.children[3].tag_contains("sexpr"));
    }

    #[test]
    fn parse_qexpr_keeps_braces_as_children() {
        let root = parse("{head tail}").unwrap();
        let qexpr = &root.children[0];
        assert!(qexpr.tag_contains("qexpr"));
        assert_eq!(qexpr.children[0].contents, "{");
        assert_eq!(qexpr.children.last().unwrap().contents, "}");
    }

    #[test]
    fn parse_comment_node() {
        let root = parse("1 ; the loneliest number").unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(root.children[1].tag_contains("comment"));
    }

    #[test]
    fn parse_unclosed_sexpr_is_an_error() {
        assert_eq!(
            parse("(+ 1 2"),
            Err(ParseError::UnclosedDelimiter {
                open: '(',
                expected: ')',
            })
        );
    }

    #[test]
    fn parse_stray_closer_is_an_error() {
        assert!(matches!(
            parse("} 1"),
            Err(ParseError::UnexpectedClose { found: '}', .. })
        ));
    }

    #[test]
    fn parse_mismatched_closer_is_an_error() {
        assert!(matches!(
            parse("(1 2}"),
            Err(ParseError::MismatchedClose { .. })
        ));
    }
}
