//! Lexical analysis of command namespaces.
//!
//! A namespace is a sequence of words separated by single whitespace
//! characters, whitespace meaning anything `char::is_whitespace` accepts. A
//! word wrapped in angle brackets is an argument, any other word is a
//! literal:
//!
//! ```text
//! "tp <player> here"  →  [tp, <player>, here]
//! ```
//!
//! # Design
//!
//! - `Lexeme`: logos token for words and separators
//! - `Token`: a lexed identity with its byte span and aliases
//! - `Lexer`: memoizes namespaces; one instance lives in each `Environment`
//!
//! Lexing never stops at the first problem; every error in a namespace is
//! returned together.
//!
//! # Examples
//!
//! ```
//! # use typist::lexer::Lexer;
//! # use typist::foundation::Identity;
//! let mut lexer = Lexer::new();
//! let tokens = lexer.lex("a <b> c").unwrap();
//! let identities: Vec<_> = tokens.iter().map(|t| t.identity.clone()).collect();
//!
//! assert_eq!(
//!     identities,
//!     vec![Identity::literal("a"), Identity::argument("b"), Identity::literal("c")]
//! );
//! ```

use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use indexmap::IndexSet;
use logos::Logos;
use thiserror::Error;
use tracing::trace;

use crate::foundation::{Identity, Kind};

/// Raw namespace lexeme.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme<'s> {
    /// A single separator; runs of separators leave empty tokens between them.
    /// Any Unicode whitespace separates, matching `char::is_whitespace`.
    #[regex(r"\s")]
    Separator,

    #[regex(r"[^\s]+", |lex| lex.slice())]
    Word(&'s str),
}

/// A lexed namespace segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub identity: Identity,
    /// Byte range of the word inside the namespace
    pub span: Range<usize>,
    /// Alternate names; only ever set on the final literal of a `Literal` declaration
    pub aliases: IndexSet<String>,
}

impl Token {
    fn new(identity: Identity, span: Range<usize>) -> Self {
        Self {
            identity,
            span,
            aliases: IndexSet::new(),
        }
    }
}

/// Malformed namespace syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("namespace should not be blank")]
    Blank,

    #[error("namespace contains an empty token")]
    EmptyToken { at: usize },

    #[error("\"{word}\" contains an unmatched \"<\"")]
    UnmatchedOpen { word: String, span: Range<usize> },

    #[error("\"{word}\" contains an unmatched \">\"")]
    UnmatchedClose { word: String, span: Range<usize> },

    #[error("argument name in \"{word}\" should not be empty")]
    EmptyArgument { word: String, span: Range<usize> },

    #[error("\"{word}\" contains an angle bracket inside its name")]
    StrayBracket { word: String, span: Range<usize> },

    #[error("\"{word}\" is an argument and cannot have aliases")]
    AliasedArgument { word: String, span: Range<usize> },

    #[error("segment \"{segment}\" should be a single word")]
    CompoundSegment { segment: String, span: Range<usize> },

    #[error("alias \"{alias}\" should be a single literal")]
    InvalidAlias { alias: String },

    #[error("alias \"{alias}\" is declared more than once for \"{name}\"")]
    DuplicateAlias { alias: String, name: String },
}

impl LexError {
    /// Byte range of the namespace this error points at, when it has one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::Blank | Self::InvalidAlias { .. } | Self::DuplicateAlias { .. } => None,
            Self::EmptyToken { at } => Some(*at..*at),
            Self::UnmatchedOpen { span, .. }
            | Self::UnmatchedClose { span, .. }
            | Self::EmptyArgument { span, .. }
            | Self::StrayBracket { span, .. }
            | Self::AliasedArgument { span, .. }
            | Self::CompoundSegment { span, .. } => Some(span.clone()),
        }
    }
}

/// Namespace lexer with a memo cache.
///
/// The same path text shows up on many bindings, so successfully lexed
/// namespaces are cached and handed out as shared slices. Failed namespaces
/// are lexed again each time so that every occurrence is reported.
#[derive(Debug, Default)]
pub struct Lexer {
    memo: HashMap<String, Rc<[Token]>>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexes a namespace, reusing the cached result for identical text.
    pub fn lex(&mut self, namespace: &str) -> Result<Rc<[Token]>, Vec<LexError>> {
        if let Some(tokens) = self.memo.get(namespace) {
            trace!(namespace, "namespace memoized");
            return Ok(Rc::clone(tokens));
        }

        let tokens: Rc<[Token]> = tokenize(namespace)?.into();
        self.memo.insert(namespace.to_owned(), Rc::clone(&tokens));
        Ok(tokens)
    }

    /// Lexes a namespace whose final word is a literal carrying `aliases`.
    pub fn lex_aliased(
        &mut self,
        namespace: &str,
        aliases: &[String],
    ) -> Result<Vec<Token>, Vec<LexError>> {
        let lexed = self.lex(namespace);
        if aliases.is_empty() {
            return lexed.map(|tokens| tokens.to_vec());
        }

        let mut errors = Vec::new();
        let mut tokens = match lexed {
            Ok(tokens) => tokens.to_vec(),
            Err(mut e) => {
                errors.append(&mut e);
                Vec::new()
            }
        };

        let mut accepted = IndexSet::new();
        let primary = tokens.last().map(|t| t.identity.name.clone());
        for alias in aliases {
            match classify(alias, 0..alias.len()) {
                Ok(identity) if identity.is_literal() && is_single_word(alias) => {
                    if primary.as_deref() == Some(alias.as_str()) || !accepted.insert(alias.clone()) {
                        errors.push(LexError::DuplicateAlias {
                            alias: alias.clone(),
                            name: primary.clone().unwrap_or_default(),
                        });
                    }
                }
                _ => errors.push(LexError::InvalidAlias {
                    alias: alias.clone(),
                }),
            }
        }

        if let Some(last) = tokens.last_mut() {
            if last.identity.is_argument() {
                errors.push(LexError::AliasedArgument {
                    word: last.identity.to_string(),
                    span: last.span.clone(),
                });
            }
            last.aliases = accepted;
        }

        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors)
        }
    }

    /// Number of memoized namespaces.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

/// Lexes a namespace without memoization.
pub fn tokenize(namespace: &str) -> Result<Vec<Token>, Vec<LexError>> {
    if namespace.trim().is_empty() {
        return Err(vec![LexError::Blank]);
    }

    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    // A separator is only valid right after a word
    let mut expecting_word = true;

    for (lexeme, span) in Lexeme::lexer(namespace).spanned() {
        match lexeme {
            Ok(Lexeme::Word(word)) => {
                match classify(word, span.clone()) {
                    Ok(identity) => tokens.push(Token::new(identity, span)),
                    Err(error) => errors.push(error),
                }
                expecting_word = false;
            }
            Ok(Lexeme::Separator) => {
                if expecting_word {
                    errors.push(LexError::EmptyToken { at: span.start });
                }
                expecting_word = true;
            }
            // Separator and word patterns cover every character
            Err(()) => errors.push(LexError::StrayBracket {
                word: namespace[span.clone()].to_owned(),
                span,
            }),
        }
    }

    if expecting_word {
        errors.push(LexError::EmptyToken {
            at: namespace.len(),
        });
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Joins namespace segments into namespace text.
///
/// Each segment names one tree position, so a segment containing whitespace
/// is an error rather than an extra level.
pub fn join(segments: &[String]) -> Result<String, Vec<LexError>> {
    let text = segments.join(" ");
    let mut errors = Vec::new();
    let mut start = 0;

    for segment in segments {
        if segment.contains(char::is_whitespace) {
            errors.push(LexError::CompoundSegment {
                segment: segment.clone(),
                span: start..start + segment.len(),
            });
        }
        start += segment.len() + 1;
    }

    if errors.is_empty() {
        Ok(text)
    } else {
        Err(errors)
    }
}

/// Classifies one whitespace-free word.
fn classify(word: &str, span: Range<usize>) -> Result<Identity, LexError> {
    let opens = word.starts_with('<');
    let closes = word.len() > 1 && word.ends_with('>');

    let (kind, name) = match (opens, closes) {
        (true, true) => (Kind::Argument, &word[1..word.len() - 1]),
        (true, false) => {
            return Err(LexError::UnmatchedOpen {
                word: word.to_owned(),
                span,
            })
        }
        (false, _) if word.ends_with('>') && !word.contains('<') => {
            return Err(LexError::UnmatchedClose {
                word: word.to_owned(),
                span,
            })
        }
        (false, _) => (Kind::Literal, word),
    };

    if kind == Kind::Argument && name.is_empty() {
        return Err(LexError::EmptyArgument {
            word: word.to_owned(),
            span,
        });
    }

    if name.contains(['<', '>']) {
        return Err(LexError::StrayBracket {
            word: word.to_owned(),
            span,
        });
    }

    Ok(Identity::new(kind, name))
}

fn is_single_word(word: &str) -> bool {
    !word.is_empty() && !word.contains(char::is_whitespace)
}
