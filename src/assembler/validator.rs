//! The Validator module takes the token stream from the lexer and walks
//! it once, left to right, enforcing the structural rules for section
//! declarations, memory constants, and labels. It stops at the first
//! violation; there is no recovery and no second diagnostic.

use super::error::AsmError;
use super::lexer::{Token, TokenKind};

/// Which declared section is currently active.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Section {
    Data,
    Code,
}

/// Everything one validation run tracks: the first declaration token of
/// each section (kept for diagnostics) and the active section, `None`
/// until the first declaration. A fresh value per run; nothing is shared
/// between runs.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct SectionState {
    pub data_section: Option<Token>,
    pub code_section: Option<Token>,
    pub active: Option<Section>,
}

pub struct Validator<'a> {
    src: &'a [u8],
    tokens: &'a [Token],
    pos: usize,
    state: SectionState,
}

impl<'a> Validator<'a> {
    pub fn new(src: &'a [u8], tokens: &'a [Token]) -> Self {
        Validator {
            src,
            tokens,
            pos: 0,
            state: SectionState::default(),
        }
    }

    /// Run the validator, consuming it. Returns the final section state
    /// on success so the caller can report what was declared.
    pub fn run(mut self) -> Result<SectionState, AsmError> {
        while self.pos < self.tokens.len() {
            match self.tokens[self.pos].kind {
                TokenKind::Section => self.section_declaration()?,
                TokenKind::Symbol(b'@') => self.memory_constant()?,
                TokenKind::Symbol(b':') => self.label(),
                // No rule for any other tag; pass through.
                _ => {}
            }
            self.pos += 1;
        }

        Ok(self.state)
    }

    /// Bounds-checked lookahead; `peek(0)` is the current token. Returns
    /// `None` past the end of the stream instead of reading through it.
    fn peek(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    fn text(&self, token: &Token) -> String {
        token.text(self.src).into_owned()
    }

    /// A `section` keyword must be followed by the `data` or `code`
    /// keyword, and each of those may be declared at most once.
    fn section_declaration(&mut self) -> Result<(), AsmError> {
        let keyword = self.tokens[self.pos];
        let identifier = match self.peek(1) {
            Some(token) => token,
            None => {
                return Err(AsmError::UnexpectedEndOfStream {
                    expected: "a 'data' or 'code' section identifier",
                    at: keyword.range(),
                })
            }
        };

        match identifier.kind {
            TokenKind::Data => {
                if let Some(first) = self.state.data_section {
                    return Err(duplicate_section("data", &first, identifier));
                }
                self.state.data_section = Some(*identifier);
                self.state.active = Some(Section::Data);
                Ok(())
            }
            TokenKind::Code => {
                if let Some(first) = self.state.code_section {
                    return Err(duplicate_section("code", &first, identifier));
                }
                self.state.code_section = Some(*identifier);
                self.state.active = Some(Section::Code);
                Ok(())
            }
            _ => Err(AsmError::UnexpectedSectionIdentifier {
                text: self.text(identifier),
                at: identifier.range(),
            }),
        }
    }

    /// `@name value` declares a memory constant. The shape is enforced
    /// only inside a data section: an identifier must follow the `@`, and
    /// a numeric literal must follow the identifier.
    fn memory_constant(&mut self) -> Result<(), AsmError> {
        match self.state.active {
            Some(Section::Data) => {
                let marker = self.tokens[self.pos];

                let name = match self.peek(1) {
                    Some(token) => token,
                    None => {
                        return Err(AsmError::UnexpectedEndOfStream {
                            expected: "an Identifier naming the memory constant",
                            at: marker.range(),
                        })
                    }
                };
                if name.kind != TokenKind::Identifier {
                    return Err(AsmError::UnexpectedTokenAfterMemoryConstant {
                        constant: String::new(),
                        expected: "Identifier",
                        actual: name.kind.name(),
                        text: self.text(name),
                        at: name.range(),
                    });
                }

                let value = match self.peek(2) {
                    Some(token) => token,
                    None => {
                        return Err(AsmError::UnexpectedEndOfStream {
                            expected: "a Numeric value for the memory constant",
                            at: name.range(),
                        })
                    }
                };
                if !value.kind.is_numeric() {
                    return Err(AsmError::UnexpectedTokenAfterMemoryConstant {
                        constant: self.text(name),
                        expected: "Numeric",
                        actual: value.kind.name(),
                        text: self.text(value),
                        at: value.range(),
                    });
                }

                Ok(())
            }
            // '@' inside a code section has no specified shape yet; the
            // branch is intentionally empty until one exists.
            Some(Section::Code) => Ok(()),
            None => Ok(()),
        }
    }

    /// `name:` marks a label. The preceding token is the label name;
    /// nothing further is enforced here, resolution belongs to a later
    /// stage.
    fn label(&self) {
        if self.pos > 0 {
            let name = &self.tokens[self.pos - 1];
            debug!(
                "label '{}' on line {} (resolution deferred)",
                name.text(self.src),
                name.line
            );
        }
    }
}

fn duplicate_section(section: &'static str, first: &Token, duplicate: &Token) -> AsmError {
    AsmError::DuplicateSectionDeclaration {
        section,
        first: first.range(),
        at: duplicate.range(),
    }
}
