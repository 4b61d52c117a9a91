//! Tokenize manifest source into ordered sections of key/value options,
//! and provide the typed field accessors the descriptor builders use.

use crate::error::Error;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct MnfsTokenizer;

/// One `[header]` section with its options in source order.
#[derive(Debug, Clone)]
pub struct Section {
    /// Header text between the brackets, exactly as written.
    pub header: String,
    options: Vec<(String, String)>,
}

/// A tokenized manifest document: sections in source order.
#[derive(Debug, Clone)]
pub struct Document {
    pub sections: Vec<Section>,
}

/// Split manifest source into sections. Purely lexical: section names and
/// option values are not interpreted here, but in-bracket whitespace and
/// duplicate option names are already rejected.
pub fn tokenize(source: &str) -> Result<Document, Error> {
    let mut pairs = MnfsTokenizer::parse(Rule::document, source)
        .map_err(|e| Error::Syntax(e.to_string()))?;
    let document = pairs
        .next()
        .ok_or_else(|| Error::Syntax("empty parse".to_string()))?;

    let mut sections: Vec<Section> = Vec::new();
    for pair in document.into_inner() {
        match pair.as_rule() {
            Rule::section => {
                let header = pair
                    .into_inner()
                    .next()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                if header != header.trim() {
                    return Err(Error::SectionSpaces { section: header });
                }
                sections.push(Section {
                    header,
                    options: Vec::new(),
                });
            }
            Rule::property => {
                let mut inner = pair.into_inner();
                let name = inner
                    .next()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                let value = inner
                    .next()
                    .map(|p| p.as_str().trim().to_string())
                    .unwrap_or_default();
                let section = sections
                    .last_mut()
                    .ok_or_else(|| Error::OrphanOption {
                        field: name.clone(),
                    })?;
                if section.options.iter().any(|(n, _)| *n == name) {
                    return Err(Error::DuplicateField {
                        field: name,
                        section: section.header.clone(),
                    });
                }
                section.options.push((name, value));
            }
            _ => {}
        }
    }

    Ok(Document { sections })
}

/// Largest value fitting in `width` bytes.
fn width_max(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (8 * width)) - 1
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer.
fn parse_int(text: &str) -> Result<u64, String> {
    let text = text.trim();
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        text.parse::<u64>()
    };
    parsed.map_err(|_| "not a number".to_string())
}

fn check_int(value: u64, width: usize) -> Result<u64, String> {
    let max = width_max(width);
    if value > max {
        return Err(format!("out of range [0:{}]", max));
    }
    Ok(value)
}

impl Section {
    fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the named option exists, without raising.
    pub fn has_option(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    fn require(&self, name: &str) -> Result<&str, Error> {
        self.option(name).ok_or_else(|| Error::MissingField {
            field: name.to_string(),
            section: self.header.clone(),
        })
    }

    /// Integer option constrained to `width` bytes.
    pub fn int_option(&self, name: &str, width: usize) -> Result<u64, Error> {
        let text = self.require(name)?;
        parse_int(text)
            .and_then(|v| check_int(v, width))
            .map_err(|reason| Error::InvalidValue {
                value: text.to_string(),
                field: name.to_string(),
                section: self.header.clone(),
                reason,
            })
    }

    /// String option, at most `max` characters.
    pub fn str_option(&self, name: &str, max: usize) -> Result<&str, Error> {
        let text = self.require(name)?;
        if text.chars().count() > max {
            return Err(Error::StringTooLong {
                value: text.to_string(),
                field: name.to_string(),
                section: self.header.clone(),
                max,
            });
        }
        Ok(text)
    }

    /// Bracketed integer-array option: `<int int ...>`, total text at most
    /// `max` characters, each element constrained to `elem_width` bytes.
    pub fn array_option(
        &self,
        name: &str,
        max: usize,
        elem_width: usize,
    ) -> Result<Vec<u64>, Error> {
        let text = self.require(name)?;
        if text.chars().count() > max {
            return Err(Error::StringTooLong {
                value: text.to_string(),
                field: name.to_string(),
                section: self.header.clone(),
                max,
            });
        }
        let inner = text
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .ok_or_else(|| Error::MalformedArray {
                value: text.to_string(),
                field: name.to_string(),
                section: self.header.clone(),
            })?;
        let mut values = Vec::new();
        for token in inner.split_whitespace() {
            let value = parse_int(token)
                .and_then(|v| check_int(v, elem_width))
                .map_err(|reason| Error::InvalidValue {
                    value: token.to_string(),
                    field: name.to_string(),
                    section: self.header.clone(),
                    reason,
                })?;
            values.push(value);
        }
        Ok(values)
    }

    /// Id token of a `"<kind> <id>"` header: second whitespace-separated
    /// token, optionally double-quoted, decimal or hex, `width` bytes.
    pub fn id(&self, width: usize) -> Result<u64, Error> {
        let token = self
            .header
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| Error::MissingId {
                section: self.header.clone(),
            })?;
        let token = token.trim_matches('"');
        parse_int(token)
            .and_then(|v| check_int(v, width))
            .map_err(|reason| Error::InvalidId {
                section: self.header.clone(),
                reason,
            })
    }
}
