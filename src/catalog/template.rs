//! Declaration templates.
//!
//! A template is an ordered list of literal segments and placeholders from
//! the closed set `@NAME@`, `@VALUE@`, `@CONST@`, evaluated by straight
//! substitution. There is no escaping and no expression syntax; text that
//! is not one of the three placeholders passes through verbatim.
//!
//! `@CONST@` owns a single following space, so the empty expansion used
//! for mutable declarations does not leave a doubled space behind.

use super::{EmittedKind, PrimType};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Name,
    Value,
    Const,
}

/// A parsed declaration template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text into segments.
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("@NAME@") {
                flush_literal(&mut segments, &mut literal);
                segments.push(Segment::Name);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("@VALUE@") {
                flush_literal(&mut segments, &mut literal);
                segments.push(Segment::Value);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("@CONST@") {
                flush_literal(&mut segments, &mut literal);
                segments.push(Segment::Const);
                rest = tail.strip_prefix(' ').unwrap_or(tail);
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    literal.push(c);
                }
                rest = chars.as_str();
            }
        }
        flush_literal(&mut segments, &mut literal);

        Self { segments }
    }

    /// A template that emits nothing.
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Substitute the placeholders. With `constness` false, `@CONST@` and
    /// its owned space expand to nothing.
    pub fn render(&self, name: &str, value: &str, constness: bool) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Name => out.push_str(name),
                Segment::Value => out.push_str(value),
                Segment::Const => {
                    if constness {
                        out.push_str("const ");
                    }
                }
            }
        }
        out
    }
}

fn flush_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

/// Default header template for an emitted kind.
pub fn default_header(kind: EmittedKind) -> Template {
    match kind {
        EmittedKind::Macro => Template::parse("#define @NAME@ @VALUE@"),
        EmittedKind::Const(ty) => {
            Template::parse(&format!("extern @CONST@ {};", declarator(ty)))
        }
        EmittedKind::Var(ty) => Template::parse(&format!("extern {};", declarator(ty))),
    }
}

/// Default source template for an emitted kind. Macros are fully defined
/// in the header and emit nothing here.
pub fn default_source(kind: EmittedKind) -> Template {
    match kind {
        EmittedKind::Macro => Template::empty(),
        EmittedKind::Const(ty) => {
            Template::parse(&format!("@CONST@ {} = @VALUE@;", declarator(ty)))
        }
        EmittedKind::Var(ty) => Template::parse(&format!("{} = @VALUE@;", declarator(ty))),
    }
}

fn declarator(ty: PrimType) -> String {
    ty.declarator("@NAME@")
}
