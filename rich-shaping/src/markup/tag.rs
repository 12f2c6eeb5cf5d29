//! The markup tag vocabulary and a parser for single tags

use crate::classify::{extend_hash_ascii, hash_ascii_case_insensitive, hash_case_insensitive};

/// A recognized markup tag.
///
/// Tags are identified by the case-insensitive hash of their name, so
/// `<B>` and `<b>` are the same tag. Each tag also has a closing form, the
/// name prefixed with `/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkupTag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Mark,
    Superscript,
    Subscript,
    Lowercase,
    Uppercase,
    AllCaps,
    SmallCaps,
    Color,
    Size,
    FontWeight,
    VerticalOffset,
    Indent,
    Align,
    Link,
}

const CLOSING_PREFIX_HASH: i32 = hash_ascii_case_insensitive(b"/");

// (opening hash, closing hash) for each entry in `MarkupTag::ALL`
const TAG_HASHES: [(i32, i32); MarkupTag::ALL.len()] = {
    let mut table = [(0, 0); MarkupTag::ALL.len()];
    let mut i = 0;
    while i < table.len() {
        let tag = MarkupTag::ALL[i];
        table[i] = (tag.hash(), tag.closing_hash());
        i += 1;
    }
    table
};

impl MarkupTag {
    pub const ALL: [MarkupTag; 18] = [
        MarkupTag::Bold,
        MarkupTag::Italic,
        MarkupTag::Underline,
        MarkupTag::Strikethrough,
        MarkupTag::Mark,
        MarkupTag::Superscript,
        MarkupTag::Subscript,
        MarkupTag::Lowercase,
        MarkupTag::Uppercase,
        MarkupTag::AllCaps,
        MarkupTag::SmallCaps,
        MarkupTag::Color,
        MarkupTag::Size,
        MarkupTag::FontWeight,
        MarkupTag::VerticalOffset,
        MarkupTag::Indent,
        MarkupTag::Align,
        MarkupTag::Link,
    ];

    /// The tag name as written in markup.
    pub const fn name(self) -> &'static str {
        match self {
            MarkupTag::Bold => "b",
            MarkupTag::Italic => "i",
            MarkupTag::Underline => "u",
            MarkupTag::Strikethrough => "s",
            MarkupTag::Mark => "mark",
            MarkupTag::Superscript => "sup",
            MarkupTag::Subscript => "sub",
            MarkupTag::Lowercase => "lowercase",
            MarkupTag::Uppercase => "uppercase",
            MarkupTag::AllCaps => "allcaps",
            MarkupTag::SmallCaps => "smallcaps",
            MarkupTag::Color => "color",
            MarkupTag::Size => "size",
            MarkupTag::FontWeight => "font-weight",
            MarkupTag::VerticalOffset => "voffset",
            MarkupTag::Indent => "indent",
            MarkupTag::Align => "align",
            MarkupTag::Link => "link",
        }
    }

    /// The hash of the opening tag name.
    pub const fn hash(self) -> i32 {
        hash_ascii_case_insensitive(self.name().as_bytes())
    }

    /// The hash of the closing tag name, e.g. `/b`.
    pub const fn closing_hash(self) -> i32 {
        extend_hash_ascii(CLOSING_PREFIX_HASH, self.name().as_bytes())
    }

    /// Resolve a name hash to a tag, and whether it is the closing form.
    pub fn from_hash(hash: i32) -> Option<(MarkupTag, bool)> {
        MarkupTag::ALL
            .iter()
            .zip(TAG_HASHES.iter())
            .find_map(|(tag, (open, close))| {
                if hash == *open {
                    Some((*tag, false))
                } else if hash == *close {
                    Some((*tag, true))
                } else {
                    None
                }
            })
    }

    /// Resolve a tag name such as `"B"` or `"/size"`.
    pub fn from_name(name: &str) -> Option<(MarkupTag, bool)> {
        Self::from_hash(hash_case_insensitive(name))
    }
}

/// A parsed markup tag: `<name=value attr=value ...>`.
///
/// Values are borrowed from the tag body with surrounding quotes removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupElement<'a> {
    pub tag: MarkupTag,
    pub closing: bool,
    pub value: Option<&'a str>,
    attributes: Vec<(&'a str, &'a str)>,
}

impl<'a> MarkupElement<'a> {
    /// An opening tag with no value or attributes.
    pub fn open(tag: MarkupTag) -> Self {
        MarkupElement {
            tag,
            closing: false,
            value: None,
            attributes: Vec::new(),
        }
    }

    /// An opening tag with a value.
    pub fn with_value(tag: MarkupTag, value: &'a str) -> Self {
        MarkupElement {
            value: Some(value),
            ..Self::open(tag)
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: &'a str, value: &'a str) -> Self {
        self.attributes.push((name, value));
        self
    }

    /// Parse the text between `<` and `>`.
    ///
    /// Returns `None` for unknown tags and malformed input; such tags are
    /// expected to be rendered as plain text. A body starting with `#` is
    /// shorthand for a color tag, so `<#ff0000>` is `<color=#ff0000>`.
    pub fn parse(body: &'a str) -> Option<Self> {
        let body = body.trim();
        if body.starts_with('#') {
            return Some(Self::with_value(MarkupTag::Color, body));
        }

        let mut tokens = Tokens { rest: body };
        let (name, value) = split_assignment(tokens.next()?);
        let (tag, closing) = MarkupTag::from_name(name)?;
        let mut attributes = Vec::new();
        for token in tokens {
            match split_assignment(token) {
                (name, Some(value)) if !name.is_empty() => attributes.push((name, value)),
                _ => return None,
            }
        }
        Some(MarkupElement {
            tag,
            closing,
            value,
            attributes,
        })
    }

    /// The value of the attribute `name`, compared case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        let hash = hash_case_insensitive(name);
        self.attributes
            .iter()
            .find(|(attr, _)| hash_case_insensitive(attr) == hash)
            .map(|(_, value)| *value)
    }

    pub fn attributes(&self) -> &[(&'a str, &'a str)] {
        &self.attributes
    }
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

fn split_assignment(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((name, value)) => (name.trim(), Some(strip_quotes(value.trim()))),
        None => (token, None),
    }
}

/// Splits a tag body on whitespace, except inside quotes.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }
        let mut quote = None;
        let end = rest
            .char_indices()
            .find(|(_, c)| match quote {
                Some(q) if *c == q => {
                    quote = None;
                    false
                }
                Some(_) => false,
                None if *c == '"' || *c == '\'' => {
                    quote = Some(*c);
                    false
                }
                None => c.is_whitespace(),
            })
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (token, rest) = rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_hashes() {
        assert_eq!(MarkupTag::Bold.hash(), 66);
        assert_eq!(MarkupTag::Bold.closing_hash(), 1613);
        assert_eq!(MarkupTag::Size.closing_hash(), hash_case_insensitive("/size"));
    }

    #[test]
    fn hashes_are_unique() {
        let mut all: Vec<i32> = TAG_HASHES.iter().flat_map(|(a, b)| [*a, *b]).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), MarkupTag::ALL.len() * 2);
    }

    #[test]
    fn lookup_by_name() {
        for tag in MarkupTag::ALL {
            assert_eq!(MarkupTag::from_name(tag.name()), Some((tag, false)));
            let closing = format!("/{}", tag.name().to_uppercase());
            assert_eq!(MarkupTag::from_name(&closing), Some((tag, true)));
        }
        assert_eq!(MarkupTag::from_name("blink"), None);
    }

    #[test]
    fn parse_simple() {
        let el = MarkupElement::parse("B").unwrap();
        assert_eq!(el, MarkupElement::open(MarkupTag::Bold));
        let el = MarkupElement::parse("/size").unwrap();
        assert_eq!(el.tag, MarkupTag::Size);
        assert!(el.closing);
        assert_eq!(el.value, None);
    }

    #[test]
    fn parse_values_and_attributes() {
        let el = MarkupElement::parse("color=#ff0000").unwrap();
        assert_eq!(el, MarkupElement::with_value(MarkupTag::Color, "#ff0000"));

        let el = MarkupElement::parse("u color=#00f").unwrap();
        assert_eq!(el.tag, MarkupTag::Underline);
        assert_eq!(el.value, None);
        assert_eq!(el.attribute("COLOR"), Some("#00f"));
        assert_eq!(el.attribute("angle"), None);

        let el = MarkupElement::parse(r#"link="my link" color='red'"#).unwrap();
        assert_eq!(el.value, Some("my link"));
        assert_eq!(el.attributes(), &[("color", "red")]);

        let el = MarkupElement::parse("#80ff").unwrap();
        assert_eq!(el, MarkupElement::with_value(MarkupTag::Color, "#80ff"));
    }

    #[test]
    fn parse_rejects() {
        assert_eq!(MarkupElement::parse(""), None);
        assert_eq!(MarkupElement::parse("blink"), None);
        assert_eq!(MarkupElement::parse("b junk"), None);
        assert_eq!(MarkupElement::parse("i =5"), None);
    }
}
