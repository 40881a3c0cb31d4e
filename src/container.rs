//! Fenced `:::` containers: options, parameter grammar and attribute
//! decoration.
//!
//! The text after the opening marker run is accepted in one of two forms:
//!
//! - a bare name, `::: warning`, which becomes a class;
//! - a braced attribute list, `::: {.a .b #id key="value"}`.
//!
//! Either form may be followed by a re-stated marker run (`::: note :::`).
//! Anything else means the line is not a container fence.
//!
//! Recognition only calls [`validate`]. The attributes are extracted later,
//! at render time, by [`decorate`] from the token's frozen `info` string.
//! Both go through the same scanner, so a string that validates as one form
//! is always applied as that form.

use crate::block::{Attrs, BlockParser, RulerError, Token, TokenKind};

/// Marker byte used when none is configured.
pub const DEFAULT_MARKER: u8 = b':';

/// Minimum marker run used when none is configured.
pub const DEFAULT_MIN_MARKERS: usize = 3;

/// Marker bytes already claimed by other block rules.
const RESERVED_MARKERS: &[u8] = b"`~>#*-+_\\";

/// Errors from building [`ContainerOptions`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    /// The marker is not ASCII punctuation, or another block rule uses it.
    #[error("`{0}` cannot be used as a container marker")]
    InvalidMarker(char),
    /// A fence needs at least one marker character.
    #[error("container fences need at least one marker")]
    ZeroMinMarkers,
}

/// Marker configuration of the container rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerOptions {
    marker: u8,
    min_markers: usize,
}

impl ContainerOptions {
    /// Validate and build options.
    ///
    /// # Example
    /// ```
    /// use fencemark::container::{ContainerOptions, OptionsError};
    ///
    /// let opts = ContainerOptions::new('!', 2).unwrap();
    /// assert_eq!(opts.marker(), b'!');
    /// assert_eq!(ContainerOptions::new('-', 3), Err(OptionsError::InvalidMarker('-')));
    /// ```
    pub fn new(marker: char, min_markers: usize) -> Result<Self, OptionsError> {
        if !marker.is_ascii_punctuation() || RESERVED_MARKERS.contains(&(marker as u8)) {
            return Err(OptionsError::InvalidMarker(marker));
        }
        if min_markers == 0 {
            return Err(OptionsError::ZeroMinMarkers);
        }
        Ok(Self {
            marker: marker as u8,
            min_markers,
        })
    }

    /// Fence marker byte.
    #[inline]
    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Shortest run that opens a container.
    #[inline]
    pub fn min_markers(&self) -> usize {
        self.min_markers
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            min_markers: DEFAULT_MIN_MARKERS,
        }
    }
}

/// Add the container rule to a parser built without it.
///
/// The rule goes right before `fence` and joins the `paragraph`,
/// `reference`, `blockquote` and `list` chains. Registering twice is a no-op.
pub fn register(parser: &mut BlockParser) -> Result<(), RulerError> {
    let ruler = parser.ruler_mut();
    if ruler.contains("container") {
        return ruler.enable("container");
    }
    ruler.before(
        "fence",
        "container",
        crate::block::rules::container,
        crate::block::FENCE_ALT,
    )
}

/// One attribute from a braced attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute<'a> {
    /// `.name`
    Class(&'a str),
    /// `#name`
    Id(&'a str),
    /// `name="value"`
    KeyValue(&'a str, &'a str),
}

/// Which grammar a parameter string matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A single identifier.
    Name,
    /// A braced attribute list.
    AttributeList,
}

/// Check whether `params` (the text after the opening marker run) makes
/// the line a container fence.
pub fn validate(params: &str, marker: char) -> bool {
    classify(params, marker).is_some()
}

/// Grammar `params` matches, if any.
pub fn classify(params: &str, marker: char) -> Option<ParamKind> {
    if bare_name(params, marker).is_some() {
        return Some(ParamKind::Name);
    }
    is_attribute_list(params, marker).then_some(ParamKind::AttributeList)
}

/// The identifier of a bare-name parameter string.
///
/// Grammar: `ws* name ws* marker* ws*`, anchored at both ends.
pub fn bare_name(params: &str, marker: char) -> Option<&str> {
    let mut s = Scanner::new(params);
    s.skip_ws();
    let name = s.name()?;
    s.marker_tail(marker).then_some(name)
}

/// Grammar: `ws* "{" ws* (attr ws*)+ "}" ws* marker* ws*`.
fn is_attribute_list(params: &str, marker: char) -> bool {
    let mut s = Scanner::new(params);
    s.skip_ws();
    if !s.eat('{') {
        return false;
    }

    let mut count = 0;
    loop {
        s.skip_ws();
        let Some(attribute) = s.attribute() else {
            break;
        };
        count += 1;
        // `.foobar="x"` reads as `.fooba` followed by `r="x"`.
        if let Attribute::Class(name) | Attribute::Id(name) = attribute {
            if s.rest().starts_with("=\"") && !(has_key_suffix(name) && s.skip_quoted_value()) {
                return false;
            }
        }
    }

    count > 0 && s.eat('}') && s.marker_tail(marker)
}

/// Whether some character after the first can start the key of a
/// `key="value"` pair split off the end of `name`.
fn has_key_suffix(name: &str) -> bool {
    name.chars().skip(1).any(is_name_start)
}

/// Iterate over the attributes of a braced list.
///
/// Scanning starts after the opening `{` and stops silently at the closing
/// brace or at the first fragment that is not an attribute. Yields nothing
/// if `params` has no opening brace.
///
/// A `.class` or `#id` directly followed by `="value"` is yielded whole and
/// the quoted tail is skipped, so `{.foobar="x"}` yields `Class("foobar")`.
pub fn attributes(params: &str) -> Attributes<'_> {
    let mut scanner = Scanner::new(params);
    scanner.skip_ws();
    if !scanner.eat('{') {
        scanner.pos = params.len();
    }
    Attributes { scanner }
}

/// Iterator returned by [`attributes`].
pub struct Attributes<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Iterator for Attributes<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Attribute<'a>> {
        self.scanner.skip_ws();
        let attribute = self.scanner.attribute()?;
        if matches!(attribute, Attribute::Class(_) | Attribute::Id(_)) {
            self.scanner.skip_quoted_value();
        }
        Some(attribute)
    }
}

/// Apply the attributes described by `params` to `attrs`.
///
/// - a bare name is joined onto `class`;
/// - `.name` is joined onto `class`, with the first `.` inside the name
///   turned into a space;
/// - `#name` replaces any earlier `id`;
/// - `name="value"` is appended, duplicates included.
pub fn apply(params: &str, marker: char, attrs: &mut Attrs) {
    if let Some(name) = bare_name(params, marker) {
        attrs.join("class", name);
        return;
    }

    for attribute in attributes(params) {
        match attribute {
            Attribute::Class(name) => attrs.join("class", &name.replacen('.', " ", 1)),
            Attribute::Id(id) => attrs.set("id", id),
            Attribute::KeyValue(name, value) => attrs.push(name, value),
        }
    }
}

/// Final attribute list of a container open token.
///
/// Other tokens get their own attributes back unchanged.
pub fn decorate(token: &Token) -> Attrs {
    let mut attrs = token.attrs.clone();
    if token.kind == TokenKind::ContainerOpen {
        let marker = token.markup.chars().next().unwrap_or(char::from(DEFAULT_MARKER));
        apply(&token.info, marker, &mut attrs);
    }
    attrs
}

/// Name-start character: ASCII letters, `_` and the BMP letter ranges of
/// XML names.
#[inline]
pub fn is_name_start(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
    )
}

/// Name character: a name-start character, digit, `-`, `.` or one of the
/// combining ranges.
#[inline]
pub fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(c,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}'
        )
}

/// Greedy scanner over a parameter string.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump(c);
                true
            }
            _ => false,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.bump(c);
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// `ws* marker* ws*` up to the end of input.
    fn marker_tail(&mut self, marker: char) -> bool {
        self.skip_ws();
        while self.eat(marker) {}
        self.skip_ws();
        self.at_end()
    }

    fn name(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let first = self.peek().filter(|&c| is_name_start(c))?;
        self.bump(first);
        while let Some(c) = self.peek().filter(|&c| is_name_char(c)) {
            self.bump(c);
        }
        Some(&self.src[start..self.pos])
    }

    /// One attribute token; leaves the position unchanged on failure.
    fn attribute(&mut self) -> Option<Attribute<'a>> {
        let start = self.pos;
        let parsed = match self.peek()? {
            '.' => {
                self.bump('.');
                self.name().map(Attribute::Class)
            }
            '#' => {
                self.bump('#');
                self.name().map(Attribute::Id)
            }
            _ => self.key_value(),
        };
        if parsed.is_none() {
            self.pos = start;
        }
        parsed
    }

    fn key_value(&mut self) -> Option<Attribute<'a>> {
        let key = self.name()?;
        self.quoted_value().map(|value| Attribute::KeyValue(key, value))
    }

    /// `="value"`, returning the text between the quotes.
    fn quoted_value(&mut self) -> Option<&'a str> {
        if !(self.eat('=') && self.eat('"')) {
            return None;
        }

        let value_start = self.pos;
        while let Some(c) = self.peek().filter(|c| !matches!(c, '<' | '>' | '"' | '\'')) {
            self.bump(c);
        }
        let value = &self.src[value_start..self.pos];

        self.eat('"').then_some(value)
    }

    /// Skip a `="value"` tail; leaves the position unchanged on failure.
    fn skip_quoted_value(&mut self) -> bool {
        let start = self.pos;
        let skipped = self.quoted_value().is_some();
        if !skipped {
            self.pos = start;
        }
        skipped
    }
}
