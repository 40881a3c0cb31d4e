//! Block-level token types.

use smallvec::SmallVec;

use crate::Range;

/// Kind of a block token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Start of a paragraph.
    ParagraphOpen,
    /// End of a paragraph.
    ParagraphClose,
    /// Start of an ATX heading.
    HeadingOpen,
    /// End of an ATX heading.
    HeadingClose,
    /// Inline content (paragraph or heading text), kept raw in `content`.
    Inline,
    /// Indented code block.
    CodeBlock,
    /// Fenced code block.
    Fence,
    /// Start of a blockquote.
    BlockquoteOpen,
    /// End of a blockquote.
    BlockquoteClose,
    /// Start of an unordered list.
    BulletListOpen,
    /// End of an unordered list.
    BulletListClose,
    /// Start of an ordered list.
    OrderedListOpen,
    /// End of an ordered list.
    OrderedListClose,
    /// Start of a list item.
    ListItemOpen,
    /// End of a list item.
    ListItemClose,
    /// A thematic break (horizontal rule).
    ThematicBreak,
    /// Start of a fenced `:::` container.
    ContainerOpen,
    /// End of a fenced `:::` container.
    ContainerClose,
}

/// Whether a token opens, closes, or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    /// Opening tag, level +1.
    Open,
    /// Self-contained token, level unchanged.
    Leaf,
    /// Closing tag, level -1.
    Close,
}

/// Ordered attribute list of a token.
///
/// Stored as a list, not a map: `push` keeps duplicates, `set` overwrites
/// the first occurrence and `join` space-appends to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attrs(SmallVec<[(String, String); 2]>);

impl Attrs {
    /// Create an empty attribute list.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute, keeping any existing one with the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Set an attribute, replacing the value of an existing one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.into(),
            None => self.0.push((name.to_owned(), value.into())),
        }
    }

    /// Join a value onto an existing attribute with a space, or add it.
    pub fn join(&mut self, name: &str, value: &str) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                v.push(' ');
                v.push_str(value);
            }
            None => self.0.push((name.to_owned(), value.to_owned())),
        }
    }

    /// Value of the first attribute with this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A block token produced by the block parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What this token is.
    pub kind: TokenKind,
    /// HTML tag name (`div`, `p`, `h2`, ...).
    pub tag: &'static str,
    /// Open/close/leaf.
    pub nesting: Nesting,
    /// Nesting level at which the token was pushed.
    pub level: u32,
    /// Attributes set during parsing.
    pub attrs: Attrs,
    /// Source lines covered, `[start, end)`.
    pub map: Option<Range>,
    /// Literal marker text (fence run, list bullet, `>`).
    pub markup: String,
    /// Info string after a fence marker (code language, container parameters).
    pub info: String,
    /// Text content of leaf tokens.
    pub content: String,
    /// Block-level token.
    pub block: bool,
    /// Skip the tag when rendering (tight-list paragraphs).
    pub hidden: bool,
}

impl Token {
    /// Create a block token with no payload.
    pub fn new(kind: TokenKind, tag: &'static str, nesting: Nesting) -> Self {
        Self {
            kind,
            tag,
            nesting,
            level: 0,
            attrs: Attrs::new(),
            map: None,
            markup: String::new(),
            info: String::new(),
            content: String::new(),
            block: true,
            hidden: false,
        }
    }
}
