//! Object Header - The one-word prefix of every heap object
//!
//! Header Word Layout (8 bytes):
//! ┌───────────────────────────────────────────────┬──────────┐
//! │              misc (bits 8-63)                 │ tag (0-7)│
//! └───────────────────────────────────────────────┴──────────┘
//!
//! `misc` means something different per tag. The meaning is fixed in one
//! place, [`ObjectHeader::words`] and [`misc_use`]; nothing else in the
//! crate interprets it:
//!
//! | tag        | misc                               | words              |
//! |------------|------------------------------------|--------------------|
//! | `Forward`  | footprint of the evacuated object  | misc               |
//! | `Int`      | unused (0)                         | 2                  |
//! | `Attrs`    | unused (0)                         | 2                  |
//! | `Bindings` | capacity                           | 2 + 3 * capacity   |
//!
//! Tag 0 is not a tag, so a zeroed word never decodes as a header.

use crate::heap::Word;
use crate::value::Bindings;

/// Bits of the header holding the tag
pub const TAG_MASK: Word = 0xFF;

/// Shift of the misc field
pub const MISC_SHIFT: u32 = 8;

/// Largest value the misc field can hold
pub const MISC_MAX: Word = Word::MAX >> MISC_SHIFT;

/// Fill pattern for allocated but unwritten words
///
/// Its low byte is `0xEF`, which is not a tag: a poisoned word that is
/// mistaken for a header fails to decode instead of passing as an object.
pub const POISON: Word = 0xDEAD_BEEF_DEAD_BEEF;

/// Object type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Evacuated by the collector; word 1 holds the new address
    Forward = 1,
    /// Boxed 64-bit integer
    Int = 2,
    /// Attribute-set value; word 1 references its `Bindings` block
    Attrs = 3,
    /// Attribute-set container with trailing record slots
    Bindings = 4,
}

impl Tag {
    /// All tags, in encoding order
    pub const ALL: [Tag; 4] = [Tag::Forward, Tag::Int, Tag::Attrs, Tag::Bindings];

    /// Decode a tag byte, `None` for anything that is not a tag
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Tag> {
        match bits {
            1 => Some(Tag::Forward),
            2 => Some(Tag::Int),
            3 => Some(Tag::Attrs),
            4 => Some(Tag::Bindings),
            _ => None,
        }
    }

    /// Encoded value
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Words occupied by objects of this tag, if independent of misc
    #[inline]
    pub const fn fixed_words(self) -> Option<usize> {
        match self {
            Tag::Int | Tag::Attrs => Some(2),
            Tag::Forward | Tag::Bindings => None,
        }
    }
}

/// What the misc field of a tag means
///
/// ```
/// use lazr_gc::object::{misc_use, Tag};
///
/// assert_eq!(misc_use(Tag::Bindings), "capacity");
/// ```
pub const fn misc_use(tag: Tag) -> &'static str {
    match tag {
        Tag::Forward => "footprint",
        Tag::Int | Tag::Attrs => "unused",
        Tag::Bindings => "capacity",
    }
}

/// A decoded header word
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHeader(Word);

impl ObjectHeader {
    /// Pack a tag and misc value
    ///
    /// # Panics
    ///
    /// Panics if `misc` does not fit in 56 bits.
    #[inline]
    pub fn new(tag: Tag, misc: Word) -> Self {
        assert!(misc <= MISC_MAX, "misc value {:#x} does not fit the header", misc);
        Self((misc << MISC_SHIFT) | tag.bits() as Word)
    }

    /// Decode a raw word, `None` if its low byte is not a tag
    #[inline]
    pub fn decode(word: Word) -> Option<Self> {
        Tag::from_bits((word & TAG_MASK) as u8).map(|_| Self(word))
    }

    /// Raw word as stored in the heap
    #[inline]
    pub const fn raw(self) -> Word {
        self.0
    }

    /// Object type
    #[inline]
    pub fn tag(self) -> Tag {
        match Tag::from_bits((self.0 & TAG_MASK) as u8) {
            Some(tag) => tag,
            None => unreachable!("ObjectHeader holds an undecodable tag"),
        }
    }

    /// Auxiliary field
    #[inline]
    pub const fn misc(self) -> Word {
        self.0 >> MISC_SHIFT
    }

    /// Number of words the object occupies, header included
    ///
    /// The only footprint computation in the crate: the allocator sizes
    /// blocks with it, the heap walk steps by it, and the collector copies
    /// exactly this many words.
    #[inline]
    pub fn words(self) -> usize {
        match self.tag() {
            Tag::Forward => self.misc() as usize,
            Tag::Int | Tag::Attrs => 2,
            Tag::Bindings => Bindings::words_for(self.misc() as u32),
        }
    }

    #[inline]
    pub fn is_forwarded(self) -> bool {
        self.tag() == Tag::Forward
    }
}

impl std::fmt::Debug for ObjectHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectHeader")
            .field("tag", &self.tag())
            .field("misc", &self.misc())
            .finish()
    }
}
