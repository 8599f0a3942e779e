//! # Parcel
//!
//! A small, strict serialization format for binder-style transaction buffers.
//!
//! ## Philosophy
//!
//! - **Symmetric**: The sequence of writes on the sender must match the sequence
//!   of reads on the receiver, in type and in count. Every item carries a tag so
//!   a mismatch is caught as a schema error instead of being silently misread.
//! - **Bounded**: Sequences carry a declared maximum item count, enforced on both
//!   the write and the read side. Decoders never allocate on behalf of the wire.
//! - **Zero-copy reads**: Decoders are bounds-checked views over a byte slice.
//!
//! ## Format
//!
//! - **Int32**: `[Tag: 1b][Data: 4b]`
//! - **Int64**: `[Tag: 1b][Data: 8b]`
//! - **String**: `[Tag: 1b][Present: 1b][Len: 4b][UTF-8: Len]` (no length when absent)
//! - **Null**: `[Tag: 1b]`
//! - **Record**: `[Tag: 1b][Len: 4b][Fields: Len]`
//! - **Sequence**: `[Tag: 1b][Count: 4b][Items...]`
//!
//! All integers are Little-Endian.


/// Suggested upper bound for a single transaction payload.
pub const MAX_IPC_SIZE: usize = 64 * 1024;

/// Smallest encoded record we expect to see in a sequence.
const MIN_ITEM_SIZE: usize = 16;

/// Default cap on sequence length, derived from the IPC payload budget.
pub const DEFAULT_MAX_ITEMS: usize = MAX_IPC_SIZE / MIN_ITEM_SIZE;

/// Parcel serialization and deserialization errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Buffer exhausted while reading.
    #[error("unexpected end of parcel: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },
    /// Byte does not correspond to a valid `Tag`.
    #[error("invalid tag byte: {0:#04x}")]
    InvalidTag(u8),
    /// String presence flag was neither 0 nor 1.
    #[error("invalid presence flag: {0:#04x}")]
    InvalidFlag(u8),
    /// String data is not valid UTF-8.
    #[error("string data is not valid UTF-8")]
    InvalidUtf8,
    /// The next item is well-formed but not the one the reader asked for.
    #[error("expected {expected:?}, found {found:?}")]
    TagMismatch { expected: Tag, found: Tag },
    /// A scope was finished with unread bytes left over.
    #[error("{0} unread bytes left in scope")]
    TrailingBytes(usize),
    /// Sequence holds more items than its declared maximum.
    #[error("sequence of {count} items exceeds the declared maximum of {max}")]
    SequenceTooLarge { count: usize, max: usize },
    /// Blob or record length exceeds `u32::MAX`.
    #[error("blob of {0} bytes is too large")]
    BlobTooLarge(usize),
    /// Closing a scope that does not match the active scope stack.
    #[error("scope mismatch: expected {expected:?}, found {actual:?}")]
    ScopeMismatch { expected: Scope, actual: Scope },
    /// Attempted to close a scope when only the root remains.
    #[error("no open scope to close")]
    ScopeUnderflow,
    /// Attempted to finalize the buffer with open scopes.
    #[error("parcel finalized with open scopes")]
    ScopeStillOpen,
}

/// Coarse classification of an `Error`, shared with the RPC layers above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Corrupt or truncated bytes: the buffer cannot be read at all.
    MalformedPayload,
    /// Well-formed bytes that do not match the declared shape.
    SchemaMismatch,
    /// A sequence exceeded its declared cap.
    PayloadTooLarge,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedEnd { .. }
            | Error::InvalidTag(_)
            | Error::InvalidFlag(_)
            | Error::InvalidUtf8
            | Error::BlobTooLarge(_) => ErrorKind::MalformedPayload,
            Error::TagMismatch { .. }
            | Error::TrailingBytes(_)
            | Error::ScopeMismatch { .. }
            | Error::ScopeUnderflow
            | Error::ScopeStillOpen => ErrorKind::SchemaMismatch,
            Error::SequenceTooLarge { .. } => ErrorKind::PayloadTooLarge,
        }
    }
}

/// Specialized `Result` for parcel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies the type of the encoded item.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Int32 = 0x09,
    Int64 = 0x0A,
    Null = 0x0F,
    String = 0x10,
    Sequence = 0x20,
    Record = 0x21,
}

impl Tag {
    /// Returns the Tag variant for a given byte, or `None` if invalid.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x09 => Some(Tag::Int32),
            0x0A => Some(Tag::Int64),
            0x0F => Some(Tag::Null),
            0x10 => Some(Tag::String),
            0x20 => Some(Tag::Sequence),
            0x21 => Some(Tag::Record),
            _ => None,
        }
    }
}

/// Container kinds tracked by the `Encoder` stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Length-delimited, fixed field order.
    Record,
    /// Count-prefixed, bounded item list.
    Sequence,
}

/// An open container on the `Encoder` stack.
struct Frame {
    /// Offset of the first body byte; the 4-byte header sits right before it.
    start: usize,
    scope: Scope,
    count: usize,
    max: usize,
}

/// A bounded, state-machine driven encoder.
///
/// Open scopes are kept on a stack so that record lengths and sequence counts
/// can be back-patched when the scope closes.
///
/// # Invariants
///
/// 1. A sequence scope refuses the item that would push it past its maximum,
///    so an oversized sequence is rejected while it is being written.
/// 2. The encoder must have no open scopes to finalize bytes.
pub struct Encoder {
    buf: Vec<u8>,
    stack: Vec<Frame>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates a new encoder with default capacity.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
            stack: Vec::with_capacity(4),
        }
    }

    /// Consumes the encoder and returns the final byte vector.
    ///
    /// # Errors
    /// Returns `Error::ScopeStillOpen` if a record or sequence is still open.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if !self.stack.is_empty() {
            return Err(Error::ScopeStillOpen);
        }
        Ok(self.buf)
    }

    /// Returns a view of the current buffer.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        if !self.stack.is_empty() {
            return Err(Error::ScopeStillOpen);
        }
        Ok(&self.buf)
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn check_write(&self) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.scope == Scope::Sequence && frame.count >= frame.max => {
                Err(Error::SequenceTooLarge { count: frame.count + 1, max: frame.max })
            }
            _ => Ok(()),
        }
    }

    fn on_item_written(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.count += 1;
        }
    }

    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.check_write()?;
        self.buf.push(tag as u8);
        Ok(())
    }

    fn write_u32_raw(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn begin_scope(&mut self, tag: Tag, scope: Scope, max: usize) -> Result<()> {
        self.write_tag(tag)?;
        self.buf.extend_from_slice(&[0, 0, 0, 0]); // header placeholder
        self.stack.push(Frame { start: self.buf.len(), scope, count: 0, max });
        Ok(())
    }

    fn end_scope(&mut self, expected: Scope) -> Result<()> {
        let frame = self.stack.pop().ok_or(Error::ScopeUnderflow)?;
        if frame.scope != expected {
            let actual = frame.scope;
            self.stack.push(frame);
            return Err(Error::ScopeMismatch { expected, actual });
        }

        let header = match frame.scope {
            Scope::Record => self.buf.len() - frame.start,
            Scope::Sequence => frame.count,
        };
        let header = u32::try_from(header).map_err(|_| Error::BlobTooLarge(header))?;

        let pos = frame.start - 4;
        self.buf[pos..frame.start].copy_from_slice(&header.to_le_bytes());

        self.on_item_written();
        Ok(())
    }

    /// Encodes a signed 32-bit integer (LE).
    pub fn i32(&mut self, v: i32) -> Result<()> {
        self.write_tag(Tag::Int32)?;
        self.buf.extend_from_slice(&v.to_le_bytes());
        self.on_item_written();
        Ok(())
    }

    /// Encodes a signed 64-bit integer (LE).
    pub fn i64(&mut self, v: i64) -> Result<()> {
        self.write_tag(Tag::Int64)?;
        self.buf.extend_from_slice(&v.to_le_bytes());
        self.on_item_written();
        Ok(())
    }

    /// Encodes a nullable UTF-8 string.
    pub fn string(&mut self, v: Option<&str>) -> Result<()> {
        let Some(s) = v else {
            self.write_tag(Tag::String)?;
            self.buf.push(0);
            self.on_item_written();
            return Ok(());
        };
        let len = u32::try_from(s.len()).map_err(|_| Error::BlobTooLarge(s.len()))?;
        self.write_tag(Tag::String)?;
        self.buf.push(1);
        self.write_u32_raw(len);
        self.buf.extend_from_slice(s.as_bytes());
        self.on_item_written();
        Ok(())
    }

    /// Encodes an absent value in a nullable slot.
    pub fn null(&mut self) -> Result<()> {
        self.write_tag(Tag::Null)?;
        self.on_item_written();
        Ok(())
    }

    /// Begins a record. Fields are written in declared order and the record
    /// must be closed via `record_end()`.
    pub fn record_begin(&mut self) -> Result<()> {
        self.begin_scope(Tag::Record, Scope::Record, usize::MAX)
    }

    /// Ends a record, patching its body length.
    pub fn record_end(&mut self) -> Result<()> {
        self.end_scope(Scope::Record)
    }

    /// Begins a sequence holding at most `max` items.
    ///
    /// # Invariants
    /// - Must be closed via `sequence_end()`.
    /// - Writing item `max + 1` fails with `Error::SequenceTooLarge`.
    pub fn sequence_begin(&mut self, max: usize) -> Result<()> {
        self.begin_scope(Tag::Sequence, Scope::Sequence, max)
    }

    /// Ends a sequence, patching its item count.
    pub fn sequence_end(&mut self) -> Result<()> {
        self.end_scope(Scope::Sequence)
    }
}

/// A zero-copy, bounds-checked cursor over a byte slice.
///
/// Reading advances the internal cursor. Record reads return a new `Decoder`
/// restricted to the record's body.
///
/// # Errors
/// All read operations return `Error::UnexpectedEnd` if the buffer is exhausted.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over the slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Returns the remaining bytes in the view.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Fails with `Error::TrailingBytes` unless the view is fully consumed.
    pub fn finish(&self) -> Result<()> {
        match self.buf.len() {
            0 => Ok(()),
            n => Err(Error::TrailingBytes(n)),
        }
    }

    /// Peeks the next Tag without advancing.
    pub fn peek_tag(&self) -> Result<Tag> {
        let &b = self.buf.first().ok_or(Error::UnexpectedEnd { needed: 1, remaining: 0 })?;
        Tag::from_u8(b).ok_or(Error::InvalidTag(b))
    }

    /// Returns true if the next item is a `Null` marker.
    pub fn peek_null(&self) -> Result<bool> {
        Ok(self.peek_tag()? == Tag::Null)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.buf.len() {
            return Err(Error::UnexpectedEnd { needed: n, remaining: self.buf.len() });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u32_raw(&mut self) -> Result<usize> {
        Ok(u32::from_le_bytes(self.read_array()?) as usize)
    }

    fn check_tag(&mut self, expected: Tag) -> Result<()> {
        let found = self.peek_tag()?;
        if found != expected {
            return Err(Error::TagMismatch { expected, found });
        }
        self.read_bytes(1)?;
        Ok(())
    }

    /// Skips the next item and its nested children.
    ///
    /// Sequences only carry an item count, so nesting is walked with a
    /// pending-item counter instead of recursion.
    pub fn skip(&mut self) -> Result<()> {
        let mut pending: usize = 1;
        while pending > 0 {
            pending -= 1;
            let tag = self.peek_tag()?;
            self.read_bytes(1)?;
            match tag {
                Tag::Null => {}
                Tag::Int32 => { self.read_bytes(4)?; }
                Tag::Int64 => { self.read_bytes(8)?; }
                Tag::String => {
                    if self.read_presence()? {
                        let len = self.read_u32_raw()?;
                        self.read_bytes(len)?;
                    }
                }
                Tag::Record => {
                    let len = self.read_u32_raw()?;
                    self.read_bytes(len)?;
                }
                Tag::Sequence => {
                    let count = self.read_u32_raw()?;
                    pending = pending.saturating_add(count);
                }
            }
        }
        Ok(())
    }

    fn read_presence(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(Error::InvalidFlag(b)),
        }
    }

    /// Decodes i32 (LE).
    pub fn i32(&mut self) -> Result<i32> {
        self.check_tag(Tag::Int32)?;
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Decodes i64 (LE).
    pub fn i64(&mut self) -> Result<i64> {
        self.check_tag(Tag::Int64)?;
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Decodes a nullable string slice (UTF-8).
    pub fn string(&mut self) -> Result<Option<&'a str>> {
        self.check_tag(Tag::String)?;
        if !self.read_presence()? {
            return Ok(None);
        }
        let len = self.read_u32_raw()?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map(Some).map_err(|_| Error::InvalidUtf8)
    }

    /// Decodes a `Null` marker.
    pub fn null(&mut self) -> Result<()> {
        self.check_tag(Tag::Null)
    }

    /// Enters a record, returning a decoder over exactly its fields.
    ///
    /// Call `finish()` on the returned decoder once every declared field has
    /// been read.
    pub fn record(&mut self) -> Result<Decoder<'a>> {
        self.check_tag(Tag::Record)?;
        let len = self.read_u32_raw()?;
        Ok(Decoder::new(self.read_bytes(len)?))
    }

    /// Reads a sequence header and returns its item count.
    ///
    /// The items follow inline and are read from this decoder.
    ///
    /// # Errors
    /// `Error::SequenceTooLarge` if the count is above `max`, and
    /// `Error::UnexpectedEnd` if the count cannot possibly fit in the
    /// remaining bytes.
    pub fn sequence(&mut self, max: usize) -> Result<usize> {
        self.check_tag(Tag::Sequence)?;
        let count = self.read_u32_raw()?;
        if count > max {
            return Err(Error::SequenceTooLarge { count, max });
        }
        // every item is at least its tag byte
        if count > self.buf.len() {
            return Err(Error::UnexpectedEnd { needed: count, remaining: self.buf.len() });
        }
        Ok(count)
    }
}
