//! Bounded field buffer and the streaming receiver that fills it.

use std::fmt;

use reqwest::Response;
use serde::Serialize;

use crate::error::MetadataError;

/// Fixed capacity of one metadata field, terminator byte included. Usable
/// content is at most `FIELD_CAPACITY - 1` bytes; anything larger is
/// rejected rather than truncated.
pub const FIELD_CAPACITY: usize = 512;

/// One finished metadata field: bounded, valid UTF-8, immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field(String);

impl Field {
    /// Field content as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Field content as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the field content in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accumulator for one field body while chunks are still arriving.
///
/// The sole enforcement point of the capacity invariant: a chunk that would
/// push the fill to `FIELD_CAPACITY` or beyond is rejected whole and the
/// transfer fails with [`MetadataError::Overflow`].
#[derive(Debug)]
pub(crate) struct FieldBuf {
    buf: Vec<u8>,
}

impl FieldBuf {
    /// Allocate an empty buffer with the full usable capacity up front.
    pub(crate) fn new() -> Result<Self, MetadataError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(FIELD_CAPACITY - 1)?;
        Ok(Self { buf })
    }

    /// Append one chunk, checking capacity before any byte is copied.
    pub(crate) fn append(&mut self, chunk: &[u8]) -> Result<(), MetadataError> {
        let len = self.buf.len().saturating_add(chunk.len());
        if len >= FIELD_CAPACITY {
            return Err(MetadataError::Overflow {
                len,
                limit: FIELD_CAPACITY,
            });
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Drain a response body into this buffer, chunk by chunk, in arrival
    /// order. Aborts the transfer on the first capacity violation.
    pub(crate) async fn recv(&mut self, mut response: Response) -> Result<(), MetadataError> {
        while let Some(chunk) = response.chunk().await? {
            self.append(&chunk)?;
        }
        Ok(())
    }

    /// Seal the buffer into an immutable [`Field`], validating the text
    /// invariant.
    pub(crate) fn finish(self) -> Result<Field, MetadataError> {
        String::from_utf8(self.buf)
            .map(Field)
            .map_err(|_| MetadataError::Utf8)
    }

    #[cfg(test)]
    pub(crate) fn filled(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_tracks_fill() {
        let mut buf = FieldBuf::new().unwrap();
        buf.append(b"i-0abcd").unwrap();
        buf.append(b"1234").unwrap();
        assert_eq!(buf.filled(), 11);
        assert_eq!(buf.finish().unwrap().as_str(), "i-0abcd1234");
    }

    #[test]
    fn test_fill_below_capacity_accepted() {
        let mut buf = FieldBuf::new().unwrap();
        buf.append(&[b'a'; FIELD_CAPACITY - 1]).unwrap();
        assert_eq!(buf.filled(), FIELD_CAPACITY - 1);
    }

    #[test]
    fn test_chunk_reaching_capacity_rejected_whole() {
        let mut buf = FieldBuf::new().unwrap();
        let err = buf.append(&[b'a'; FIELD_CAPACITY]).unwrap_err();
        assert!(matches!(err, MetadataError::Overflow { .. }));
        // nothing of the oversized chunk was copied
        assert_eq!(buf.filled(), 0);
    }

    #[test]
    fn test_cumulative_overflow_rejected() {
        let mut buf = FieldBuf::new().unwrap();
        buf.append(&[b'a'; 300]).unwrap();
        let err = buf.append(&[b'b'; 300]).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::Overflow {
                len: 600,
                limit: FIELD_CAPACITY
            }
        ));
        assert_eq!(buf.filled(), 300);
    }

    #[test]
    fn test_finish_rejects_invalid_utf8() {
        let mut buf = FieldBuf::new().unwrap();
        buf.append(&[0xff, 0xfe]).unwrap();
        assert!(matches!(buf.finish(), Err(MetadataError::Utf8)));
    }

    #[test]
    fn test_empty_field() {
        let field = FieldBuf::new().unwrap().finish().unwrap();
        assert!(field.is_empty());
        assert_eq!(field.len(), 0);
    }

    #[test]
    fn test_field_display_matches_content() {
        let mut buf = FieldBuf::new().unwrap();
        buf.append(b"us-east-1a").unwrap();
        let field = buf.finish().unwrap();
        assert_eq!(field.to_string(), "us-east-1a");
        assert_eq!(field.as_bytes(), b"us-east-1a");
    }
}
