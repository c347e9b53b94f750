//! RIFF primitives: FourCC tags, chunk headers and tag search.

use crate::error::ParseError;
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

pub const CHUNK_HEADER_LENGTH: usize = 8;

/// Four character code, compared by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Two-character type code of a stream chunk id such as `00dc`.
    pub fn suffix(&self) -> [u8; 2] {
        [self.0[2], self.0[3]]
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }
}

pub mod ids {
    use super::FourCC;

    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const LIST: FourCC = FourCC(*b"LIST");
    pub const JUNK: FourCC = FourCC(*b"JUNK");
    pub const HDRL: FourCC = FourCC(*b"hdrl");
    pub const AVIH: FourCC = FourCC(*b"avih");
    pub const STRH: FourCC = FourCC(*b"strh");
    pub const STRF: FourCC = FourCC(*b"strf");
    pub const MOVI: FourCC = FourCC(*b"movi");
    pub const REC: FourCC = FourCC(*b"rec ");
    pub const VIDS: FourCC = FourCC(*b"vids");
    pub const AUDS: FourCC = FourCC(*b"auds");
}

/// 8-byte chunk header: id followed by the little-endian payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: FourCC,
    pub size: u32,
}

impl ChunkHeader {
    /// Reads the header at `offset`, requiring the declared payload to fit
    /// below `end`.
    pub fn read(avi: &[u8], offset: usize, end: usize) -> Result<Self, ParseError> {
        let header_end = offset
            .checked_add(CHUNK_HEADER_LENGTH)
            .filter(|&e| e <= end && e <= avi.len());

        let header_end = match header_end {
            Some(e) => e,
            None => {
                let mut id = [0u8; 4];
                let available = avi.len().min(end).saturating_sub(offset).min(4);
                if available > 0 {
                    id[..available].copy_from_slice(&avi[offset..offset + available]);
                }
                return Err(ParseError::malformed(
                    FourCC(id),
                    offset,
                    "chunk header is truncated",
                ));
            }
        };

        let header = ChunkHeader {
            id: read_fourcc(avi, offset),
            size: LittleEndian::read_u32(&avi[offset + 4..header_end]),
        };

        if header_end + header.size as usize > end.min(avi.len()) {
            return Err(ParseError::malformed(
                header.id,
                offset,
                format!(
                    "declared size {} runs past the end of its container ({})",
                    header.size, end
                ),
            ));
        }

        Ok(header)
    }

    pub fn data_offset(offset: usize) -> usize {
        offset + CHUNK_HEADER_LENGTH
    }

    /// Bytes occupied by the whole chunk, header and pad byte included.
    pub fn total_size(&self) -> usize {
        CHUNK_HEADER_LENGTH + padded(self.size as usize)
    }
}

/// Rounds a payload size up to the RIFF word boundary.
pub fn padded(size: usize) -> usize {
    size + (size & 1)
}

/// Reads the FourCC at `offset`. The caller guarantees 4 readable bytes.
pub fn read_fourcc(avi: &[u8], offset: usize) -> FourCC {
    let mut id = [0u8; 4];
    id.copy_from_slice(&avi[offset..offset + 4]);
    FourCC(id)
}

/// Size field of the outer RIFF header, if the buffer starts with one.
pub fn riff_size(avi: &[u8]) -> Option<u32> {
    if avi.len() >= CHUNK_HEADER_LENGTH && read_fourcc(avi, 0) == ids::RIFF {
        Some(LittleEndian::read_u32(&avi[4..8]))
    } else {
        None
    }
}

/// Naive forward search for `tag` in `avi[start..end]`. Returns the offset of
/// the first byte of the match.
pub fn find(avi: &[u8], tag: FourCC, start: usize, end: usize) -> Option<usize> {
    let end = end.min(avi.len());
    if start >= end {
        return None;
    }

    avi[start..end]
        .windows(4)
        .position(|window| window == tag.as_bytes())
        .map(|position| start + position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        let data = b"xxLISTyyJUNKLIST";
        assert_eq!(Some(2), find(data, ids::LIST, 0, data.len()));
        assert_eq!(Some(12), find(data, ids::LIST, 3, data.len()));
        assert_eq!(Some(8), find(data, ids::JUNK, 0, data.len()));
        assert_eq!(None, find(data, ids::JUNK, 0, 11));
        assert_eq!(None, find(data, ids::MOVI, 0, data.len()));
        assert_eq!(None, find(data, ids::LIST, 20, 40));
    }

    #[test]
    fn test_chunk_header_read() {
        let mut data = b"00dc".to_vec();
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[1, 2, 3, 0]);

        let header = ChunkHeader::read(&data, 0, data.len()).expect("no error");
        assert_eq!(FourCC(*b"00dc"), header.id);
        assert_eq!(3, header.size);
        assert_eq!(12, header.total_size());
        assert_eq!(*b"dc", header.id.suffix());
    }

    #[test]
    fn test_chunk_header_overrun() {
        let mut data = b"00wb".to_vec();
        data.extend_from_slice(&16u32.to_le_bytes());
        data.extend_from_slice(&[0; 4]);

        match ChunkHeader::read(&data, 0, data.len()) {
            Err(ParseError::MalformedChunk { id, offset, .. }) => {
                assert_eq!(FourCC(*b"00wb"), id);
                assert_eq!(0, offset);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(ChunkHeader::read(&data, 10, data.len()).is_err());
    }

    #[test]
    fn test_padded() {
        assert_eq!(0, padded(0));
        assert_eq!(18, padded(17));
        assert_eq!(8, padded(8));
    }

    #[test]
    fn test_riff_size() {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&1234u32.to_le_bytes());
        assert_eq!(Some(1234), riff_size(&data));
        assert_eq!(None, riff_size(b"RIFX\0\0\0\0"));
    }
}
