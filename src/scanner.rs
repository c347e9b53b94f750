//! Chunk scanner: walks an AVI buffer once and indexes every payload chunk
//! usable as a carrier, grouped by category.

use crate::error::ParseError;
use crate::headers::AviMainHeader;
use crate::riff::{self, ids, ChunkHeader, FourCC, CHUNK_HEADER_LENGTH};
use crate::streams::Streams;
use crate::Category;
use log::{debug, warn};
use std::convert::TryFrom;
use std::ops::Range;

/// Location of one chunk's payload inside the file buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub id: FourCC,
    pub data_offset: usize,
    pub data_size: usize,
}

impl Chunk {
    pub fn data_range(&self) -> Range<usize> {
        self.data_offset..self.data_offset + self.data_size
    }
}

/// Classified chunk locations of one AVI buffer, in file order per category.
#[derive(Debug, Clone)]
pub struct ChunkIndex {
    pub main_header: AviMainHeader,
    pub streams: Streams,
    chunks: [Vec<Chunk>; 4],
}

impl ChunkIndex {
    pub fn chunks(&self, category: Category) -> &[Chunk] {
        &self.chunks[category.index()]
    }

    pub fn is_compressed(&self, category: Category) -> bool {
        self.streams.is_compressed(category)
    }

    fn push(&mut self, category: Category, chunk: Chunk) {
        self.chunks[category.index()].push(chunk);
    }
}

/// Builds the chunk index of `avi`. Pure: the same buffer always yields the
/// same index.
pub fn build_index(avi: &[u8]) -> Result<ChunkIndex, ParseError> {
    let hdrl = find_list(avi, ids::HDRL)?.ok_or(ParseError::MissingMainHeader)?;
    let main_header = read_main_header(avi, hdrl.clone())?;

    debug!(
        "main header: {}x{}, {} frames, {} streams",
        main_header.width, main_header.height, main_header.total_frames, main_header.streams
    );

    let streams = Streams::locate(avi, hdrl)?;

    let mut index = ChunkIndex {
        main_header,
        streams,
        chunks: Default::default(),
    };

    scan_junk(avi, &mut index)?;

    match find_list(avi, ids::MOVI)? {
        Some(movi) => scan_movi(avi, movi, &mut index)?,
        None => debug!("no movi list found, only junk chunks are indexed"),
    }

    for category in Category::ALL.iter() {
        debug!("{}: {} chunks", category, index.chunks(*category).len());
    }

    Ok(index)
}

/// Finds the first `LIST` of the given type and returns the byte range of
/// its children (after the list type tag).
fn find_list(avi: &[u8], list_type: FourCC) -> Result<Option<Range<usize>>, ParseError> {
    let mut position = 0;

    while let Some(offset) = riff::find(avi, ids::LIST, position, avi.len()) {
        let type_offset = ChunkHeader::data_offset(offset);
        if type_offset + 4 <= avi.len() && riff::read_fourcc(avi, type_offset) == list_type {
            let header = ChunkHeader::read(avi, offset, avi.len())?;
            return list_contents(offset, &header).map(Some);
        }
        position = offset + 1;
    }

    Ok(None)
}

fn list_contents(offset: usize, header: &ChunkHeader) -> Result<Range<usize>, ParseError> {
    if header.size < 4 {
        return Err(ParseError::malformed(
            header.id,
            offset,
            "list is too small to hold its type tag",
        ));
    }

    let start = ChunkHeader::data_offset(offset);
    Ok(start + 4..start + header.size as usize)
}

fn read_main_header(avi: &[u8], hdrl: Range<usize>) -> Result<AviMainHeader, ParseError> {
    if hdrl.end - hdrl.start < CHUNK_HEADER_LENGTH
        || riff::read_fourcc(avi, hdrl.start) != ids::AVIH
    {
        return Err(ParseError::MissingMainHeader);
    }

    let header = ChunkHeader::read(avi, hdrl.start, hdrl.end)?;
    let data_start = ChunkHeader::data_offset(hdrl.start);

    AviMainHeader::try_from(&avi[data_start..data_start + header.size as usize])
        .map_err(|reason| ParseError::malformed(header.id, hdrl.start, reason))
}

fn scan_junk(avi: &[u8], index: &mut ChunkIndex) -> Result<(), ParseError> {
    let mut position = 0;

    while let Some(offset) = riff::find(avi, ids::JUNK, position, avi.len()) {
        let header = ChunkHeader::read(avi, offset, avi.len())?;
        index.push(
            Category::Junk,
            Chunk {
                id: header.id,
                data_offset: ChunkHeader::data_offset(offset),
                data_size: header.size as usize,
            },
        );
        position = offset + header.total_size();
    }

    Ok(())
}

/// Walks the `movi` children. Nested `rec ` lists are handled with an
/// explicit worklist so hostile nesting depth cannot grow the call stack.
fn scan_movi(avi: &[u8], movi: Range<usize>, index: &mut ChunkIndex) -> Result<(), ParseError> {
    if (movi.end - movi.start) % 2 != 0 {
        warn!("movi list has an odd size, skipping it");
        return Ok(());
    }

    let mut pending = vec![movi];

    while let Some(range) = pending.pop() {
        let mut cursor = range.start;

        while cursor < range.end {
            let header = ChunkHeader::read(avi, cursor, range.end)?;
            let next = cursor + header.total_size();

            if header.id == ids::LIST {
                let contents = list_contents(cursor, &header)?;
                let list_type = riff::read_fourcc(avi, contents.start - 4);

                if list_type == ids::REC {
                    if header.size % 2 != 0 {
                        warn!("odd-sized rec list at offset {}, skipping it", cursor);
                    } else {
                        if next < range.end {
                            pending.push(next..range.end);
                        }
                        pending.push(contents);
                        break;
                    }
                }
            } else if let Some(category) = index.streams.category_for(header.id) {
                index.push(
                    category,
                    Chunk {
                        id: header.id,
                        data_offset: ChunkHeader::data_offset(cursor),
                        data_size: header.size as usize,
                    },
                );
            }

            cursor = next;
        }
    }

    Ok(())
}
