//! Resolves the video and audio stream headers and decides which payload
//! chunks belong to which category.

use crate::error::ParseError;
use crate::headers::{AviStreamHeader, BitmapInfoHeader};
use crate::riff::{self, ids, ChunkHeader, FourCC};
use crate::Category;
use log::debug;
use std::convert::TryFrom;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Offset of the `strh` chunk header.
    pub offset: usize,
    pub header: AviStreamHeader,
    /// Only present for the video stream, when a `strf` chunk follows.
    pub bitmap_info: Option<BitmapInfoHeader>,
}

impl StreamInfo {
    pub fn is_uncompressed(&self) -> bool {
        self.header.is_uncompressed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streams {
    pub video: StreamInfo,
    pub audio: StreamInfo,
}

impl Streams {
    /// Finds the first `vids` and first `auds` stream headers inside `hdrl`.
    pub fn locate(avi: &[u8], hdrl: Range<usize>) -> Result<Self, ParseError> {
        let mut video: Option<StreamInfo> = None;
        let mut audio: Option<StreamInfo> = None;

        let mut position = hdrl.start;
        while let Some(offset) = riff::find(avi, ids::STRH, position, hdrl.end) {
            let chunk = ChunkHeader::read(avi, offset, hdrl.end)?;
            let data_start = ChunkHeader::data_offset(offset);
            let data = &avi[data_start..data_start + chunk.size as usize];

            let header = AviStreamHeader::try_from(data)
                .map_err(|reason| ParseError::malformed(chunk.id, offset, reason))?;

            let next = offset + chunk.total_size();

            if header.fcc_type == ids::VIDS && video.is_none() {
                video = Some(StreamInfo {
                    offset,
                    header,
                    bitmap_info: read_bitmap_info(avi, next, hdrl.end),
                });
            } else if header.fcc_type == ids::AUDS && audio.is_none() {
                audio = Some(StreamInfo {
                    offset,
                    header,
                    bitmap_info: None,
                });
            }

            if video.is_some() && audio.is_some() {
                break;
            }
            position = next;
        }

        let video = video.ok_or(ParseError::MissingVideoHeader)?;
        let audio = audio.ok_or(ParseError::MissingAudioHeader)?;

        debug!(
            "video stream '{}' quality {} ({}), audio stream quality {} ({})",
            video.header.fcc_handler,
            video.header.quality,
            compression_label(video.is_uncompressed()),
            audio.header.quality,
            compression_label(audio.is_uncompressed()),
        );

        Ok(Streams { video, audio })
    }

    /// Maps a payload chunk id to its category by its two-byte type code.
    /// `dc` chunks of a stream declared uncompressed count as uncompressed
    /// video.
    pub fn category_for(&self, id: FourCC) -> Option<Category> {
        match &id.suffix() {
            b"dc" if self.video.is_uncompressed() => Some(Category::VideoUncompressed),
            b"dc" => Some(Category::VideoCompressed),
            b"db" => Some(Category::VideoUncompressed),
            b"wb" => Some(Category::Audio),
            _ => None,
        }
    }

    pub fn is_compressed(&self, category: Category) -> bool {
        match category {
            Category::Junk | Category::VideoUncompressed => false,
            Category::VideoCompressed => true,
            Category::Audio => !self.audio.is_uncompressed(),
        }
    }
}

fn read_bitmap_info(avi: &[u8], offset: usize, end: usize) -> Option<BitmapInfoHeader> {
    let chunk = match ChunkHeader::read(avi, offset, end) {
        Ok(chunk) if chunk.id == ids::STRF => chunk,
        _ => {
            debug!("no strf chunk follows the video stream header");
            return None;
        }
    };

    let data_start = ChunkHeader::data_offset(offset);
    match BitmapInfoHeader::try_from(&avi[data_start..data_start + chunk.size as usize]) {
        Ok(bitmap_info) => Some(bitmap_info),
        Err(err) => {
            debug!("ignoring video format: {}", err);
            None
        }
    }
}

fn compression_label(uncompressed: bool) -> &'static str {
    if uncompressed {
        "uncompressed"
    } else {
        "compressed"
    }
}
