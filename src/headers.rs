//! Fixed-layout AVI header structures.
//!
//! Each reader takes the payload of its chunk (the bytes after the 8-byte
//! chunk header) and decodes little-endian fields at fixed offsets.

use crate::riff::FourCC;
use byteorder::{LittleEndian, ReadBytesExt};
use std::convert::TryFrom;
use std::io::{Cursor, Read};

pub const AVI_MAIN_HEADER_LENGTH: usize = 40;
pub const STREAM_HEADER_MIN_LENGTH: usize = 48;
pub const STREAM_HEADER_LENGTH: usize = 56;
pub const BITMAP_INFO_HEADER_LENGTH: usize = 40;

/// `dwQuality` value taken to mean a stream is stored uncompressed.
pub const UNCOMPRESSED_QUALITY: u32 = 10000;

/// `avih` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AviMainHeader {
    pub micro_sec_per_frame: u32,
    pub max_bytes_per_sec: u32,
    pub padding_granularity: u32,
    pub flags: u32,
    pub total_frames: u32,
    pub initial_frames: u32,
    pub streams: u32,
    pub suggested_buffer_size: u32,
    pub width: u32,
    pub height: u32,
}

impl AviMainHeader {
    pub fn frame_rate(&self) -> f64 {
        if self.micro_sec_per_frame > 0 {
            1_000_000.0 / self.micro_sec_per_frame as f64
        } else {
            0.0
        }
    }
}

impl TryFrom<&[u8]> for AviMainHeader {
    type Error = String;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() < AVI_MAIN_HEADER_LENGTH {
            return Err(format!(
                "main header is {} bytes, expected at least {}",
                data.len(),
                AVI_MAIN_HEADER_LENGTH
            ));
        }

        let mut cursor = Cursor::new(data);
        let mut next = || read_u32(&mut cursor);

        Ok(AviMainHeader {
            micro_sec_per_frame: next()?,
            max_bytes_per_sec: next()?,
            padding_granularity: next()?,
            flags: next()?,
            total_frames: next()?,
            initial_frames: next()?,
            streams: next()?,
            suggested_buffer_size: next()?,
            width: next()?,
            height: next()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

/// `strh` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AviStreamHeader {
    pub fcc_type: FourCC,
    pub fcc_handler: FourCC,
    pub flags: u32,
    pub priority: u16,
    pub language: u16,
    pub initial_frames: u32,
    pub scale: u32,
    pub rate: u32,
    pub start: u32,
    pub length: u32,
    pub suggested_buffer_size: u32,
    pub quality: u32,
    pub sample_size: u32,
    pub frame: Rect,
}

impl AviStreamHeader {
    /// Frames (or samples) per second as declared by `rate / scale`.
    pub fn frame_rate(&self) -> f64 {
        if self.scale > 0 {
            self.rate as f64 / self.scale as f64
        } else {
            0.0
        }
    }

    // dwQuality is the only signal used here; it is a heuristic, not a
    // documented compression flag.
    pub fn is_uncompressed(&self) -> bool {
        self.quality == UNCOMPRESSED_QUALITY
    }
}

impl TryFrom<&[u8]> for AviStreamHeader {
    type Error = String;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() < STREAM_HEADER_MIN_LENGTH {
            return Err(format!(
                "stream header is {} bytes, expected at least {}",
                data.len(),
                STREAM_HEADER_MIN_LENGTH
            ));
        }

        let mut cursor = Cursor::new(data);
        let fcc_type = read_fourcc(&mut cursor)?;
        let fcc_handler = read_fourcc(&mut cursor)?;
        let flags = read_u32(&mut cursor)?;
        let priority = read_u16(&mut cursor)?;
        let language = read_u16(&mut cursor)?;
        let initial_frames = read_u32(&mut cursor)?;
        let scale = read_u32(&mut cursor)?;
        let rate = read_u32(&mut cursor)?;
        let start = read_u32(&mut cursor)?;
        let length = read_u32(&mut cursor)?;
        let suggested_buffer_size = read_u32(&mut cursor)?;
        let quality = read_u32(&mut cursor)?;
        let sample_size = read_u32(&mut cursor)?;

        // Older writers emit the 48-byte variant without rcFrame.
        let frame = if data.len() >= STREAM_HEADER_LENGTH {
            Rect {
                left: read_i16(&mut cursor)?,
                top: read_i16(&mut cursor)?,
                right: read_i16(&mut cursor)?,
                bottom: read_i16(&mut cursor)?,
            }
        } else {
            Rect::default()
        };

        Ok(AviStreamHeader {
            fcc_type,
            fcc_handler,
            flags,
            priority,
            language,
            initial_frames,
            scale,
            rate,
            start,
            length,
            suggested_buffer_size,
            quality,
            sample_size,
            frame,
        })
    }
}

/// Windows BITMAPINFOHEADER, carried by the video stream's `strf` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: FourCC,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
}

impl TryFrom<&[u8]> for BitmapInfoHeader {
    type Error = String;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() < BITMAP_INFO_HEADER_LENGTH {
            return Err(format!(
                "bitmap info header is {} bytes, expected {}",
                data.len(),
                BITMAP_INFO_HEADER_LENGTH
            ));
        }

        let mut cursor = Cursor::new(data);

        Ok(BitmapInfoHeader {
            size: read_u32(&mut cursor)?,
            width: read_i32(&mut cursor)?,
            height: read_i32(&mut cursor)?,
            planes: read_u16(&mut cursor)?,
            bit_count: read_u16(&mut cursor)?,
            compression: read_fourcc(&mut cursor)?,
            size_image: read_u32(&mut cursor)?,
            x_pels_per_meter: read_i32(&mut cursor)?,
            y_pels_per_meter: read_i32(&mut cursor)?,
            clr_used: read_u32(&mut cursor)?,
            clr_important: read_u32(&mut cursor)?,
        })
    }
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, String> {
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|err| err.to_string())
}

fn read_i32(cursor: &mut Cursor<&[u8]>) -> Result<i32, String> {
    cursor
        .read_i32::<LittleEndian>()
        .map_err(|err| err.to_string())
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, String> {
    cursor
        .read_u16::<LittleEndian>()
        .map_err(|err| err.to_string())
}

fn read_i16(cursor: &mut Cursor<&[u8]>) -> Result<i16, String> {
    cursor
        .read_i16::<LittleEndian>()
        .map_err(|err| err.to_string())
}

fn read_fourcc(cursor: &mut Cursor<&[u8]>) -> Result<FourCC, String> {
    let mut bytes = [0u8; 4];
    cursor
        .read_exact(&mut bytes)
        .map_err(|err| err.to_string())?;
    Ok(FourCC(bytes))
}
