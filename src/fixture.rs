//! Synthetic AVI buffers for unit tests.

use crate::headers::UNCOMPRESSED_QUALITY;

pub fn payload(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i * 37 + 11) as u8).collect()
}

pub fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + data.len() + 1);
    out.extend_from_slice(id);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 != 0 {
        out.push(0);
    }
    out
}

pub fn list(list_type: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut body = list_type.to_vec();
    children.iter().for_each(|child| body.extend_from_slice(child));

    let mut out = b"LIST".to_vec();
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

pub fn main_header_bytes(width: u32, height: u32, streams: u32) -> Vec<u8> {
    let mut avih = Vec::new();
    avih.extend_from_slice(&40_000u32.to_le_bytes()); // micro sec per frame
    avih.extend_from_slice(&0u32.to_le_bytes()); // max bytes per sec
    avih.extend_from_slice(&0u32.to_le_bytes()); // padding granularity
    avih.extend_from_slice(&0x10u32.to_le_bytes()); // flags
    avih.extend_from_slice(&10u32.to_le_bytes()); // total frames
    avih.extend_from_slice(&0u32.to_le_bytes()); // initial frames
    avih.extend_from_slice(&streams.to_le_bytes());
    avih.extend_from_slice(&0u32.to_le_bytes()); // suggested buffer size
    avih.extend_from_slice(&width.to_le_bytes());
    avih.extend_from_slice(&height.to_le_bytes());
    avih.extend_from_slice(&[0u8; 16]); // reserved
    avih
}

pub fn stream_header_bytes(fcc_type: &[u8; 4], handler: &[u8; 4], quality: u32) -> Vec<u8> {
    let mut strh = Vec::new();
    strh.extend_from_slice(fcc_type);
    strh.extend_from_slice(handler);
    strh.extend_from_slice(&0u32.to_le_bytes()); // flags
    strh.extend_from_slice(&0u16.to_le_bytes()); // priority
    strh.extend_from_slice(&0u16.to_le_bytes()); // language
    strh.extend_from_slice(&0u32.to_le_bytes()); // initial frames
    strh.extend_from_slice(&1u32.to_le_bytes()); // scale
    strh.extend_from_slice(&25u32.to_le_bytes()); // rate
    strh.extend_from_slice(&0u32.to_le_bytes()); // start
    strh.extend_from_slice(&10u32.to_le_bytes()); // length
    strh.extend_from_slice(&0u32.to_le_bytes()); // suggested buffer size
    strh.extend_from_slice(&quality.to_le_bytes());
    strh.extend_from_slice(&0u32.to_le_bytes()); // sample size
    strh.extend_from_slice(&0i16.to_le_bytes());
    strh.extend_from_slice(&0i16.to_le_bytes());
    strh.extend_from_slice(&320i16.to_le_bytes());
    strh.extend_from_slice(&240i16.to_le_bytes());
    strh
}

fn bitmap_info_bytes() -> Vec<u8> {
    let mut strf = Vec::new();
    strf.extend_from_slice(&40u32.to_le_bytes());
    strf.extend_from_slice(&320i32.to_le_bytes());
    strf.extend_from_slice(&240i32.to_le_bytes());
    strf.extend_from_slice(&1u16.to_le_bytes());
    strf.extend_from_slice(&24u16.to_le_bytes());
    strf.extend_from_slice(&[0u8; 4]); // BI_RGB
    strf.extend_from_slice(&(320u32 * 240 * 3).to_le_bytes());
    strf.extend_from_slice(&[0u8; 16]);
    strf
}

fn wave_format_bytes() -> Vec<u8> {
    let mut strf = Vec::new();
    strf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    strf.extend_from_slice(&1u16.to_le_bytes()); // channels
    strf.extend_from_slice(&8000u32.to_le_bytes());
    strf.extend_from_slice(&8000u32.to_le_bytes());
    strf.extend_from_slice(&1u16.to_le_bytes());
    strf.extend_from_slice(&8u16.to_le_bytes());
    strf
}

pub struct AviBuilder {
    video_quality: Option<u32>,
    audio_quality: Option<u32>,
    junk: Vec<usize>,
    movi: Option<Vec<Vec<u8>>>,
}

impl AviBuilder {
    pub fn new() -> Self {
        Self {
            video_quality: Some(UNCOMPRESSED_QUALITY),
            audio_quality: Some(UNCOMPRESSED_QUALITY),
            junk: Vec::new(),
            movi: None,
        }
    }

    pub fn video_quality(mut self, quality: Option<u32>) -> Self {
        self.video_quality = quality;
        self
    }

    pub fn audio_quality(mut self, quality: Option<u32>) -> Self {
        self.audio_quality = quality;
        self
    }

    /// Adds a top-level JUNK chunk of `size` payload bytes after `hdrl`.
    pub fn junk(mut self, size: usize) -> Self {
        self.junk.push(size);
        self
    }

    /// Sets the children of the `movi` list.
    pub fn movi(mut self, children: Vec<Vec<u8>>) -> Self {
        self.movi = Some(children);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut hdrl = vec![chunk(b"avih", &main_header_bytes(320, 240, 2))];

        if let Some(quality) = self.video_quality {
            hdrl.push(list(
                b"strl",
                &[
                    chunk(b"strh", &stream_header_bytes(b"vids", b"DIB ", quality)),
                    chunk(b"strf", &bitmap_info_bytes()),
                ],
            ));
        }

        if let Some(quality) = self.audio_quality {
            hdrl.push(list(
                b"strl",
                &[
                    chunk(b"strh", &stream_header_bytes(b"auds", b"\0\0\0\0", quality)),
                    chunk(b"strf", &wave_format_bytes()),
                ],
            ));
        }

        let mut body = b"AVI ".to_vec();
        body.extend_from_slice(&list(b"hdrl", &hdrl));

        for size in self.junk {
            body.extend_from_slice(&chunk(b"JUNK", &payload(size)));
        }

        if let Some(children) = self.movi {
            body.extend_from_slice(&list(b"movi", &children));
        }

        let mut avi = b"RIFF".to_vec();
        avi.extend_from_slice(&(body.len() as u32).to_le_bytes());
        avi.extend_from_slice(&body);
        avi
    }
}
