pub mod capacity;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod headers;
pub mod riff;
pub mod scanner;
pub mod streams;

mod carrier;
#[cfg(test)]
mod fixture;

pub use capacity::{compute_capacity, Capacity};
pub use decoder::Decoder;
pub use encoder::{Encoder, HideReport};
pub use error::{ParseError, Result, StegError};
pub use scanner::{build_index, Chunk, ChunkIndex};

use std::fmt;

/// Marks the end of a hidden message. A message byte with this value cannot
/// be told apart from the terminator.
pub const SENTINEL: u8 = 0x03;

/// Kind of data region a message can be hidden in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Category {
    Junk,
    VideoCompressed,
    VideoUncompressed,
    Audio,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Junk,
        Category::VideoCompressed,
        Category::VideoUncompressed,
        Category::Audio,
    ];

    fn index(self) -> usize {
        match self {
            Category::Junk => 0,
            Category::VideoCompressed => 1,
            Category::VideoUncompressed => 2,
            Category::Audio => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Junk => "junk",
            Category::VideoCompressed => "compressed video",
            Category::VideoUncompressed => "uncompressed video",
            Category::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// Removes repeated categories, keeping the first occurrence of each.
fn unique(order: &[Category]) -> Vec<Category> {
    let mut seen = Vec::with_capacity(order.len());
    for category in order {
        if !seen.contains(category) {
            seen.push(*category);
        }
    }
    seen
}

mod lsb {
    /// Carrier bytes needed for one message byte.
    pub const GROUP_SIZE: usize = 8;

    pub fn split_byte(byte: u8) -> [u8; GROUP_SIZE] {
        [
            (byte >> 7) & 0x01,
            (byte >> 6) & 0x01,
            (byte >> 5) & 0x01,
            (byte >> 4) & 0x01,
            (byte >> 3) & 0x01,
            (byte >> 2) & 0x01,
            (byte >> 1) & 0x01,
            byte & 0x01,
        ]
    }

    pub fn zip_bit(carrier: u8, bit: u8) -> u8 {
        (carrier & 0xFE) | (bit & 0x01)
    }

    /// Writes `byte` into the low bits of the 8 carrier bytes in `group`,
    /// most significant bit first.
    pub fn embed_byte(group: &mut [u8], byte: u8) {
        group
            .iter_mut()
            .zip(split_byte(byte).iter())
            .for_each(|(carrier, bit)| *carrier = zip_bit(*carrier, *bit));
    }

    pub fn merge_bits(group: &[u8]) -> u8 {
        (group[0] << 7) & 0x80
            | (group[1] << 6) & 0x40
            | (group[2] << 5) & 0x20
            | (group[3] << 4) & 0x10
            | (group[4] << 3) & 0x08
            | (group[5] << 2) & 0x04
            | (group[6] << 1) & 0x02
            | (group[7] & 0x01)
    }

}

#[cfg(test)]
mod tests {
    use super::fixture::{chunk, list, payload, AviBuilder};
    use super::*;

    #[test]
    fn test_hello_in_single_junk_chunk() {
        let mut avi = AviBuilder::new().junk(64).build();
        let index = build_index(&avi).expect("no error");

        let capacity = compute_capacity(&index, &[Category::Junk]);
        assert_eq!(8, capacity.total_bytes);

        let report = Encoder::new(false)
            .hide(&mut avi, &index, "HELLO", &[Category::Junk])
            .expect("no error");
        assert_eq!(6, report.bytes_embedded);
        assert_eq!(1, report.chunks_used);

        let message = Decoder::new(false)
            .extract(&avi, &index, &[Category::Junk])
            .expect("no error");
        assert_eq!("HELLO", message);
    }

    #[test]
    fn test_round_trip_across_categories() {
        let mut avi = AviBuilder::new()
            .junk(40)
            .movi(vec![
                chunk(b"00dc", &payload(48)),
                list(
                    b"rec ",
                    &[chunk(b"01wb", &payload(33)), chunk(b"00dc", &payload(97))],
                ),
                chunk(b"01wb", &payload(64)),
            ])
            .build();
        let original = avi.clone();
        let index = build_index(&avi).expect("no error");

        let order = [Category::Audio, Category::Junk, Category::VideoUncompressed];
        let message = "The quick brown fox jumps";

        let report = Encoder::new(false)
            .hide(&mut avi, &index, message, &order)
            .expect("no error");
        assert_eq!(message.len() + 1, report.bytes_embedded);
        assert!(report.skipped.is_empty());

        // audio carries 3 + 7 groups, junk 4, video the rest
        assert_eq!(5, report.chunks_used);
        assert_ne!(original, avi);

        let extracted = Decoder::new(false)
            .extract(&avi, &index, &order)
            .expect("no error");
        assert_eq!(message, extracted);
    }

    #[test]
    fn test_only_low_bits_change() {
        let mut avi = AviBuilder::new()
            .junk(128)
            .movi(vec![chunk(b"00db", &payload(256))])
            .build();
        let original = avi.clone();
        let index = build_index(&avi).expect("no error");

        Encoder::new(false)
            .hide(
                &mut avi,
                &index,
                "low bits only",
                &[Category::VideoUncompressed, Category::Junk],
            )
            .expect("no error");

        assert_eq!(original.len(), avi.len());
        avi.iter()
            .zip(original.iter())
            .for_each(|(changed, before)| assert_eq!(changed & 0xFE, before & 0xFE));
    }

    #[test]
    fn test_latin1_round_trip() {
        let mut avi = AviBuilder::new().junk(256).build();
        let index = build_index(&avi).expect("no error");

        let before = avi.clone();
        let result = Encoder::new(false).hide(&mut avi, &index, "café Ž", &[Category::Junk]);
        assert_eq!(
            Err(StegError::UnsupportedCharacter {
                ch: 'Ž',
                position: 5
            }),
            result
        );
        assert_eq!(before, avi);

        Encoder::new(false)
            .hide(&mut avi, &index, "café ÿ", &[Category::Junk])
            .expect("no error");
        assert_eq!(
            "café ÿ",
            Decoder::new(false)
                .extract(&avi, &index, &[Category::Junk])
                .expect("no error")
        );
    }
}
