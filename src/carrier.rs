//! Carrier layout shared by hiding and extraction. Both directions must walk
//! exactly the same bytes in the same order, so the layout is computed in
//! one place.

use crate::error::ParseError;
use crate::lsb::GROUP_SIZE;
use crate::scanner::ChunkIndex;
use crate::{unique, Category};
use log::{debug, warn};
use std::ops::Range;

/// Groups of 8 payload bytes a chunk lends to the message. The last whole
/// group of every chunk is held back.
pub fn carrier_groups(data_size: usize) -> usize {
    (data_size / GROUP_SIZE).saturating_sub(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierPlan {
    /// Categories that passed the compression gate, in caller order.
    pub categories: Vec<Category>,
    /// Categories refused because their stream is compressed and has chunks.
    pub skipped: Vec<Category>,
    /// Byte ranges of the carried region of each chunk, each a whole number
    /// of groups.
    pub regions: Vec<Range<usize>>,
}

impl CarrierPlan {
    pub fn new(index: &ChunkIndex, order: &[Category], force: bool) -> Self {
        let mut plan = CarrierPlan {
            categories: Vec::new(),
            skipped: Vec::new(),
            regions: Vec::new(),
        };

        for category in unique(order) {
            // A category without chunks carries nothing and is never gated.
            if index.is_compressed(category) && !index.chunks(category).is_empty() {
                if force {
                    warn!("using {} chunks of a compressed stream due to force", category);
                } else {
                    warn!(
                        "skipping {} chunks, their stream is compressed and force is off",
                        category
                    );
                    plan.skipped.push(category);
                    continue;
                }
            }

            plan.categories.push(category);
            plan.regions.extend(
                index
                    .chunks(category)
                    .iter()
                    .map(|chunk| (chunk.data_offset, carrier_groups(chunk.data_size)))
                    .filter(|(_, groups)| *groups > 0)
                    .map(|(start, groups)| start..start + groups * GROUP_SIZE),
            );
        }

        debug!(
            "carrier plan: {} regions, {} groups",
            plan.regions.len(),
            plan.groups()
        );

        plan
    }

    /// Message bytes the plan can carry.
    pub fn groups(&self) -> usize {
        self.regions
            .iter()
            .map(|region| (region.end - region.start) / GROUP_SIZE)
            .sum()
    }

    /// Rejects a plan built from an index of a different, shorter buffer.
    pub fn check_bounds(&self, len: usize) -> Result<(), ParseError> {
        match self.regions.iter().find(|region| region.end > len) {
            Some(region) => Err(ParseError::malformed(
                crate::riff::ids::RIFF,
                region.start,
                format!("chunk data runs past the end of the {} byte buffer", len),
            )),
            None => Ok(()),
        }
    }
}
