use crate::capacity::compute_capacity;
use crate::carrier::CarrierPlan;
use crate::error::{Result, StegError};
use crate::lsb::{self, GROUP_SIZE};
use crate::scanner::ChunkIndex;
use crate::{Category, SENTINEL};
use log::{debug, warn};

/// Outcome of a successful hide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HideReport {
    /// Message bytes written, sentinel included.
    pub bytes_embedded: usize,
    pub chunks_used: usize,
    /// Categories left out by the compression gate.
    pub skipped: Vec<Category>,
}

pub struct Encoder {
    force: bool,
}

impl Encoder {
    /// `force` allows writing into streams classified as compressed.
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    /// Hides `message` in the chunks of the categories in `order`, walking
    /// them in that order. Either the whole message and its sentinel are
    /// written, or `avi` is left untouched.
    pub fn hide(
        &self,
        avi: &mut [u8],
        index: &ChunkIndex,
        message: &str,
        order: &[Category],
    ) -> Result<HideReport> {
        let encoded = self.encode_message(message)?;
        let plan = CarrierPlan::new(index, order, self.force);
        plan.check_bounds(avi.len())?;

        self.check_utilisation(index, &plan, &encoded)?;

        let chunks_used = self.merge_into(avi, &plan, &encoded);
        debug!(
            "embedded {} bytes in {} chunks",
            encoded.len(),
            chunks_used
        );

        Ok(HideReport {
            bytes_embedded: encoded.len(),
            chunks_used,
            skipped: plan.skipped,
        })
    }

    // Widens every character to one byte and appends the sentinel.
    fn encode_message(&self, message: &str) -> Result<Vec<u8>> {
        let mut encoded = Vec::with_capacity(message.len() + 1);

        for (position, ch) in message.chars().enumerate() {
            if ch as u32 > 0xFF {
                return Err(StegError::UnsupportedCharacter { ch, position });
            }
            encoded.push(ch as u8);
        }

        if let Some(position) = encoded.iter().position(|&b| b == SENTINEL) {
            warn!(
                "message contains the end marker at position {}, extraction will stop there",
                position
            );
        }

        encoded.push(SENTINEL);
        Ok(encoded)
    }

    // Make sure the message fits into the selected chunks before touching them
    fn check_utilisation(
        &self,
        index: &ChunkIndex,
        plan: &CarrierPlan,
        encoded: &[u8],
    ) -> Result<()> {
        let capacity = compute_capacity(index, &plan.categories);

        for (category, bytes) in capacity.per_category.iter() {
            debug!("available {} space: {}B", category, bytes);
        }
        debug!(
            "message size: {}B, capacity: {}B, carrier groups: {}",
            encoded.len(),
            capacity.total_bytes,
            plan.groups()
        );

        if capacity.total_bytes <= encoded.len() {
            return Err(StegError::InsufficientSpace {
                needed: encoded.len(),
                available: capacity.total_bytes,
            });
        }

        // Every chunk holds one group back, so the plan may still fall short.
        if plan.groups() < encoded.len() {
            return Err(StegError::InsufficientSpace {
                needed: encoded.len(),
                available: plan.groups(),
            });
        }

        Ok(())
    }

    fn merge_into(&self, avi: &mut [u8], plan: &CarrierPlan, encoded: &[u8]) -> usize {
        let mut remaining = encoded;
        let mut chunks_used = 0;

        for region in plan.regions.iter() {
            if remaining.is_empty() {
                break;
            }

            let mut written = 0;
            for (group, byte) in avi[region.clone()]
                .chunks_exact_mut(GROUP_SIZE)
                .zip(remaining.iter())
            {
                lsb::embed_byte(group, *byte);
                written += 1;
            }

            remaining = &remaining[written..];
            chunks_used += 1;
        }

        chunks_used
    }
}
