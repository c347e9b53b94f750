use crate::carrier::CarrierPlan;
use crate::error::{Result, StegError};
use crate::lsb::{self, GROUP_SIZE};
use crate::scanner::ChunkIndex;
use crate::{Category, SENTINEL};
use log::debug;

pub struct Decoder {
    force: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Decoder {
    /// `force` must match the flag the message was hidden with, otherwise
    /// compressed categories are walked differently.
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    /// Recovers the message hidden in the categories of `order`, reading
    /// them in that order up to the sentinel.
    pub fn extract(&self, avi: &[u8], index: &ChunkIndex, order: &[Category]) -> Result<String> {
        let plan = CarrierPlan::new(index, order, self.force);
        plan.check_bounds(avi.len())?;

        let mut message = String::new();

        for region in plan.regions.iter() {
            for group in avi[region.clone()].chunks_exact(GROUP_SIZE) {
                let byte = lsb::merge_bits(group);
                if byte == SENTINEL {
                    debug!("found end marker after {} bytes", message.len());
                    return Ok(message);
                }
                message.push(byte as char);
            }
        }

        debug!(
            "no end marker in {} carrier groups of the selected streams",
            plan.groups()
        );
        Err(StegError::MessageNotFound)
    }
}
