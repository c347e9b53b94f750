use crate::lsb::GROUP_SIZE;
use crate::scanner::{Chunk, ChunkIndex};
use crate::{unique, Category};

/// Embedding capacity of the selected categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capacity {
    /// Whole message bytes per category, in selection order.
    pub per_category: Vec<(Category, usize)>,
    pub total_bytes: usize,
}

impl Capacity {
    pub fn bytes(&self, category: Category) -> Option<usize> {
        self.per_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, bytes)| *bytes)
    }
}

/// One payload byte carries one bit, so only whole groups of 8 count.
pub fn usable_bits(chunk: &Chunk) -> usize {
    chunk.data_size - chunk.data_size % GROUP_SIZE
}

pub fn category_bits(chunks: &[Chunk]) -> usize {
    chunks.iter().map(usable_bits).sum()
}

pub fn compute_capacity(index: &ChunkIndex, categories: &[Category]) -> Capacity {
    let mut total_bits = 0;
    let per_category: Vec<(Category, usize)> = unique(categories)
        .into_iter()
        .map(|category| {
            let bits = category_bits(index.chunks(category));
            total_bits += bits;
            (category, bits / GROUP_SIZE)
        })
        .collect();

    Capacity {
        per_category,
        total_bytes: total_bits / GROUP_SIZE,
    }
}
