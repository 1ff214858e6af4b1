//! Section grid covering the processing region with per-section coverage tracking
//!
//! Every section owns one bit in a processed bitset. Unprocessed sections are
//! additionally kept in a dense pool so a uniformly random unprocessed section
//! can be chosen and retired in O(1) via swap-remove, which is observably the
//! same as filtering the full grid and picking uniformly from the result.

use crate::io::error::{Result, invalid_parameter};
use bitvec::prelude::*;
use rand::Rng;

// Pool slot recorded for sections that are not in the unprocessed pool
const NOT_POOLED: usize = usize::MAX;

/// One fixed-size square of the processing region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Section {
    /// Column of the section in the grid
    pub grid_x: u32,
    /// Row of the section in the grid
    pub grid_y: u32,
    /// Whether the section has been drawn since the last reset
    pub processed: bool,
}

/// Grid of sections with processed flags and a random-access unprocessed pool
#[derive(Clone, Debug)]
pub struct RegionGrid {
    section_size: u32,
    cols: u32,
    rows: u32,
    processed: BitVec,
    unprocessed: Vec<usize>,
    pool_slot: Vec<usize>,
}

impl RegionGrid {
    /// Partition a `width`×`height` region into `section_size` squares
    ///
    /// Edge sections are clamped when the region is not an exact multiple of
    /// the section size.
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension or the section size is zero.
    pub fn new(width: u32, height: u32, section_size: u32) -> Result<Self> {
        if section_size == 0 {
            return Err(invalid_parameter(
                "section_size",
                &section_size,
                &"must be positive",
            ));
        }
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "region",
                &format!("{width}x{height}"),
                &"processing region must have positive area",
            ));
        }

        let cols = width.div_ceil(section_size);
        let rows = height.div_ceil(section_size);
        let len = cols as usize * rows as usize;

        Ok(Self {
            section_size,
            cols,
            rows,
            processed: bitvec![0; len],
            unprocessed: (0..len).collect(),
            pool_slot: (0..len).collect(),
        })
    }

    /// Section edge length in pixels
    pub const fn section_size(&self) -> u32 {
        self.section_size
    }

    /// Number of section columns
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of section rows
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of sections
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    /// Test if the grid has no sections
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Sections drawn since the last reset
    pub fn processed_count(&self) -> usize {
        self.processed.count_ones()
    }

    /// Sections still waiting to be drawn
    pub fn unprocessed_count(&self) -> usize {
        self.unprocessed.len()
    }

    /// Fraction of sections processed, in `[0, 1]`
    pub fn coverage(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.processed_count() as f64 / self.len() as f64
    }

    /// Test if every section has been processed
    pub fn is_complete(&self) -> bool {
        self.unprocessed.is_empty()
    }

    /// Test whether the section at `index` has been processed
    pub fn is_processed(&self, index: usize) -> bool {
        self.processed.get(index).as_deref() == Some(&true)
    }

    /// Section at a linear index (row-major)
    pub fn section(&self, index: usize) -> Option<Section> {
        if index >= self.len() {
            return None;
        }
        let cols = self.cols as usize;
        Some(Section {
            grid_x: (index % cols) as u32,
            grid_y: (index / cols) as u32,
            processed: self.is_processed(index),
        })
    }

    /// Linear index of the section at grid coordinates
    pub const fn index_of(&self, grid_x: u32, grid_y: u32) -> Option<usize> {
        if grid_x >= self.cols || grid_y >= self.rows {
            return None;
        }
        Some(grid_y as usize * self.cols as usize + grid_x as usize)
    }

    /// Top-left pixel of the section at `index`
    pub fn origin(&self, index: usize) -> Option<(u32, u32)> {
        self.section(index).map(|section| {
            (
                section.grid_x * self.section_size,
                section.grid_y * self.section_size,
            )
        })
    }

    /// All sections in row-major order
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        (0..self.len()).filter_map(|index| self.section(index))
    }

    /// Linear indices of the sections still waiting to be drawn, in no fixed order
    pub fn unprocessed_indices(&self) -> &[usize] {
        &self.unprocessed
    }

    /// Uniformly choose one unprocessed section without marking it
    pub fn choose_unprocessed<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.unprocessed.is_empty() {
            return None;
        }
        let slot = rng.random_range(0..self.unprocessed.len());
        self.unprocessed.get(slot).copied()
    }

    /// Mark a section processed and retire it from the pool
    ///
    /// Returns `false` if the index is out of range or already processed.
    pub fn mark_processed(&mut self, index: usize) -> bool {
        if index >= self.len() || self.is_processed(index) {
            return false;
        }

        let slot = self.pool_slot.get(index).copied().unwrap_or(NOT_POOLED);
        if slot >= self.unprocessed.len() {
            return false;
        }

        self.unprocessed.swap_remove(slot);
        if let Some(&moved) = self.unprocessed.get(slot) {
            if let Some(moved_slot) = self.pool_slot.get_mut(moved) {
                *moved_slot = slot;
            }
        }
        if let Some(own_slot) = self.pool_slot.get_mut(index) {
            *own_slot = NOT_POOLED;
        }
        self.processed.set(index, true);
        true
    }

    /// Clear every processed flag and restore the full pool
    pub fn reset(&mut self) {
        let len = self.len();
        self.processed.fill(false);
        self.unprocessed.clear();
        self.unprocessed.extend(0..len);
        self.pool_slot.clear();
        self.pool_slot.extend(0..len);
    }
}
