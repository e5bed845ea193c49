use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("only {distinct} distinct artwork urls gathered, need at least {required}")]
    InsufficientResults { distinct: usize, required: usize },
}

/// Drops every occurrence of a url after its first, keeping the survivors in
/// the order they were first seen.
pub fn dedup_first_seen(urls: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(urls.len());
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

/// Index pair reported by [`ImagePool::swap_random`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub visible_idx: usize,
    pub hidden_idx: usize,
}

/// Partition of the distinct artwork urls into the rendered set and the
/// reserve that rotation draws from. Built on the load worker, then handed
/// to the UI thread whole; nothing else ever holds a reference to it.
///
/// Invariant: the two sets never overlap and their sizes never change after
/// construction; rotation only exchanges one entry of each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePool {
    visible: Vec<String>,
    hidden: Vec<String>,
}

impl ImagePool {
    /// Dedups `candidates` and splits them into `visible_slots` rendered
    /// entries plus a hidden reserve. Fails unless at least one distinct url
    /// is left over for the reserve.
    pub fn partition(candidates: Vec<String>, visible_slots: usize) -> Result<Self, PoolError> {
        let mut distinct = dedup_first_seen(candidates);
        let required = visible_slots + 1;
        if distinct.len() < required {
            return Err(PoolError::InsufficientResults {
                distinct: distinct.len(),
                required,
            });
        }
        let hidden = distinct.split_off(visible_slots);
        Ok(Self {
            visible: distinct,
            hidden,
        })
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    pub fn total(&self) -> usize {
        self.visible.len() + self.hidden.len()
    }

    /// All urls, visible first, so the rendered tiles fill in before the
    /// reserve does.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.visible
            .iter()
            .chain(self.hidden.iter())
            .map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.visible.iter().any(|u| u == url) || self.hidden.iter().any(|u| u == url)
    }

    /// Exchanges one uniformly random visible entry with one uniformly
    /// random hidden entry. Returns the chosen indices, or `None` when
    /// either side is empty.
    pub fn swap_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Swap> {
        if self.visible.is_empty() || self.hidden.is_empty() {
            return None;
        }
        let visible_idx = rng.gen_range(0..self.visible.len());
        let hidden_idx = rng.gen_range(0..self.hidden.len());
        std::mem::swap(&mut self.visible[visible_idx], &mut self.hidden[hidden_idx]);
        Some(Swap {
            visible_idx,
            hidden_idx,
        })
    }
}
