//! Suffix (upgrade) item lookup
//!
//! Items may reference a slotted upgrade by id. Provider data is not trusted
//! to be acyclic, so every walk tracks the ids it has visited and is bounded
//! in depth.

use std::collections::HashSet;

use super::item::Item;
use super::record::ItemId;
use crate::resolver::ItemResolver;

/// Resolves suffix references through an [`ItemResolver`]
pub struct SuffixResolver<'a> {
    resolver: &'a ItemResolver,
    max_depth: usize,
}

impl<'a> SuffixResolver<'a> {
    pub fn new(resolver: &'a ItemResolver, max_depth: usize) -> Self {
        Self { resolver, max_depth }
    }

    /// The item slotted into `item`, if any and if it resolves
    pub fn resolve_suffix(&self, item: &Item) -> Option<Item> {
        let mut visiting = HashSet::from([item.id()]);
        self.step(item, &mut visiting, 0)
    }

    /// Follow suffix references until one is missing, repeats, or the depth
    /// limit is reached. `item` itself is not included.
    pub fn suffix_chain(&self, item: &Item) -> Vec<Item> {
        let mut visiting = HashSet::from([item.id()]);
        let mut chain: Vec<Item> = Vec::new();

        loop {
            let current = chain.last().unwrap_or(item);
            match self.step(current, &mut visiting, chain.len()) {
                Some(next) => chain.push(next),
                None => break,
            }
        }

        chain
    }

    fn step(&self, item: &Item, visiting: &mut HashSet<ItemId>, depth: usize) -> Option<Item> {
        let suffix_id = item.suffix_item_id()?;

        if depth >= self.max_depth {
            log::warn!(
                "Suffix chain from item {} exceeds {} hops, stopping",
                item.id(),
                self.max_depth
            );
            return None;
        }

        if !visiting.insert(suffix_id) {
            log::warn!("Suffix cycle: item {} points back to {}", item.id(), suffix_id);
            return None;
        }

        self.resolver.resolve(suffix_id)
    }
}
