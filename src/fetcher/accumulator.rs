// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Running merge of records from several sources, keyed by chain id

use std::collections::BTreeMap;

use crate::chains::types::{push_unique, Bridge, ChainRecord};

use super::types::SourcedRecord;

/// Merges records as sources are consulted in priority order
///
/// The first source to contribute a chain owns its scalar fields; later
/// sources only fill what is still missing. Collections are unioned.
#[derive(Debug, Default)]
pub struct ChainAccumulator {
    entries: BTreeMap<u64, SourcedRecord>,
}

impl ChainAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one validated record contributed by `source_name`
    pub fn add(&mut self, source_name: &str, record: ChainRecord) {
        match self.entries.get_mut(&record.chain_id) {
            Some(existing) => {
                merge_record(&mut existing.record, record);
                push_unique(&mut existing.sources, source_name.to_string());
            }
            None => {
                self.entries.insert(
                    record.chain_id,
                    SourcedRecord {
                        record,
                        sources: vec![source_name.to_string()],
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in ascending chain id order
    pub fn into_records(self) -> Vec<SourcedRecord> {
        self.entries.into_values().collect()
    }
}

/// Merge a lower-priority record into an existing one for the same chain
pub(crate) fn merge_record(target: &mut ChainRecord, incoming: ChainRecord) {
    for url in incoming.rpc_urls {
        push_unique(&mut target.rpc_urls, url);
    }
    for faucet in incoming.faucets {
        push_unique(&mut target.faucets, faucet);
    }
    for feature in incoming.features {
        push_unique(&mut target.features, feature);
    }
    for flag in incoming.red_flags {
        push_unique(&mut target.red_flags, flag);
    }
    target.tags.extend(incoming.tags);

    if incoming.explorers.len() > target.explorers.len() {
        target.explorers = incoming.explorers;
    }

    merge_bridges(&mut target.bridges, incoming.bridges);

    target.verified |= incoming.verified;

    fill_if_empty(&mut target.short_name, incoming.short_name);
    fill_if_empty(&mut target.network, incoming.network);
    if target.icon.is_none() {
        target.icon = incoming.icon;
    }
    if target.info_url.is_none() {
        target.info_url = incoming.info_url;
    }
    if target.parent.is_none() {
        target.parent = incoming.parent;
    }
}

fn fill_if_empty(target: &mut String, incoming: String) {
    if target.trim().is_empty() {
        *target = incoming;
    }
}

/// Merge bridge lists by `(name, type)`, unioning chains and protocols
pub(crate) fn merge_bridges(target: &mut Vec<Bridge>, incoming: Vec<Bridge>) {
    for bridge in incoming {
        let key = bridge.merge_key();
        match target.iter_mut().find(|b| b.merge_key() == key) {
            Some(existing) => {
                existing.chains.extend(bridge.chains);
                existing.protocols.extend(bridge.protocols);
                if existing.url.is_none() {
                    existing.url = bridge.url;
                }
            }
            None => target.push(bridge),
        }
    }
}
