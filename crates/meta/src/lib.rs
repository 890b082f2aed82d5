#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `meta` resolves numeric user and group ids to names for the report
//! renderers. Lookups go through the re-entrant `getpwuid_r`/`getgrgid_r`
//! interfaces and fall back to the decimal id when the databases have no
//! entry, so a report never fails over an unresolvable owner.
//!
//! # Design
//!
//! [`NameCache`] memoises each id the first time it is asked for; a diff over
//! a large tree typically touches a handful of distinct owners, so every
//! subsequent entry is a map hit.

mod id_lookup;

use std::collections::HashMap;

/// Cache of uid/gid → name resolutions.
#[derive(Debug, Default)]
pub struct NameCache {
    users: HashMap<u32, String>,
    groups: HashMap<u32, String>,
}

impl NameCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name of `uid`, or its decimal form when unknown.
    pub fn user_name(&mut self, uid: u32) -> &str {
        self.users.entry(uid).or_insert_with(|| {
            id_lookup::lookup_user_name(uid).unwrap_or_else(|| uid.to_string())
        })
    }

    /// Returns the name of `gid`, or its decimal form when unknown.
    pub fn group_name(&mut self, gid: u32) -> &str {
        self.groups.entry(gid).or_insert_with(|| {
            id_lookup::lookup_group_name(gid).unwrap_or_else(|| gid.to_string())
        })
    }
}
