// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use smol_str::SmolStr;

use super::cell::Cell;

/// Id of the implicit root cell every document carries.
pub const ROOT_CELL_ID: &str = "0";
/// Id of the implicit default layer (child of the root cell).
pub const LAYER_CELL_ID: &str = "1";

/// Set of cell ids that edge endpoints may legally point at.
///
/// Always seeded with the two structural ids ([`ROOT_CELL_ID`], [`LAYER_CELL_ID`]), because
/// those cells live in the document envelope rather than in a fragment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSet {
    ids: HashSet<SmolStr>,
}

impl IdSet {
    pub fn new() -> Self {
        let mut ids = HashSet::new();
        ids.insert(SmolStr::new_static(ROOT_CELL_ID));
        ids.insert(SmolStr::new_static(LAYER_CELL_ID));
        Self { ids }
    }

    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(SmolStr::new(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(SmolStr::as_str)
    }
}

impl Default for IdSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Extend<&'a str> for IdSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<'a> FromIterator<&'a str> for IdSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Collects the id of every cell (cells without an `id` attribute contribute nothing).
pub fn collect_ids(cells: &[Cell]) -> IdSet {
    cells.iter().filter_map(Cell::id).collect()
}
