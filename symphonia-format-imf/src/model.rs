// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The composition data model: the typed tree a CPL parses into, and the asset locator table a
//! set of asset maps merges into.

use std::collections::HashMap;

use uuid::Uuid;

use crate::rational::Rational;

/// Fields shared by every kind of timed resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseResource {
    /// The resource's own sample rate (frames or audio samples per second).
    pub edit_rate: Rational,
    /// Offset into the underlying container, in edit units, at which the resource begins.
    pub entry_point: u64,
    /// The resource's length, in edit units.
    pub duration: u64,
    /// Number of times the resource is played back-to-back. Always `>= 1`.
    pub repeat_count: u64,
}

/// A timed reference into a track-file (essence container) resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFileResource {
    pub base: BaseResource,
    /// Identifies the source container in the asset locator map.
    pub track_file_uuid: Uuid,
}

/// A labeled instant within a resource's timeline, used for cueing and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub scope: String,
    /// Offset in edit units of the containing resource.
    pub offset: u64,
}

/// A timed resource that contributes markers rather than essence.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerResource {
    pub base: BaseResource,
    pub markers: Vec<Marker>,
}

/// An ordered sequence of track-file resources sharing one track identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFileVirtualTrack {
    pub id: Uuid,
    pub resources: Vec<TrackFileResource>,
}

/// An ordered sequence of marker resources.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVirtualTrack {
    pub id: Uuid,
    pub resources: Vec<MarkerResource>,
}

/// A fully parsed Composition Playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub id: Uuid,
    pub content_title: Option<String>,
    pub edit_rate: Rational,
    pub markers: Option<MarkerVirtualTrack>,
    pub image_2d: Option<TrackFileVirtualTrack>,
    pub audios: Vec<TrackFileVirtualTrack>,
}

/// A single asset map entry: an asset UUID resolved to its fully-qualified location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
    pub uuid: Uuid,
    pub absolute_uri: String,
}

/// A merged `UUID -> AssetLocator` table, built by the Asset Map Parser from one or more asset
/// maps. Lookup is by exact UUID equality; backed by a hash table, not a linear scan, so the cost
/// is independent of composition size.
#[derive(Debug, Clone, Default)]
pub struct AssetLocatorMap {
    entries: HashMap<Uuid, AssetLocator>,
}

impl AssetLocatorMap {
    pub fn new() -> Self {
        AssetLocatorMap { entries: HashMap::new() }
    }

    /// Inserts an entry. If `uuid` was already present, the previous entry is replaced and
    /// returned to the caller, who is responsible for logging the duplicate (see the Asset Map
    /// Parser, which is the only production caller of this method).
    pub fn insert(&mut self, locator: AssetLocator) -> Option<AssetLocator> {
        self.entries.insert(locator.uuid, locator)
    }

    pub fn get(&self, uuid: &Uuid) -> Option<&AssetLocator> {
        self.entries.get(uuid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
