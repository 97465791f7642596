// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Expands a declared virtual track's resources into a playback-order runtime context.
//!
//! A [`ResourcePlaybackCtx`] holds an owned copy of the small, `Copy` resource metadata plus its
//! resolved URI rather than a borrow into the parent `Composition`/`AssetLocatorMap`: the
//! scheduler and its tracks are siblings owned by the same `ImfReader`, and Rust cannot express
//! that sibling borrow safely without `unsafe`, which this workspace forbids. Cloning a `Copy`
//! struct and a resolved URI string is cheap at the scale this crate targets (per-resource, not
//! per-packet).

use symphonia_core::errors::{decode_error, Result};
use symphonia_core::formats::{FormatOptions, FormatReader};

use crate::model::{AssetLocatorMap, TrackFileResource, TrackFileVirtualTrack};
use crate::opener::ChildOpener;
use crate::rational::Rational;
use crate::resource_opener::open_resource;

/// Runtime state for one expanded resource instance within a track.
pub struct ResourcePlaybackCtx {
    pub resolved_uri: String,
    pub resource: TrackFileResource,
    pub child_demuxer: Option<Box<dyn FormatReader>>,
}

impl ResourcePlaybackCtx {
    fn new(resolved_uri: String, resource: TrackFileResource) -> Self {
        ResourcePlaybackCtx { resolved_uri, resource, child_demuxer: None }
    }
}

/// Runtime playback state for one virtual track.
pub struct VirtualTrackPlaybackCtx {
    pub index: u32,
    pub current_timestamp: Rational,
    pub duration: Rational,
    pub resources: Vec<ResourcePlaybackCtx>,
    pub current_resource_index: u32,
    pub last_pts: i64,
    /// A floor on the next resource index the scheduler will activate, bumped past a resource
    /// that reported end-of-stream before the composition clock predicted it should. Locating the
    /// active resource purely from `current_timestamp` would otherwise pick the same, exhausted
    /// resource forever.
    pub forced_min_resource_index: usize,
}

/// Expands `declared`'s resources (honoring `repeat_count`) into a fresh playback context,
/// eager-opening only the very first resource instance so its stream parameters are available
/// to populate the composition's published output stream.
pub fn build_track(
    declared: &TrackFileVirtualTrack,
    assets: &AssetLocatorMap,
    index: u32,
    opener: &dyn ChildOpener,
    options: &FormatOptions,
) -> Result<VirtualTrackPlaybackCtx> {
    let mut resources = Vec::new();
    let mut duration = Rational::ZERO;

    for declared_resource in &declared.resources {
        let locator = assets.get(&declared_resource.track_file_uuid).ok_or(()).or_else(|_| {
            decode_error("imf: track file uuid not present in any asset map")
        })?;

        let edit_unit_seconds = Rational::new(declared_resource.base.edit_rate.den, declared_resource.base.edit_rate.num);
        let resource_duration_seconds = Rational::new(declared_resource.base.duration as i64, 1)
            .checked_mul(edit_unit_seconds)
            .ok_or(())
            .or_else(|_| decode_error("imf: resource duration overflowed"))?;

        for repeat in 0..declared_resource.base.repeat_count {
            let mut ctx = ResourcePlaybackCtx::new(locator.absolute_uri.clone(), *declared_resource);

            if resources.is_empty() {
                let reader = open_resource(&ctx.resolved_uri, &ctx.resource, opener, options)?;
                ctx.child_demuxer = Some(reader);
            }

            let _ = repeat;
            resources.push(ctx);

            duration = duration
                .checked_add(resource_duration_seconds)
                .ok_or(())
                .or_else(|_| decode_error("imf: track duration overflowed"))?;
        }
    }

    Ok(VirtualTrackPlaybackCtx {
        index,
        current_timestamp: Rational::ZERO,
        duration,
        resources,
        current_resource_index: 0,
        last_pts: 0,
        forced_min_resource_index: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetLocator, BaseResource};
    use crate::testing::MockOpener;
    use uuid::Uuid;

    fn track_file_resource(uuid: Uuid, repeat_count: u64) -> TrackFileResource {
        TrackFileResource {
            base: BaseResource {
                edit_rate: Rational::new(24, 1),
                entry_point: 0,
                duration: 48,
                repeat_count,
            },
            track_file_uuid: uuid,
        }
    }

    #[test]
    fn verify_repeat_expansion_produces_n_resource_contexts() {
        let uuid = Uuid::from_bytes([1; 16]);
        let mut assets = AssetLocatorMap::new();
        assets.insert(AssetLocator { uuid, absolute_uri: "file.mxf".to_string() });

        let declared =
            TrackFileVirtualTrack { id: Uuid::nil(), resources: vec![track_file_resource(uuid, 3)] };

        let opener = MockOpener::new(48);
        let options = FormatOptions::default();
        let ctx = build_track(&declared, &assets, 0, &opener, &options).unwrap();

        assert_eq!(ctx.resources.len(), 3);
        assert_eq!(opener.open_count(), 1, "only the first repeat is eager-opened");
        assert!(ctx.resources[0].child_demuxer.is_some());
        assert!(ctx.resources[1].child_demuxer.is_none());
        assert!(ctx.resources[2].child_demuxer.is_none());
    }

    #[test]
    fn verify_missing_asset_locator_is_invalid_data() {
        let uuid = Uuid::from_bytes([2; 16]);
        let assets = AssetLocatorMap::new();
        let declared =
            TrackFileVirtualTrack { id: Uuid::nil(), resources: vec![track_file_resource(uuid, 1)] };

        let opener = MockOpener::new(48);
        let options = FormatOptions::default();
        assert!(build_track(&declared, &assets, 0, &opener, &options).is_err());
    }

    #[test]
    fn verify_duration_accumulates_per_copy() {
        let uuid = Uuid::from_bytes([3; 16]);
        let mut assets = AssetLocatorMap::new();
        assets.insert(AssetLocator { uuid, absolute_uri: "file.mxf".to_string() });

        let declared =
            TrackFileVirtualTrack { id: Uuid::nil(), resources: vec![track_file_resource(uuid, 3)] };

        let opener = MockOpener::new(48);
        let options = FormatOptions::default();
        let ctx = build_track(&declared, &assets, 0, &opener, &options).unwrap();

        // 48 edit units at 24/1 = 2 seconds per copy, 3 copies = 6 seconds.
        assert_eq!(ctx.duration, Rational::new(6, 1));
    }
}
