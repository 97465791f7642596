// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opens (or re-opens) the child demuxer backing a single active resource.

use log::warn;

use symphonia_core::errors::Result;
use symphonia_core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia_core::units::Time;

use crate::model::TrackFileResource;
use crate::opener::ChildOpener;

/// Opens a child demuxer bound to `resolved_uri`, seeked to `resource`'s entry point.
///
/// On any failure after construction, the partially-opened reader is simply dropped as the
/// function returns its error: there is no separate resource to release by hand.
pub fn open_resource(
    resolved_uri: &str,
    resource: &TrackFileResource,
    opener: &dyn ChildOpener,
    options: &FormatOptions,
) -> Result<Box<dyn FormatReader>> {
    let mut reader = opener.open(resolved_uri, options)?;

    if let Some(track) = reader.tracks().first() {
        if let Some(tb) = track.codec_params.time_base {
            // Inverted time base should equal the resource's declared edit rate.
            let host_edit_rate_num = tb.denom;
            let host_edit_rate_den = tb.numer;
            if u64::from(host_edit_rate_num) * resource.base.edit_rate.den as u64
                != u64::from(host_edit_rate_den) * resource.base.edit_rate.num as u64
            {
                warn!(
                    "imf: resource edit rate {}/{} does not match child stream time base {}/{}",
                    resource.base.edit_rate.num, resource.base.edit_rate.den, host_edit_rate_num, host_edit_rate_den
                );
            }
        }
    }

    let entry_point_us = (resource.base.entry_point as u128)
        * resource.base.edit_rate.den as u128
        * 1_000_000
        / resource.base.edit_rate.num as u128;

    if entry_point_us > 0 {
        let seconds = (entry_point_us / 1_000_000) as u64;
        let frac = (entry_point_us % 1_000_000) as f64 / 1_000_000.0;
        reader.seek(SeekMode::Accurate, SeekTo::Time { time: Time::new(seconds, frac), track_id: None })?;
    }

    Ok(reader)
}
