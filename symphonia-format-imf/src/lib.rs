// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A pure Rust demuxer for IMF (Interoperable Master Format) compositions.
//!
//! An IMF composition is not itself a media container: a Composition Playlist (CPL) XML document
//! describes a timeline built from references to separate essence track-file containers, whose
//! locations are resolved through one or more Asset Map XML documents. This crate parses both
//! documents, builds the composition's virtual tracks, and schedules packets from the underlying
//! per-resource child demuxers (opened through the host-supplied [`ChildOpener`]) into a single
//! rewritten composition timeline exposed through [`ImfReader`], a [`FormatReader`].

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod assetmap;
mod cpl;
mod model;
mod opener;
mod rational;
mod resource_opener;
mod scheduler;
mod track;
mod xml;

#[cfg(test)]
mod testing;

pub use model::{
    AssetLocator, AssetLocatorMap, BaseResource, Composition, Marker, MarkerResource,
    MarkerVirtualTrack, TrackFileResource, TrackFileVirtualTrack,
};
pub use opener::{ByteSourceOpener, ChildOpener};
pub use rational::Rational;
pub use scheduler::ImfReader;
