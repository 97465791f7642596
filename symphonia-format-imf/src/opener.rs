// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host collaborator interfaces.
//!
//! The composition core never touches a filesystem or constructs a concrete [`FormatReader`]
//! directly. Two small traits stand in for "the host media framework", matching how other
//! Symphonia readers receive their environment via constructor arguments rather than globals.

use symphonia_core::errors::Result;
use symphonia_core::formats::{FormatOptions, FormatReader};
use symphonia_core::io::MediaSourceStream;

/// Opens a plain byte stream (CPL or asset map XML) given a URI.
pub trait ByteSourceOpener {
    fn open_byte_stream(&self, uri: &str) -> Result<MediaSourceStream>;
}

// `ChildOpener` is stored inside `ImfReader` for the life of the composition (resources are
// opened and re-opened well after `open()` returns, on every resource switch), so it must satisfy
// the same `Send` bound `FormatReader` itself requires, matching `Decoder`/`MetadataReader`'s
// convention elsewhere in symphonia-core. `ByteSourceOpener` is only ever borrowed for the
// duration of `ImfReader::open` and carries no such bound.

/// Opens a child demuxer bound to a track-file resource's resolved URI.
///
/// The production implementation resolves `uri` to a `MediaSource` and constructs whichever
/// `FormatReader` understands the container (an MXF reader, in the common IMF case). Tests
/// substitute [`crate::testing::MockOpener`], which counts invocations and returns a canned
/// reader so that repeat-expansion behaviour (open count == `repeat_count`) is directly
/// observable.
pub trait ChildOpener: Send {
    fn open(&self, uri: &str, options: &FormatOptions) -> Result<Box<dyn FormatReader>>;
}
