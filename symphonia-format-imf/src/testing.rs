// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test doubles standing in for the host media framework: a synthetic child `FormatReader` and
//! the `ChildOpener`/`ByteSourceOpener` implementations that hand it out.
//!
//! Only compiled for tests; this is the one place in the crate that is allowed to fabricate a
//! `FormatReader` without any real container behind it.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use symphonia_core::codecs::{CodecParameters, CODEC_TYPE_NULL};
use symphonia_core::errors::{decode_error, end_of_stream_error, Result};
use symphonia_core::formats::{Cue, FormatOptions, FormatReader, Packet, SeekMode, SeekTo, SeekedTo, Track};
use symphonia_core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia_core::meta::MetadataQueue;
use symphonia_core::units::TimeBase;

use crate::opener::{ByteSourceOpener, ChildOpener};

/// A synthetic `FormatReader` that emits `total_duration` packets of duration 1 each, at
/// `time_base`, then reports end-of-stream.
pub struct MockFormatReader {
    tracks: Vec<Track>,
    cues: Vec<Cue>,
    metadata: MetadataQueue,
    time_base: TimeBase,
    next_ts: u64,
    total_duration: u64,
}

impl MockFormatReader {
    pub fn new(total_duration: u64, time_base: TimeBase) -> Self {
        let mut codec_params = CodecParameters::new();
        codec_params.for_codec(CODEC_TYPE_NULL).with_time_base(time_base).with_n_frames(total_duration);

        MockFormatReader {
            tracks: vec![Track::new(0, codec_params)],
            cues: Vec::new(),
            metadata: MetadataQueue::default(),
            time_base,
            next_ts: 0,
            total_duration,
        }
    }

    fn seconds_to_ts(&self, seconds: u64, frac: f64) -> u64 {
        let total_seconds = seconds as f64 + frac;
        (total_seconds * self.time_base.denom as f64 / self.time_base.numer as f64).round() as u64
    }
}

impl FormatReader for MockFormatReader {
    fn try_new(_source: MediaSourceStream, _options: &FormatOptions) -> Result<Self> {
        // Never exercised: tests construct `MockFormatReader` directly through `MockOpener`,
        // bypassing the generic probe/construct path real `FormatReader`s go through.
        Ok(MockFormatReader::new(0, TimeBase::new(1, 1)))
    }

    fn cues(&self) -> &[Cue] {
        &self.cues
    }

    fn metadata(&mut self) -> &MetadataQueue {
        &self.metadata
    }

    fn seek(&mut self, _mode: SeekMode, to: SeekTo) -> Result<SeekedTo> {
        let ts = match to {
            SeekTo::Time { time, .. } => self.seconds_to_ts(time.seconds, time.frac),
            SeekTo::TimeStamp { ts, .. } => ts,
        };
        self.next_ts = ts.min(self.total_duration);
        Ok(SeekedTo { track_id: 0, required_ts: ts, actual_ts: self.next_ts })
    }

    fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn next_packet(&mut self) -> Result<Packet> {
        if self.next_ts >= self.total_duration {
            return end_of_stream_error();
        }
        let packet = Packet::new_from_slice(0, self.next_ts, 1, &[]);
        self.next_ts += 1;
        Ok(packet)
    }

    fn into_inner(self: Box<Self>) -> MediaSourceStream {
        MediaSourceStream::new(Box::new(Cursor::new(Vec::<u8>::new())), MediaSourceStreamOptions::default())
    }
}

/// Counts invocations of [`ChildOpener::open`] and hands out a freshly-constructed
/// [`MockFormatReader`] each time, so tests can assert how many times a resource was (re)opened
/// (e.g. repeat-expansion scenarios).
pub struct MockOpener {
    total_duration: u64,
    time_base: TimeBase,
    opens: AtomicU32,
}

impl MockOpener {
    pub fn new(total_duration: u64) -> Self {
        MockOpener { total_duration, time_base: TimeBase::new(1, 24), opens: AtomicU32::new(0) }
    }

    pub fn with_time_base(total_duration: u64, time_base: TimeBase) -> Self {
        MockOpener { total_duration, time_base, opens: AtomicU32::new(0) }
    }

    pub fn open_count(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }
}

impl ChildOpener for MockOpener {
    fn open(&self, _uri: &str, _options: &FormatOptions) -> Result<Box<dyn FormatReader>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockFormatReader::new(self.total_duration, self.time_base)))
    }
}

// `ImfReader::open` takes its `ChildOpener` by value and stores it with no accessor back out, so a
// test that needs to observe `open_count()` after the fact (rather than only through packet
// counts) hands `ImfReader::open` an `Arc<MockOpener>` and keeps its own clone of the `Arc` to
// call `open_count()` on once playback is done.
impl ChildOpener for Arc<MockOpener> {
    fn open(&self, uri: &str, options: &FormatOptions) -> Result<Box<dyn FormatReader>> {
        MockOpener::open(self, uri, options)
    }
}

/// Hands out in-memory XML documents registered by URI, standing in for the host's CPL/asset
/// map byte-stream reader.
#[derive(Default)]
pub struct MockByteSource {
    documents: HashMap<String, Vec<u8>>,
}

impl MockByteSource {
    pub fn new() -> Self {
        MockByteSource { documents: HashMap::new() }
    }

    pub fn register(&mut self, uri: &str, content: &str) {
        self.documents.insert(uri.to_string(), content.as_bytes().to_vec());
    }
}

impl ByteSourceOpener for MockByteSource {
    fn open_byte_stream(&self, uri: &str) -> Result<MediaSourceStream> {
        match self.documents.get(uri) {
            Some(bytes) => Ok(MediaSourceStream::new(
                Box::new(Cursor::new(bytes.clone())),
                MediaSourceStreamOptions::default(),
            )),
            None => decode_error("imf: no such document registered in test fixture"),
        }
    }
}
