// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The multi-track scheduler and the [`ImfReader`] it drives.
//!
//! `ImfReader` is this crate's [`FormatReader`]: it owns the parsed [`Composition`], the merged
//! [`AssetLocatorMap`], and one [`VirtualTrackPlaybackCtx`] per virtual track. Each call to
//! `next_packet` advances whichever track's composition clock is currently behind, opening or
//! switching child demuxers on resource boundaries and rewriting their packets onto the
//! composition timeline.

use std::io::Read;

use log::debug;

use symphonia_core::errors::{
    decode_error, end_of_stream_error, stream_not_found_error, unsupported_error, Error, Result,
};
use symphonia_core::formats::{Cue, FormatOptions, FormatReader, Packet, SeekMode, SeekTo, SeekedTo, Track};
use symphonia_core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia_core::meta::MetadataQueue;
use symphonia_core::units::TimeBase;

use crate::assetmap::{self, directory_of, MAX_DOCUMENT_LEN};
use crate::cpl;
use crate::model::{AssetLocatorMap, Composition, TrackFileResource};
use crate::opener::{ByteSourceOpener, ChildOpener};
use crate::rational::Rational;
use crate::resource_opener::open_resource;
use crate::track::{self, VirtualTrackPlaybackCtx};

/// A demuxer over an IMF composition's virtual timeline.
///
/// Unlike most `FormatReader`s, an `ImfReader` cannot be built from a single `MediaSourceStream`
/// alone: a composition spans a CPL, one or more asset maps, and any number of per-resource
/// essence containers, each reached through the host-supplied [`ByteSourceOpener`] and
/// [`ChildOpener`]. [`ImfReader::open`] is the real entry point; `FormatReader::try_new` exists
/// only to satisfy the trait and is unsupported.
pub struct ImfReader {
    composition: Composition,
    assets: AssetLocatorMap,
    playback: Vec<VirtualTrackPlaybackCtx>,
    tracks: Vec<Track>,
    cues: Vec<Cue>,
    metadata: MetadataQueue,
    options: FormatOptions,
    child_opener: Box<dyn ChildOpener>,
    interrupt: Option<Box<dyn FnMut() -> bool + Send>>,
}

impl ImfReader {
    /// Opens a composition rooted at `cpl_uri`.
    ///
    /// `asset_map_uris`, if `None` or empty, defaults to the single path `<dirname(cpl_uri)>/ASSETMAP.xml`.
    pub fn open(
        cpl_uri: &str,
        asset_map_uris: Option<&[String]>,
        byte_opener: &dyn ByteSourceOpener,
        child_opener: Box<dyn ChildOpener>,
        options: FormatOptions,
    ) -> Result<Self> {
        let composition = read_composition(cpl_uri, byte_opener)?;

        let asset_map_list: Vec<String> = match asset_map_uris {
            Some(list) if !list.is_empty() => list.to_vec(),
            _ => vec![format!("{}ASSETMAP.xml", directory_of(cpl_uri))],
        };
        let assets = assetmap::read_and_merge_asset_maps(byte_opener, &asset_map_list)?;

        let mut playback = Vec::new();
        let mut tracks = Vec::new();
        let mut index = 0u32;

        if let Some(image) = &composition.image_2d {
            let ctx = track::build_track(image, &assets, index, child_opener.as_ref(), &options)?;
            tracks.push(make_output_track(index, &ctx)?);
            playback.push(ctx);
            index += 1;
        }
        for audio in &composition.audios {
            let ctx = track::build_track(audio, &assets, index, child_opener.as_ref(), &options)?;
            tracks.push(make_output_track(index, &ctx)?);
            playback.push(ctx);
            index += 1;
        }

        Ok(ImfReader {
            composition,
            assets,
            playback,
            tracks,
            cues: Vec::new(),
            metadata: MetadataQueue::default(),
            options,
            child_opener,
            interrupt: None,
        })
    }

    /// Registers a cooperative interrupt callback, polled once per read attempt.
    pub fn set_interrupt_callback(&mut self, callback: Option<Box<dyn FnMut() -> bool + Send>>) {
        self.interrupt = callback;
    }

    /// The parsed composition this reader was opened from.
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// The merged asset locator table this reader was opened with.
    pub fn assets(&self) -> &AssetLocatorMap {
        &self.assets
    }

    fn is_interrupted(&mut self) -> bool {
        match self.interrupt.as_mut() {
            Some(callback) => callback(),
            None => false,
        }
    }
}

fn read_composition(cpl_uri: &str, byte_opener: &dyn ByteSourceOpener) -> Result<Composition> {
    let mut source = byte_opener.open_byte_stream(cpl_uri)?;
    let mut buf = Vec::new();
    let mut limited = (&mut source).take(MAX_DOCUMENT_LEN);
    limited.read_to_end(&mut buf)?;
    let text = String::from_utf8(buf).or_else(|_| decode_error("imf: cpl is not utf-8"))?;
    let doc = roxmltree::Document::parse(&text).or_else(|_| decode_error("imf: malformed cpl xml"))?;
    cpl::parse_composition(&doc)
}

/// Builds the published `Track` for a built virtual track, inheriting stream parameters from the
/// first resource's first media stream.
fn make_output_track(index: u32, ctx: &VirtualTrackPlaybackCtx) -> Result<Track> {
    let first_track = ctx
        .resources
        .first()
        .and_then(|r| r.child_demuxer.as_ref())
        .and_then(|d| d.tracks().first())
        .ok_or(())
        .or_else(|_| decode_error("imf: virtual track has no resource to derive stream parameters from"))?;

    let mut codec_params = first_track.codec_params.clone();
    let time_base = codec_params.time_base.unwrap_or_else(|| TimeBase::new(1, 1));
    codec_params.n_frames = Some(ctx.duration.to_time_base_units(time_base));

    Ok(Track { id: index, codec_params, language: first_track.language.clone() })
}

/// Picks the track with the smallest composition clock, ties broken toward the lower index (the
/// first minimum `Iterator::min_by_key` encounters, per its documented tie-breaking).
fn pick_urgent_track(tracks: &[VirtualTrackPlaybackCtx]) -> Option<usize> {
    tracks.iter().enumerate().min_by_key(|(_, ctx)| ctx.current_timestamp).map(|(i, _)| i)
}

/// Finds the resource index active at `ctx.current_timestamp`.
fn locate_active_resource(ctx: &VirtualTrackPlaybackCtx) -> Result<usize> {
    if ctx.resources.is_empty() {
        return decode_error("imf: virtual track has no resources");
    }

    let unit = Rational::edit_unit(ctx.resources[0].resource.base.edit_rate);
    let probe = ctx
        .current_timestamp
        .checked_add(unit)
        .ok_or(())
        .or_else(|_| decode_error("imf: composition clock overflowed"))?;

    let mut cumulated = Rational::ZERO;
    for (i, r) in ctx.resources.iter().enumerate() {
        let resource_seconds = resource_duration_seconds(&r.resource)?;
        cumulated = cumulated
            .checked_add(resource_seconds)
            .ok_or(())
            .or_else(|_| decode_error("imf: track duration overflowed"))?;

        if i >= ctx.forced_min_resource_index && probe <= cumulated {
            return Ok(i);
        }
    }

    if probe > ctx.duration {
        end_of_stream_error()
    }
    else {
        stream_not_found_error()
    }
}

fn resource_duration_seconds(resource: &TrackFileResource) -> Result<Rational> {
    let edit_unit = Rational::edit_unit(resource.base.edit_rate);
    Rational::new(resource.base.duration as i64, 1)
        .checked_mul(edit_unit)
        .ok_or(())
        .or_else(|_| decode_error("imf: resource duration overflowed"))
}

/// Ensures `ctx.resources[active_index]` has an open child demuxer, closing and replacing
/// whatever was previously open if it differs. At most one resource per track is
/// ever open at a time.
fn ensure_active_resource_open(
    ctx: &mut VirtualTrackPlaybackCtx,
    active_index: usize,
    child_opener: &dyn ChildOpener,
    options: &FormatOptions,
) -> Result<()> {
    let previous_index = ctx.current_resource_index as usize;

    if previous_index != active_index {
        if let Some(demuxer) = ctx.resources[previous_index].child_demuxer.take() {
            let _ = demuxer.into_inner();
        }
    }

    if ctx.resources[active_index].child_demuxer.is_none() {
        let resolved_uri = ctx.resources[active_index].resolved_uri.clone();
        let resource = ctx.resources[active_index].resource;
        let reader = open_resource(&resolved_uri, &resource, child_opener, options)?;
        ctx.resources[active_index].child_demuxer = Some(reader);
    }

    ctx.current_resource_index = active_index as u32;
    Ok(())
}

/// Rewrites a packet freshly read from a child demuxer onto the composition timeline and advances
/// `ctx`'s clocks.
///
/// `symphonia_core::formats::Packet` carries a single timestamp, not the separate PTS/DTS pair
/// the original scheduling algorithm was described against. The emitted timestamp is the track's
/// running `last_pts` (strictly increasing by construction); the child's own timestamp, with the
/// resource's `entry_point` subtracted, is retained only to detect and log drift against it.
fn rewrite_timestamps(
    ctx: &mut VirtualTrackPlaybackCtx,
    packet: Packet,
    resource: &TrackFileResource,
    child_time_base: TimeBase,
) -> Result<Packet> {
    let entry_adjusted = packet.ts.saturating_sub(resource.base.entry_point);

    if ctx.last_pts > 0 && (entry_adjusted as i64) < ctx.last_pts {
        debug!(
            "imf: track {} packet dts {} behind composition dts {}; clamped by pts rewrite",
            ctx.index, entry_adjusted, ctx.last_pts
        );
    }

    let rewritten = Packet::new_trimmed_from_boxed_slice(
        ctx.index,
        ctx.last_pts as u64,
        packet.dur,
        packet.trim_start,
        packet.trim_end,
        packet.data,
    );

    let step = Rational::new(packet.dur as i64, 1)
        .checked_mul(Rational::new(child_time_base.numer as i64, child_time_base.denom as i64))
        .ok_or(())
        .or_else(|_| decode_error("imf: packet duration overflowed"))?;
    ctx.current_timestamp = ctx
        .current_timestamp
        .checked_add(step)
        .ok_or(())
        .or_else(|_| decode_error("imf: composition clock overflowed"))?;
    ctx.last_pts += packet.dur as i64;

    Ok(rewritten)
}

impl FormatReader for ImfReader {
    fn try_new(_source: MediaSourceStream, _options: &FormatOptions) -> Result<Self> {
        unsupported_error("imf: construct via ImfReader::open, which needs host collaborators try_new cannot express")
    }

    fn cues(&self) -> &[Cue] {
        &self.cues
    }

    fn metadata(&mut self) -> &MetadataQueue {
        &self.metadata
    }

    fn seek(&mut self, _mode: SeekMode, _to: SeekTo) -> Result<SeekedTo> {
        unsupported_error("imf: seeking the composition timeline is not supported")
    }

    fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn next_packet(&mut self) -> Result<Packet> {
        loop {
            if self.is_interrupted() {
                return end_of_stream_error();
            }

            let active_track = match pick_urgent_track(&self.playback) {
                Some(i) => i,
                None => return end_of_stream_error(),
            };

            if self.playback[active_track].current_timestamp == self.playback[active_track].duration {
                return end_of_stream_error();
            }

            let resource_index = match locate_active_resource(&self.playback[active_track]) {
                Ok(i) => i,
                Err(Error::EndOfFile) => return end_of_stream_error(),
                Err(e) => return Err(e),
            };

            ensure_active_resource_open(
                &mut self.playback[active_track],
                resource_index,
                self.child_opener.as_ref(),
                &self.options,
            )?;

            let resource = self.playback[active_track].resources[resource_index].resource;
            let child_time_base = {
                let demuxer = self.playback[active_track].resources[resource_index]
                    .child_demuxer
                    .as_ref()
                    .expect("just ensured open");
                demuxer.tracks().first().and_then(|t| t.codec_params.time_base).unwrap_or_else(|| TimeBase::new(1, 1))
            };

            let read_result = {
                let demuxer = self.playback[active_track].resources[resource_index]
                    .child_demuxer
                    .as_mut()
                    .expect("just ensured open");
                demuxer.next_packet()
            };

            match read_result {
                Ok(packet) => {
                    return rewrite_timestamps(&mut self.playback[active_track], packet, &resource, child_time_base);
                }
                Err(Error::EndOfFile) => {
                    let ctx = &mut self.playback[active_track];
                    if let Some(demuxer) = ctx.resources[resource_index].child_demuxer.take() {
                        let _ = demuxer.into_inner();
                    }

                    if resource_index + 1 < ctx.resources.len() {
                        ctx.forced_min_resource_index = resource_index + 1;
                    }
                    else {
                        ctx.current_timestamp = ctx.duration;
                    }
                    // retry: either a later resource on this track, or another track entirely.
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn into_inner(self: Box<Self>) -> MediaSourceStream {
        // The composition's real sources are the many per-resource child streams, each already
        // closed as its resource context is dropped; there is no single stream to hand back.
        MediaSourceStream::new(Box::new(std::io::Cursor::new(Vec::<u8>::new())), MediaSourceStreamOptions::default())
    }
}

impl Drop for ImfReader {
    fn drop(&mut self) {
        for ctx in &mut self.playback {
            for resource in &mut ctx.resources {
                if let Some(demuxer) = resource.child_demuxer.take() {
                    let _ = demuxer.into_inner();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::testing::{MockByteSource, MockFormatReader, MockOpener};

    fn cpl_xml(duration: u64, repeat: u64) -> String {
        format!(
            r#"<CompositionPlaylist>
                <Id>urn:uuid:6104E9A1-79E9-4C92-9C22-ADF522A1DA01</Id>
                <EditRate>24 1</EditRate>
                <SegmentList>
                    <Segment>
                        <SequenceList>
                            <MainImageSequence>
                                <TrackId>urn:uuid:8E5CF6A2-79E9-4C92-9C22-ADF522A1DA02</TrackId>
                                <ResourceList>
                                    <Resource>
                                        <EditRate>24 1</EditRate>
                                        <SourceDuration>{}</SourceDuration>
                                        <RepeatCount>{}</RepeatCount>
                                        <TrackFileId>urn:uuid:1104E9A1-79E9-4C92-9C22-ADF522A1DA03</TrackFileId>
                                    </Resource>
                                </ResourceList>
                            </MainImageSequence>
                        </SequenceList>
                    </Segment>
                </SegmentList>
            </CompositionPlaylist>"#,
            duration, repeat
        )
    }

    fn asset_map_xml() -> &'static str {
        r#"<AssetMap>
            <AssetList>
                <Asset>
                    <Id>urn:uuid:1104E9A1-79E9-4C92-9C22-ADF522A1DA03</Id>
                    <ChunkList><Chunk><Path>image.mxf</Path></Chunk></ChunkList>
                </Asset>
            </AssetList>
        </AssetMap>"#
    }

    fn open_fixture(duration: u64, repeat: u64) -> ImfReader {
        let mut sources = MockByteSource::new();
        sources.register("/pkg/CPL.xml", &cpl_xml(duration, repeat));
        sources.register("/pkg/ASSETMAP.xml", asset_map_xml());

        let opener = Box::new(MockOpener::new(duration));
        ImfReader::open("/pkg/CPL.xml", None, &sources, opener, FormatOptions::default()).unwrap()
    }

    #[test]
    fn verify_open_publishes_one_track_with_expected_duration() {
        let reader = open_fixture(48, 1);
        assert_eq!(reader.tracks().len(), 1);
        assert_eq!(reader.tracks()[0].codec_params.n_frames, Some(48));
    }

    #[test]
    fn verify_drains_all_packets_then_eof() {
        let mut reader = open_fixture(48, 1);
        let mut count = 0;
        loop {
            match reader.next_packet() {
                Ok(_) => count += 1,
                Err(Error::EndOfFile) => break,
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }
        assert_eq!(count, 48);
    }

    #[test]
    fn verify_repeat_reopens_child_demuxer_on_each_boundary() {
        let mut sources = MockByteSource::new();
        sources.register("/pkg/CPL.xml", &cpl_xml(48, 3));
        sources.register("/pkg/ASSETMAP.xml", asset_map_xml());

        // `ImfReader::open` takes the `ChildOpener` by value and never hands it back, so the
        // shared `Arc` is how this test observes `open_count()` after the fact.
        let opener = Arc::new(MockOpener::new(48));
        let opener_handle = opener.clone();

        let mut reader =
            ImfReader::open("/pkg/CPL.xml", None, &sources, Box::new(opener), FormatOptions::default())
                .unwrap();

        assert_eq!(opener_handle.open_count(), 1, "only the first repeat is eager-opened by build_track");

        let mut count = 0;
        loop {
            match reader.next_packet() {
                Ok(_) => count += 1,
                Err(Error::EndOfFile) => break,
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }
        assert_eq!(count, 144, "3 repeats of 48 packets each");
        assert_eq!(opener_handle.open_count(), 3, "each of the 3 repeats is opened exactly once");
    }

    #[test]
    fn verify_packets_carry_the_virtual_track_index() {
        let mut reader = open_fixture(4, 1);
        let packet = reader.next_packet().unwrap();
        assert_eq!(packet.track_id(), 0);
    }

    #[test]
    fn verify_interrupt_callback_stops_playback_early() {
        let mut reader = open_fixture(48, 1);
        reader.set_interrupt_callback(Some(Box::new(|| true)));
        assert!(matches!(reader.next_packet(), Err(Error::EndOfFile)));
    }

    /// Hands out a distinct fixed-duration `MockFormatReader` per child resource URI, keyed on
    /// the resolved URI `ChildOpener::open` is called with. Lets a fixture give each virtual
    /// track its own packet cadence, which a single shared `MockOpener` (same duration and time
    /// base for every resource) cannot.
    struct MultiDurationOpener {
        by_uri: HashMap<String, (u64, TimeBase)>,
    }

    impl MultiDurationOpener {
        fn new(entries: &[(&str, u64, TimeBase)]) -> Self {
            MultiDurationOpener {
                by_uri: entries.iter().map(|(uri, dur, tb)| (uri.to_string(), (*dur, *tb))).collect(),
            }
        }
    }

    impl ChildOpener for MultiDurationOpener {
        fn open(&self, uri: &str, _options: &FormatOptions) -> Result<Box<dyn FormatReader>> {
            let (duration, time_base) = *self.by_uri.get(uri).expect("uri not registered in fixture");
            Ok(Box::new(MockFormatReader::new(duration, time_base)))
        }
    }

    fn multi_track_cpl_xml() -> &'static str {
        r#"<CompositionPlaylist>
            <Id>urn:uuid:AAAAAAAA-0000-4000-8000-000000000000</Id>
            <EditRate>24 1</EditRate>
            <SegmentList>
                <Segment>
                    <SequenceList>
                        <MainImageSequence>
                            <TrackId>urn:uuid:AAAAAAAA-0000-4000-8000-000000000001</TrackId>
                            <ResourceList>
                                <Resource>
                                    <EditRate>2 1</EditRate>
                                    <SourceDuration>2</SourceDuration>
                                    <TrackFileId>urn:uuid:AAAAAAAA-0000-4000-8000-000000000002</TrackFileId>
                                </Resource>
                            </ResourceList>
                        </MainImageSequence>
                        <MainAudioSequence>
                            <TrackId>urn:uuid:AAAAAAAA-0000-4000-8000-000000000011</TrackId>
                            <ResourceList>
                                <Resource>
                                    <EditRate>4 1</EditRate>
                                    <SourceDuration>4</SourceDuration>
                                    <TrackFileId>urn:uuid:AAAAAAAA-0000-4000-8000-000000000012</TrackFileId>
                                </Resource>
                            </ResourceList>
                        </MainAudioSequence>
                        <MainAudioSequence>
                            <TrackId>urn:uuid:AAAAAAAA-0000-4000-8000-000000000021</TrackId>
                            <ResourceList>
                                <Resource>
                                    <EditRate>8 1</EditRate>
                                    <SourceDuration>8</SourceDuration>
                                    <TrackFileId>urn:uuid:AAAAAAAA-0000-4000-8000-000000000022</TrackFileId>
                                </Resource>
                            </ResourceList>
                        </MainAudioSequence>
                    </SequenceList>
                </Segment>
            </SegmentList>
        </CompositionPlaylist>"#
    }

    fn multi_track_asset_map_xml() -> &'static str {
        r#"<AssetMap>
            <AssetList>
                <Asset>
                    <Id>urn:uuid:AAAAAAAA-0000-4000-8000-000000000002</Id>
                    <ChunkList><Chunk><Path>image.mxf</Path></Chunk></ChunkList>
                </Asset>
                <Asset>
                    <Id>urn:uuid:AAAAAAAA-0000-4000-8000-000000000012</Id>
                    <ChunkList><Chunk><Path>audio1.mxf</Path></Chunk></ChunkList>
                </Asset>
                <Asset>
                    <Id>urn:uuid:AAAAAAAA-0000-4000-8000-000000000022</Id>
                    <ChunkList><Chunk><Path>audio2.mxf</Path></Chunk></ChunkList>
                </Asset>
            </AssetList>
        </AssetMap>"#
    }

    /// S3: one image virtual track plus two distinct audio virtual tracks, each with its own
    /// packet cadence. Verifies that every packet the scheduler emits comes from whichever track
    /// currently has the smallest composition clock, not merely that some fixed total count of
    /// packets eventually comes out.
    #[test]
    fn verify_multi_track_composition_interleaves_by_smallest_clock() {
        let mut sources = MockByteSource::new();
        sources.register("/pkg/CPL.xml", multi_track_cpl_xml());
        sources.register("/pkg/ASSETMAP.xml", multi_track_asset_map_xml());

        let opener = Box::new(MultiDurationOpener::new(&[
            ("/pkg/image.mxf", 2, TimeBase::new(1, 2)),
            ("/pkg/audio1.mxf", 4, TimeBase::new(1, 4)),
            ("/pkg/audio2.mxf", 8, TimeBase::new(1, 8)),
        ]));

        let mut reader =
            ImfReader::open("/pkg/CPL.xml", None, &sources, opener, FormatOptions::default()).unwrap();

        assert_eq!(reader.tracks().len(), 3);

        for _ in 0..10 {
            // The track the scheduler is about to read from must be the one with the smallest
            // `current_timestamp`, computed independently of `pick_urgent_track` itself.
            let mut expected = 0;
            for i in 1..reader.playback.len() {
                if reader.playback[i].current_timestamp < reader.playback[expected].current_timestamp {
                    expected = i;
                }
            }

            let packet = reader.next_packet().unwrap();
            assert_eq!(
                packet.track_id() as usize, expected,
                "packet should come from the least-advanced track"
            );
        }
    }

    /// Boundary 9: a composition with only a marker sequence publishes zero output tracks and
    /// reports end-of-stream on the very first read.
    #[test]
    fn verify_markers_only_composition_yields_no_tracks_and_immediate_eof() {
        let cpl = r#"<CompositionPlaylist>
            <Id>urn:uuid:AAAAAAAA-0000-4000-8000-000000000030</Id>
            <EditRate>24 1</EditRate>
            <SegmentList>
                <Segment>
                    <SequenceList>
                        <MarkerSequence>
                            <TrackId>urn:uuid:AAAAAAAA-0000-4000-8000-000000000031</TrackId>
                            <ResourceList>
                                <Resource>
                                    <EditRate>24 1</EditRate>
                                    <SourceDuration>10</SourceDuration>
                                    <Marker><Label>Start</Label><Offset>0</Offset></Marker>
                                </Resource>
                            </ResourceList>
                        </MarkerSequence>
                    </SequenceList>
                </Segment>
            </SegmentList>
        </CompositionPlaylist>"#;

        let mut sources = MockByteSource::new();
        sources.register("/pkg/CPL.xml", cpl);
        sources.register("/pkg/ASSETMAP.xml", r#"<AssetMap><AssetList></AssetList></AssetMap>"#);

        let opener = Box::new(MockOpener::new(0));
        let mut reader =
            ImfReader::open("/pkg/CPL.xml", None, &sources, opener, FormatOptions::default()).unwrap();

        assert!(reader.tracks().is_empty());
        assert!(matches!(reader.next_packet(), Err(Error::EndOfFile)));
    }
}
