// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fs::File;
use std::io::Read as _;

use clap::{App, Arg};
use log::{error, info};

use symphonia_core::codecs::{CodecParameters, CODEC_TYPE_NULL};
use symphonia_core::errors::{end_of_stream_error, Error, Result};
use symphonia_core::formats::{Cue, FormatOptions, FormatReader, Packet, SeekTo, SeekedTo, Track};
use symphonia_core::io::{MediaSource, MediaSourceStream, MediaSourceStreamOptions};
use symphonia_core::meta::MetadataQueue;

use symphonia_format_imf::{ByteSourceOpener, ChildOpener, ImfReader};

/// Reads the entire file at `uri` up front and serves it back as a single, whole-file packet.
///
/// This workspace does not vendor a container-specific reader for the essence containers an
/// IMF package actually references (MXF, typically): plugging one in is the integrator's job,
/// exactly as `ChildOpener`'s doc comment describes. `RawFileReader` stands in for that so this
/// demo CLI can still drive the scheduler end to end against arbitrary files.
struct RawFileReader {
    tracks: Vec<Track>,
    metadata: MetadataQueue,
    data: Option<Box<[u8]>>,
}

impl RawFileReader {
    fn open(uri: &str) -> Result<Self> {
        let mut file = File::open(uri).or_else(|_| symphonia_core::errors::decode_error(
            "imf-play: could not open child resource",
        ))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .or_else(|_| symphonia_core::errors::decode_error("imf-play: could not read child resource"))?;

        let mut codec_params = CodecParameters::new();
        codec_params.for_codec(CODEC_TYPE_NULL).with_n_frames(1);

        Ok(RawFileReader {
            tracks: vec![Track::new(0, codec_params)],
            metadata: MetadataQueue::default(),
            data: Some(buf.into_boxed_slice()),
        })
    }
}

impl FormatReader for RawFileReader {
    fn try_new(_source: MediaSourceStream, _options: &FormatOptions) -> Result<Self> {
        symphonia_core::errors::unsupported_error("imf-play: RawFileReader is only opened by ChildOpener")
    }

    fn cues(&self) -> &[Cue] {
        &[]
    }

    fn metadata(&mut self) -> &MetadataQueue {
        &self.metadata
    }

    fn seek(&mut self, _mode: symphonia_core::formats::SeekMode, _to: SeekTo) -> Result<SeekedTo> {
        symphonia_core::errors::unsupported_error("imf-play: RawFileReader cannot seek")
    }

    fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn next_packet(&mut self) -> Result<Packet> {
        match self.data.take() {
            Some(data) => Ok(Packet::new_from_boxed_slice(0, 0, 1, data)),
            None => end_of_stream_error(),
        }
    }

    fn into_inner(self: Box<Self>) -> MediaSourceStream {
        let source = Box::new(std::io::Cursor::new(Vec::<u8>::new())) as Box<dyn MediaSource>;
        MediaSourceStream::new(source, MediaSourceStreamOptions::default())
    }
}

struct FileByteSourceOpener;

impl ByteSourceOpener for FileByteSourceOpener {
    fn open_byte_stream(&self, uri: &str) -> Result<MediaSourceStream> {
        let file = File::open(uri)
            .or_else(|_| symphonia_core::errors::decode_error("imf-play: could not open input file"))?;
        let source = Box::new(file) as Box<dyn MediaSource>;
        Ok(MediaSourceStream::new(source, MediaSourceStreamOptions::default()))
    }
}

struct FileChildOpener;

impl ChildOpener for FileChildOpener {
    fn open(&self, uri: &str, _options: &FormatOptions) -> Result<Box<dyn FormatReader>> {
        Ok(Box::new(RawFileReader::open(uri)?))
    }
}

fn main() {
    pretty_env_logger::init();

    let matches = App::new("imf-play")
        .version("1.0")
        .about("Drain an IMF composition through symphonia-format-imf")
        .arg(Arg::with_name("assetmaps")
            .long("assetmaps")
            .value_name("LIST")
            .help("Comma-separated list of asset map paths; defaults to <CPL dir>/ASSETMAP.xml"))
        .arg(Arg::with_name("CPL")
            .help("Path to the Composition Playlist XML file")
            .required(true)
            .index(1))
        .get_matches();

    let cpl_path = matches.value_of("CPL").unwrap();
    let asset_maps: Option<Vec<String>> =
        matches.value_of("assetmaps").map(|s| s.split(',').map(|p| p.trim().to_string()).collect());

    let byte_opener = FileByteSourceOpener;
    let child_opener = Box::new(FileChildOpener);
    let options = FormatOptions::default();

    match ImfReader::open(cpl_path, asset_maps.as_deref(), &byte_opener, child_opener, options) {
        Ok(mut reader) => {
            println!("composition: {} output track(s)", reader.tracks().len());
            for track in reader.tracks() {
                println!(
                    "  track {}: time_base={:?} n_frames={:?} language={:?}",
                    track.id, track.codec_params.time_base, track.codec_params.n_frames, track.language,
                );
            }

            let mut counts: HashMap<u32, u64> = HashMap::new();

            loop {
                match reader.next_packet() {
                    Ok(packet) => {
                        *counts.entry(packet.track_id()).or_insert(0) += 1;
                        info!("track {}: {} packets so far", packet.track_id(), counts[&packet.track_id()]);
                    }
                    Err(Error::EndOfFile) => break,
                    Err(err) => {
                        error!("playback stopped: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            for (track_id, count) in &counts {
                println!("track {}: {} packets", track_id, count);
            }
        }
        Err(err) => {
            error!("failed to open composition: {}", err);
            std::process::exit(1);
        }
    }
}
