// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parses a Composition Playlist (SMPTE ST 2067-3) XML document into a [`Composition`].

use log::debug;
use roxmltree::{Document, Node};
use uuid::Uuid;

use symphonia_core::errors::{decode_error, Result};

use crate::model::{
    BaseResource, Composition, Marker, MarkerResource, MarkerVirtualTrack, TrackFileResource,
    TrackFileVirtualTrack,
};
use crate::rational::Rational;
use crate::xml::{child_by_local_name, read_rational, read_ulong, read_uuid};

/// Default marker label scope when a `Marker`'s `scope` attribute is absent, per SMPTE ST 2067-3.
const DEFAULT_MARKER_SCOPE: &str = "http://www.smpte-ra.org/schemas/2067-3/2016#standard-markers";

fn required_child<'a, 'input>(node: Node<'a, 'input>, name: &'static str) -> Result<Node<'a, 'input>> {
    match child_by_local_name(node, name) {
        Some(child) => Ok(child),
        None => {
            debug!("imf: missing required element <{}>", name);
            decode_error("imf: missing required element")
        }
    }
}

fn parse_base_resource(node: Node<'_, '_>) -> Result<BaseResource> {
    let (num, den) = read_rational(required_child(node, "EditRate")?)?;
    if num <= 0 || den <= 0 {
        return decode_error("imf: resource EditRate must be strictly positive");
    }
    let edit_rate = Rational::new(num, den);

    let entry_point = match child_by_local_name(node, "EntryPoint") {
        Some(n) => read_ulong(n)?,
        None => 0,
    };

    let duration = read_ulong(required_child(node, "SourceDuration")?)?;
    if duration == 0 {
        return decode_error("imf: resource SourceDuration must be non-zero");
    }

    let repeat_count = match child_by_local_name(node, "RepeatCount") {
        Some(n) => read_ulong(n)?,
        None => 1,
    };
    if repeat_count == 0 {
        return decode_error("imf: resource RepeatCount must be at least 1");
    }

    Ok(BaseResource { edit_rate, entry_point, duration, repeat_count })
}

fn parse_track_file_resource(node: Node<'_, '_>) -> Result<TrackFileResource> {
    let base = parse_base_resource(node)?;
    let track_file_uuid = read_uuid(required_child(node, "TrackFileId")?)?;
    Ok(TrackFileResource { base, track_file_uuid })
}

fn parse_marker(node: Node<'_, '_>) -> Result<Marker> {
    let label_node = required_child(node, "Label")?;
    let label = label_node.text().unwrap_or("").trim().to_string();
    let scope = label_node
        .attribute("scope")
        .map(|s| s.to_string())
        .unwrap_or_else(|| DEFAULT_MARKER_SCOPE.to_string());
    let offset = read_ulong(required_child(node, "Offset")?)?;
    Ok(Marker { label, scope, offset })
}

fn parse_marker_resource(node: Node<'_, '_>) -> Result<MarkerResource> {
    let base = parse_base_resource(node)?;
    let markers = node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Marker")
        .map(parse_marker)
        .collect::<Result<Vec<_>>>()?;
    Ok(MarkerResource { base, markers })
}

enum SequenceKind {
    Image,
    Audio,
    Marker,
    Unknown,
}

fn classify_sequence(local_name: &str) -> SequenceKind {
    match local_name {
        "MainImageSequence" => SequenceKind::Image,
        "MainAudioSequence" => SequenceKind::Audio,
        "MarkerSequence" => SequenceKind::Marker,
        _ => SequenceKind::Unknown,
    }
}

/// Parses a CPL XML document (already tokenized into a DOM) into a [`Composition`].
///
/// Returns `InvalidData` on any malformed or missing required element. No partial composition is
/// ever returned.
pub fn parse_composition(doc: &Document<'_>) -> Result<Composition> {
    let root = doc.root_element();
    if root.tag_name().name() != "CompositionPlaylist" {
        return decode_error("imf: root element is not CompositionPlaylist");
    }

    let id = read_uuid(required_child(root, "Id")?)?;
    let (num, den) = read_rational(required_child(root, "EditRate")?)?;
    if num <= 0 || den <= 0 {
        return decode_error("imf: composition EditRate must be strictly positive");
    }
    let edit_rate = Rational::new(num, den);
    let content_title =
        child_by_local_name(root, "ContentTitle").and_then(|n| n.text()).map(|s| s.trim().to_string());

    let mut markers: Option<MarkerVirtualTrack> = None;
    let mut image_2d: Option<TrackFileVirtualTrack> = None;
    let mut audios: Vec<TrackFileVirtualTrack> = Vec::new();

    let segment_list = required_child(root, "SegmentList")?;
    for segment in segment_list.children().filter(|n| n.is_element() && n.tag_name().name() == "Segment") {
        let sequence_list = required_child(segment, "SequenceList")?;

        for sequence in sequence_list.children().filter(|n| n.is_element()) {
            let kind = classify_sequence(sequence.tag_name().name());
            let kind = match kind {
                SequenceKind::Unknown => {
                    debug!("imf: ignoring unknown sequence element <{}>", sequence.tag_name().name());
                    continue;
                }
                kind => kind,
            };

            let track_id = read_uuid(required_child(sequence, "TrackId")?)?;
            let resource_list = required_child(sequence, "ResourceList")?;
            let resource_nodes =
                resource_list.children().filter(|n| n.is_element() && n.tag_name().name() == "Resource");

            match kind {
                SequenceKind::Image => {
                    let resources =
                        resource_nodes.map(parse_track_file_resource).collect::<Result<Vec<_>>>()?;
                    append_track_file_track(&mut image_2d, track_id, resources, "MainImageSequence")?;
                }
                SequenceKind::Audio => {
                    let resources =
                        resource_nodes.map(parse_track_file_resource).collect::<Result<Vec<_>>>()?;
                    match audios.iter_mut().find(|t| t.id == track_id) {
                        Some(track) => track.resources.extend(resources),
                        None => audios.push(TrackFileVirtualTrack { id: track_id, resources }),
                    }
                }
                SequenceKind::Marker => {
                    let resources =
                        resource_nodes.map(parse_marker_resource).collect::<Result<Vec<_>>>()?;
                    append_marker_track(&mut markers, track_id, resources)?;
                }
                SequenceKind::Unknown => unreachable!(),
            }
        }
    }

    Ok(Composition { id, content_title, edit_rate, markers, image_2d, audios })
}

fn append_track_file_track(
    slot: &mut Option<TrackFileVirtualTrack>,
    track_id: Uuid,
    resources: Vec<TrackFileResource>,
    sequence_name: &'static str,
) -> Result<()> {
    match slot {
        Some(track) if track.id == track_id => {
            track.resources.extend(resources);
            Ok(())
        }
        Some(_) => decode_error(match sequence_name {
            "MainImageSequence" => "imf: at most one 2D image virtual track is allowed",
            _ => "imf: conflicting virtual track declaration",
        }),
        None => {
            *slot = Some(TrackFileVirtualTrack { id: track_id, resources });
            Ok(())
        }
    }
}

fn append_marker_track(
    slot: &mut Option<MarkerVirtualTrack>,
    track_id: Uuid,
    resources: Vec<MarkerResource>,
) -> Result<()> {
    match slot {
        Some(track) if track.id == track_id => {
            track.resources.extend(resources);
            Ok(())
        }
        Some(_) => decode_error("imf: at most one marker virtual track is allowed"),
        None => {
            *slot = Some(MarkerVirtualTrack { id: track_id, resources });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpl_xml(image_seq: &str) -> String {
        format!(
            r#"<CompositionPlaylist>
                <Id>urn:uuid:6104E9A1-79E9-4C92-9C22-ADF522A1DA01</Id>
                <EditRate>24 1</EditRate>
                <ContentTitle>Test Composition</ContentTitle>
                <SegmentList>
                    <Segment>
                        <SequenceList>
                            {}
                        </SequenceList>
                    </Segment>
                </SegmentList>
            </CompositionPlaylist>"#,
            image_seq
        )
    }

    const IMAGE_SEQ: &str = r#"
        <MainImageSequence>
            <TrackId>urn:uuid:8E5CF6A2-79E9-4C92-9C22-ADF522A1DA02</TrackId>
            <ResourceList>
                <Resource>
                    <EditRate>24 1</EditRate>
                    <SourceDuration>48</SourceDuration>
                    <TrackFileId>urn:uuid:1104E9A1-79E9-4C92-9C22-ADF522A1DA03</TrackFileId>
                </Resource>
            </ResourceList>
        </MainImageSequence>
    "#;

    #[test]
    fn verify_parses_minimal_composition() {
        let xml = cpl_xml(IMAGE_SEQ);
        let doc = Document::parse(&xml).unwrap();
        let comp = parse_composition(&doc).unwrap();

        assert_eq!(comp.content_title.as_deref(), Some("Test Composition"));
        assert_eq!(comp.edit_rate, Rational::new(24, 1));
        let image = comp.image_2d.unwrap();
        assert_eq!(image.resources.len(), 1);
        assert_eq!(image.resources[0].base.duration, 48);
        assert_eq!(image.resources[0].base.repeat_count, 1);
        assert!(comp.audios.is_empty());
        assert!(comp.markers.is_none());
    }

    #[test]
    fn verify_reparse_is_equal() {
        let xml = cpl_xml(IMAGE_SEQ);
        let doc = Document::parse(&xml).unwrap();
        let first = parse_composition(&doc).unwrap();
        let second = parse_composition(&doc).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn verify_rejects_second_image_track() {
        let two_images = format!("{}{}", IMAGE_SEQ, IMAGE_SEQ);
        let xml = cpl_xml(&two_images);
        let doc = Document::parse(&xml).unwrap();
        assert!(parse_composition(&doc).is_err());
    }

    #[test]
    fn verify_rejects_malformed_uuid() {
        let xml = r#"<CompositionPlaylist>
            <Id>urn:uuid:zzzz</Id>
            <EditRate>24 1</EditRate>
            <SegmentList><Segment><SequenceList/></Segment></SegmentList>
        </CompositionPlaylist>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(parse_composition(&doc).is_err());
    }

    #[test]
    fn verify_unknown_sequence_kind_is_ignored() {
        let xml = cpl_xml(r#"<SomeFutureSequence><TrackId>urn:uuid:6104E9A1-79E9-4C92-9C22-ADF522A1DA01</TrackId></SomeFutureSequence>"#);
        let doc = Document::parse(&xml).unwrap();
        let comp = parse_composition(&doc).unwrap();
        assert!(comp.image_2d.is_none());
    }

    #[test]
    fn verify_audio_tracks_merge_by_track_id() {
        let audio_seq = |id: &str| {
            format!(
                r#"<MainAudioSequence>
                    <TrackId>urn:uuid:{}</TrackId>
                    <ResourceList>
                        <Resource>
                            <EditRate>48000 1</EditRate>
                            <SourceDuration>4800</SourceDuration>
                            <TrackFileId>urn:uuid:1104E9A1-79E9-4C92-9C22-ADF522A1DA03</TrackFileId>
                        </Resource>
                    </ResourceList>
                </MainAudioSequence>"#,
                id
            )
        };
        let same_id = "2204E9A1-79E9-4C92-9C22-ADF522A1DA04";
        let seqs = format!("{}{}", audio_seq(same_id), audio_seq(same_id));
        let xml = cpl_xml(&seqs);
        let doc = Document::parse(&xml).unwrap();
        let comp = parse_composition(&doc).unwrap();
        assert_eq!(comp.audios.len(), 1);
        assert_eq!(comp.audios[0].resources.len(), 2);
    }
}
