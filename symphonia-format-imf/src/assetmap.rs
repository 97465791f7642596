// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parses one or more Asset Map (SMPTE ST 429-9) XML documents and merges them into an
//! [`AssetLocatorMap`].

use std::io::Read;

use log::warn;
use roxmltree::{Document, Node};
use url::Url;

use symphonia_core::errors::{decode_error, Result};

use crate::model::{AssetLocator, AssetLocatorMap};
use crate::opener::ByteSourceOpener;
use crate::xml::{child_by_local_name, read_uuid};

/// Initial buffer hint for reading an asset map document into memory.
const READ_BUFFER_HINT: usize = 8 * 1024;

/// One less than the maximum representable byte count: the read cap, to avoid ever wrapping a
/// running total while accumulating bytes read. Shared with the CPL reader in `scheduler.rs`.
pub(crate) const MAX_DOCUMENT_LEN: u64 = u64::MAX - 1;

pub(crate) fn directory_of(uri: &str) -> &str {
    match uri.rfind(['/', '\\']) {
        Some(i) => &uri[..=i],
        None => "",
    }
}

/// Classifies `path` per SMPTE ST 429-9's chunk `Path` grammar and resolves it to an absolute
/// URI, relative to `asset_map_uri`'s own directory when necessary.
fn resolve_path(path: &str, asset_map_uri: &str) -> Result<String> {
    if path.contains("://") {
        return Ok(path.to_string());
    }

    if path.starts_with('/') {
        return Ok(path.to_string());
    }

    let bytes = path.as_bytes();
    let is_dos_absolute = (bytes.len() >= 3 && bytes[1] == b':' && (bytes[2] == b'\\' || bytes[2] == b'/'))
        || path.starts_with("\\\\");
    if is_dos_absolute {
        return Ok(path.to_string());
    }

    // Relative: resolve against the directory of the asset map's own URI.
    if asset_map_uri.contains("://") {
        let base = Url::parse(asset_map_uri)
            .or_else(|_| decode_error("imf: malformed asset map base url"))?;
        let joined = base.join(path).or_else(|_| decode_error("imf: cannot resolve asset path"))?;
        Ok(joined.to_string())
    }
    else {
        Ok(format!("{}{}", directory_of(asset_map_uri), path))
    }
}

fn required<'a, 'input>(
    node: Option<Node<'a, 'input>>,
    message: &'static str,
) -> Result<Node<'a, 'input>> {
    node.ok_or(()).or_else(|_| decode_error(message))
}

/// Parses a single asset map XML document's text and merges its entries into `map`.
///
/// `asset_map_uri` is this specific asset map's own location, used as the base for resolving
/// relative chunk paths (each asset map resolves relative to itself, not to the CPL).
fn merge_asset_map_document(xml_text: &str, asset_map_uri: &str, map: &mut AssetLocatorMap) -> Result<()> {
    let doc = Document::parse(xml_text).or_else(|_| decode_error("imf: malformed asset map xml"))?;
    let root = doc.root_element();
    if root.tag_name().name() != "AssetMap" {
        return decode_error("imf: root element is not AssetMap");
    }

    let asset_list = match child_by_local_name(root, "AssetList") {
        Some(n) => n,
        None => return Ok(()),
    };

    for asset in asset_list.children().filter(|n| n.is_element() && n.tag_name().name() == "Asset") {
        let id_node = required(child_by_local_name(asset, "Id"), "imf: Asset missing Id")?;
        let uuid = read_uuid(id_node)?;

        let chunk_list =
            required(child_by_local_name(asset, "ChunkList"), "imf: Asset missing ChunkList")?;
        let mut chunks = chunk_list.children().filter(|n| n.is_element() && n.tag_name().name() == "Chunk");

        let first_chunk = required(chunks.next(), "imf: ChunkList has no Chunk")?;

        if chunks.next().is_some() {
            warn!("imf: asset {} has multiple chunks; only the first is used", uuid);
        }

        let path_node = required(child_by_local_name(first_chunk, "Path"), "imf: Chunk missing Path")?;
        let path = path_node.text().unwrap_or("").trim();

        let absolute_uri = resolve_path(path, asset_map_uri)?;

        if let Some(previous) = map.insert(AssetLocator { uuid, absolute_uri: absolute_uri.clone() }) {
            warn!(
                "imf: duplicate asset uuid {} across asset maps; {} replaced by {}",
                uuid, previous.absolute_uri, absolute_uri
            );
        }
    }

    Ok(())
}

/// Reads and merges every asset map named in `asset_map_uris`, in order, using `opener` to turn
/// each URI into a byte stream.
pub fn read_and_merge_asset_maps(
    opener: &dyn ByteSourceOpener,
    asset_map_uris: &[String],
) -> Result<AssetLocatorMap> {
    let mut map = AssetLocatorMap::new();

    for uri in asset_map_uris {
        let mut source = opener.open_byte_stream(uri)?;
        let mut buf = Vec::with_capacity(READ_BUFFER_HINT);
        let mut limited = (&mut source).take(MAX_DOCUMENT_LEN);
        limited.read_to_end(&mut buf)?;

        let xml_text = String::from_utf8(buf).or_else(|_| decode_error("imf: asset map is not utf-8"))?;
        merge_asset_map_document(&xml_text, uri, &mut map)?;
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset_map_xml(path: &str) -> String {
        format!(
            r#"<AssetMap>
                <AssetList>
                    <Asset>
                        <Id>urn:uuid:6104E9A1-79E9-4C92-9C22-ADF522A1DA01</Id>
                        <ChunkList>
                            <Chunk><Path>{}</Path></Chunk>
                        </ChunkList>
                    </Asset>
                </AssetList>
            </AssetMap>"#,
            path
        )
    }

    #[test]
    fn verify_relative_path_resolves_against_local_directory() {
        let xml = asset_map_xml("file.mxf");
        let mut map = AssetLocatorMap::new();
        merge_asset_map_document(&xml, "/packages/p1/ASSETMAP.xml", &mut map).unwrap();
        let uuid = read_uuid_test();
        assert_eq!(map.get(&uuid).unwrap().absolute_uri, "/packages/p1/file.mxf");
    }

    #[test]
    fn verify_posix_absolute_path_is_unchanged() {
        let xml = asset_map_xml("/abs/file.mxf");
        let mut map = AssetLocatorMap::new();
        merge_asset_map_document(&xml, "/packages/p1/ASSETMAP.xml", &mut map).unwrap();
        let uuid = read_uuid_test();
        assert_eq!(map.get(&uuid).unwrap().absolute_uri, "/abs/file.mxf");
    }

    #[test]
    fn verify_url_path_is_unchanged() {
        let xml = asset_map_xml("http://h/x");
        let mut map = AssetLocatorMap::new();
        merge_asset_map_document(&xml, "http://h/base/ASSETMAP.xml", &mut map).unwrap();
        let uuid = read_uuid_test();
        assert_eq!(map.get(&uuid).unwrap().absolute_uri, "http://h/x");
    }

    #[test]
    fn verify_relative_path_resolves_against_url_base() {
        let xml = asset_map_xml("sub/x.mxf");
        let mut map = AssetLocatorMap::new();
        merge_asset_map_document(&xml, "http://h/base/ASSETMAP.xml", &mut map).unwrap();
        let uuid = read_uuid_test();
        assert_eq!(map.get(&uuid).unwrap().absolute_uri, "http://h/base/sub/x.mxf");
    }

    #[test]
    fn verify_dos_absolute_path_is_unchanged() {
        let xml = asset_map_xml(r"C:\media\file.mxf");
        let mut map = AssetLocatorMap::new();
        merge_asset_map_document(&xml, "/packages/p1/ASSETMAP.xml", &mut map).unwrap();
        let uuid = read_uuid_test();
        assert_eq!(map.get(&uuid).unwrap().absolute_uri, r"C:\media\file.mxf");
    }

    #[test]
    fn verify_duplicate_uuid_last_write_wins() {
        let mut map = AssetLocatorMap::new();
        merge_asset_map_document(&asset_map_xml("first.mxf"), "/a/ASSETMAP.xml", &mut map).unwrap();
        merge_asset_map_document(&asset_map_xml("second.mxf"), "/b/ASSETMAP.xml", &mut map).unwrap();
        let uuid = read_uuid_test();
        assert_eq!(map.get(&uuid).unwrap().absolute_uri, "/b/second.mxf");
        assert_eq!(map.len(), 1);
    }

    fn read_uuid_test() -> uuid::Uuid {
        let xml = "<r><Id>urn:uuid:6104E9A1-79E9-4C92-9C22-ADF522A1DA01</Id></r>";
        let doc = Document::parse(xml).unwrap();
        read_uuid(child_by_local_name(doc.root_element(), "Id").unwrap()).unwrap()
    }
}
