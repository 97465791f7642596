// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar readers shared by the CPL and Asset Map parsers.
//!
//! Every operation here takes a [`roxmltree::Node`] and produces a typed value, or fails with
//! `InvalidData`. Namespaces are never consulted; only local (tag) names are matched.

use roxmltree::Node;
use symphonia_core::errors::{decode_error, Result};
use uuid::Uuid;

/// Returns the first child element of `parent` whose local name equals `name`.
///
/// Matching is case-sensitive, as required by XML, and ignores namespace prefixes entirely.
pub fn child_by_local_name<'a, 'input>(
    parent: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    parent.children().find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Concatenates all text node children of `node`, the way a conforming XML reader must when an
/// element's content is split across multiple text nodes (e.g. around a comment).
fn concat_text(node: Node<'_, '_>) -> String {
    node.descendants().filter(|n| n.is_text()).filter_map(|n| n.text()).collect()
}

/// Parses `node`'s text content as `urn:uuid:` followed by eight hex groups of lengths
/// 8-4-4-4-12 (case-insensitive), returning the decoded 16 bytes in canonical network order.
pub fn read_uuid(node: Node<'_, '_>) -> Result<Uuid> {
    let text = concat_text(node);
    let text = text.trim();

    const PREFIX: &str = "urn:uuid:";
    if text.len() != PREFIX.len() + 36 || !text[..PREFIX.len()].eq_ignore_ascii_case(PREFIX) {
        return decode_error("imf: malformed uuid text");
    }

    let body = &text[PREFIX.len()..];
    let groups: [usize; 5] = [8, 4, 4, 4, 12];
    let mut pos = 0;
    let mut hex = String::with_capacity(32);

    for (i, &len) in groups.iter().enumerate() {
        let group = &body[pos..pos + len];
        if !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return decode_error("imf: malformed uuid text");
        }
        hex.push_str(group);
        pos += len;

        if i < groups.len() - 1 {
            if body.as_bytes().get(pos) != Some(&b'-') {
                return decode_error("imf: malformed uuid text");
            }
            pos += 1;
        }
    }

    let mut bytes = [0u8; 16];
    for (i, byte) in bytes.iter_mut().enumerate() {
        let hi = hex.as_bytes()[i * 2];
        let lo = hex.as_bytes()[i * 2 + 1];
        let hi = (hi as char).to_digit(16).unwrap() as u8;
        let lo = (lo as char).to_digit(16).unwrap() as u8;
        *byte = (hi << 4) | lo;
    }

    Ok(Uuid::from_bytes(bytes))
}

/// Parses `node`'s text content as `"<num> <den>"`, two whitespace-separated signed integers.
/// Fails if `den == 0`.
pub fn read_rational(node: Node<'_, '_>) -> Result<(i64, i64)> {
    let text = concat_text(node);
    let mut parts = text.split_whitespace();

    let num = parts.next().and_then(|s| s.parse::<i64>().ok());
    let den = parts.next().and_then(|s| s.parse::<i64>().ok());

    if parts.next().is_some() {
        return decode_error("imf: trailing text in rational");
    }

    match (num, den) {
        (Some(num), Some(den)) if den != 0 => Ok((num, den)),
        _ => decode_error("imf: malformed rational"),
    }
}

/// Parses `node`'s text content as an unsigned decimal integer fitting in 64 bits.
pub fn read_ulong(node: Node<'_, '_>) -> Result<u64> {
    let text = concat_text(node);
    text.trim().parse::<u64>().or_else(|_| decode_error("imf: malformed unsigned integer"))
}
