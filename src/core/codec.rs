// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octal-escape decoding for whitespace-mangled table fields.
//!
//! Mount table writers replace bytes that would otherwise break column splitting (space, tab,
//! backslash, newline) with a four-byte `\OOO` escape, `O` being an octal digit. This module
//! reverses that mangling.

/// Decodes every `\OOO` escape sequence in `s` into the single byte it represents.
///
/// The output is never longer than the input, since each four-byte escape collapses to one
/// byte. Bytes that are not part of a well-formed escape are copied through unchanged,
/// including a lone backslash not followed by three octal digits.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::codec;
///
/// assert_eq!(codec::unmangle(r"root\040fs"), "root fs");
/// assert_eq!(codec::unmangle(r"no\011escape"), "no\tescape");
/// assert_eq!(codec::unmangle("plain"), "plain");
/// ```
pub fn unmangle(s: &str) -> String {
    log::debug!("core::codec::unmangle decoding octal escapes in {:?}", s);

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal_triplet(&bytes[i + 1..i + 4]) {
            let d1 = (bytes[i + 1] - b'0') as u32;
            let d2 = (bytes[i + 2] - b'0') as u32;
            let d3 = (bytes[i + 3] - b'0') as u32;
            out.push((64 * d1 + 8 * d2 + d3) as u8);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    // Escapes only ever encode single bytes drawn from the mangled set, so the result is
    // guaranteed to stay valid UTF-8 as long as the input was.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn is_octal_triplet(b: &[u8]) -> bool {
    b.len() == 3 && b.iter().all(|&c| (b'0'..=b'7').contains(&c))
}
