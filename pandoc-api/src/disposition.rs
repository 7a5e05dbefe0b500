//! `Content-Disposition` parsing and rendering.
//!
//! Raw uploads name their file through `filename` or the RFC 5987
//! `filename*` parameter. Responses always carry an ASCII `filename`, plus a
//! `filename*` when the real name needs more than ASCII.

use std::borrow::Cow;

/// Extracts the file name from a `Content-Disposition` header value.
///
/// `filename*` wins over `filename` when both are present. Returns `None`
/// when neither parameter yields a non-empty name.
#[must_use]
pub fn parse_filename(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;
    for parameter in split_parameters(header).into_iter().skip(1) {
        let Some((raw_name, raw_value)) = parameter.split_once('=') else {
            continue;
        };
        let name = raw_name.trim();
        let value = raw_value.trim();
        if name.eq_ignore_ascii_case("filename*") {
            extended = decode_extended(value);
        } else if name.eq_ignore_ascii_case("filename") {
            plain = Some(unquote(value));
        }
    }
    extended.or(plain).filter(|name| !name.is_empty())
}

/// Renders an `attachment` disposition for `filename`.
#[must_use]
pub fn attachment(filename: &str) -> String {
    let fallback = ascii_fallback(filename);
    if fallback == filename {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        )
    }
}

fn split_parameters(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (index, ch) in header.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                parts.push(header.get(start..index).unwrap_or_default());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(header.get(start..).unwrap_or_default());
    parts
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_owned();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn decode_extended(value: &str) -> Option<String> {
    // charset'language'encoded; only UTF-8 is accepted.
    let (charset, rest) = value.split_once('\'')?;
    let (_, encoded) = rest.split_once('\'')?;
    if charset.eq_ignore_ascii_case("utf-8") {
        percent_decode(encoded)
    } else {
        None
    }
}

fn percent_decode(encoded: &str) -> Option<String> {
    urlencoding::decode(encoded).ok().map(Cow::into_owned)
}

fn ascii_fallback(filename: &str) -> String {
    filename
        .chars()
        .map(|ch| {
            if ch.is_ascii() && !ch.is_ascii_control() && ch != '"' && ch != '\\' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
