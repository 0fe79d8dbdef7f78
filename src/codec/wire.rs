use encoding_rs::GBK;
use md5::Digest;
use md5::Md5;
use percent_encoding::percent_decode_str;
use percent_encoding::percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

use crate::constants::LINE_SEPARATOR;
use crate::constants::WORD_SEPARATOR;

/// Characters left bare by the service's form encoder. Everything else
/// is percent-escaped, byte by byte.
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Which byte encoding a form body was produced with.
///
/// Decoding with the wrong variant silently yields garbled values
/// rather than an error, so callers must track the variant used on the
/// encode side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVariant {
    /// Plain query-string encoding over UTF-8 bytes
    Form,
    /// Doubly-escaped encoding over GBK bytes
    Encode,
}

/// Form-encode `fields` as `key=value&...` preserving insertion order.
///
/// Order is load-bearing: the signature downstream is computed over the
/// same field set, and the server re-derives it independently.
pub fn encode_form(
    fields: &[(&str, &str)],
    variant: FormVariant,
) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k, variant), escape(v, variant)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Inverse of [`encode_form`] for the given variant.
pub fn decode_form(
    body: &str,
    variant: FormVariant,
) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (unescape(k, variant), unescape(v, variant))
        })
        .collect()
}

fn escape(
    value: &str,
    variant: FormVariant,
) -> String {
    match variant {
        FormVariant::Form => percent_encode(value.as_bytes(), FORM).to_string(),
        FormVariant::Encode => {
            let (bytes, _, _) = GBK.encode(value);
            percent_encode(&bytes, FORM).to_string()
        }
    }
}

fn unescape(
    value: &str,
    variant: FormVariant,
) -> String {
    let bytes: Vec<u8> = percent_decode_str(value).collect();
    match variant {
        FormVariant::Form => String::from_utf8_lossy(&bytes).into_owned(),
        FormVariant::Encode => GBK.decode(&bytes).0.into_owned(),
    }
}

/// Decode a fully-buffered response body from the service charset.
///
/// The transport accumulates the streamed body before calling this, so
/// multi-byte sequences never straddle a chunk boundary here.
pub fn decode_response_text(body: &[u8]) -> String {
    GBK.decode(body).0.into_owned()
}

/// MD5 hex digest over the GBK encoding of `content`.
///
/// Used as a cheap equality check between fetches, never for security.
pub fn fingerprint(content: &str) -> String {
    let (bytes, _, _) = GBK.encode(content);
    let digest = Md5::digest(&bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Split a newline-delimited list, trimming and dropping empty lines.
pub fn to_array(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join batch dataIds with the wire word separator.
pub(crate) fn join_words(items: &[String]) -> String {
    items.join(&WORD_SEPARATOR.to_string())
}

/// Build the `Probe-Modify-Request` value for one watched entry.
///
/// Layout: `dataId \x02 group \x02 contentMD5 \x02 tenant \x01` when a
/// tenant is present, `dataId \x02 group \x02 contentMD5 \x01` when
/// not.
pub(crate) fn probe_payload(
    data_id: &str,
    group: &str,
    content_md5: &str,
    tenant: Option<&str>,
) -> String {
    let mut probe = String::new();
    probe.push_str(data_id);
    probe.push(WORD_SEPARATOR);
    probe.push_str(group);
    probe.push(WORD_SEPARATOR);
    probe.push_str(content_md5);
    match tenant {
        Some(tenant) => {
            probe.push(WORD_SEPARATOR);
            probe.push_str(tenant);
        }
        None => {}
    }
    probe.push(LINE_SEPARATOR);
    probe
}
