use super::*;

#[test]
fn test_encode_form_preserves_insertion_order() {
    let body = encode_form(
        &[("dataId", "app.settings"), ("group", "DEFAULT_GROUP"), ("tenant", "ns-1")],
        FormVariant::Form,
    );
    assert_eq!(body, "dataId=app.settings&group=DEFAULT_GROUP&tenant=ns-1");
}

#[test]
fn test_encode_form_escapes_reserved_characters() {
    let body = encode_form(&[("content", "a=b&c d")], FormVariant::Form);
    assert_eq!(body, "content=a%3Db%26c%20d");
}

#[test]
fn test_encode_variant_uses_gbk_bytes() {
    // "中" is e4 b8 ad in UTF-8 but d6 d0 in GBK.
    let form = encode_form(&[("content", "中")], FormVariant::Form);
    let encode = encode_form(&[("content", "中")], FormVariant::Encode);
    assert_eq!(form, "content=%E4%B8%AD");
    assert_eq!(encode, "content=%D6%D0");
}

#[test]
fn test_decode_form_round_trip_both_variants() {
    for variant in [FormVariant::Form, FormVariant::Encode] {
        let fields = [("dataId", "com.taobao.cfg"), ("content", "hello 世界")];
        let decoded = decode_form(&encode_form(&fields, variant), variant);
        assert_eq!(
            decoded,
            vec![
                ("dataId".to_string(), "com.taobao.cfg".to_string()),
                ("content".to_string(), "hello 世界".to_string()),
            ]
        );
    }
}

#[test]
fn test_decode_form_wrong_variant_garbles_silently() {
    let body = encode_form(&[("content", "中")], FormVariant::Encode);
    let decoded = decode_form(&body, FormVariant::Form);
    // No error, just the wrong string back.
    assert_eq!(decoded.len(), 1);
    assert_ne!(decoded[0].1, "中");
}

#[test]
fn test_decode_response_text_gbk() {
    // GBK bytes for "中文"
    let body = [0xd6, 0xd0, 0xce, 0xc4];
    assert_eq!(decode_response_text(&body), "中文");
    assert_eq!(decode_response_text(b"plain ascii"), "plain ascii");
}

#[test]
fn test_fingerprint_is_deterministic() {
    let a = fingerprint("some config content");
    let b = fingerprint("some config content");
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
}

#[test]
fn test_fingerprint_known_vector() {
    // ASCII encodes identically under GBK, so this matches plain MD5.
    assert_eq!(fingerprint("abc"), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn test_fingerprint_differs_for_different_content() {
    assert_ne!(fingerprint("value-1"), fingerprint("value-2"));
}

#[test]
fn test_to_array_trims_and_drops_empty_lines() {
    let hosts = to_array("  10.0.0.1  \n\n10.0.0.2\n   \n10.0.0.3\n");
    assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    assert!(to_array("").is_empty());
}

#[test]
fn test_probe_payload_with_tenant() {
    let probe = probe_payload("d1", "g1", "md5abc", Some("ns-1"));
    assert_eq!(probe, "d1\u{2}g1\u{2}md5abc\u{2}ns-1\u{1}");
}

#[test]
fn test_probe_payload_without_tenant() {
    let probe = probe_payload("d1", "g1", "md5abc", None);
    assert_eq!(probe, "d1\u{2}g1\u{2}md5abc\u{1}");
}

#[test]
fn test_join_words() {
    let joined = join_words(&["a".to_string(), "b".to_string(), "c".to_string()]);
    assert_eq!(joined, "a\u{2}b\u{2}c");
}
