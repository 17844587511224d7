//! End-to-end report tests: parse two documents, diff them and compare the
//! printed report.

use pretty_assertions::assert_eq;
use xmldiff::{
    parse_str, xml_diff, xml_diff_to_string, DiffOptions, Error, ParserOptions, TagFilter,
    XmlParser,
};

fn report(a: &str, b: &str) -> String {
    report_with(a, b, &DiffOptions::default())
}

fn report_with(a: &str, b: &str, options: &DiffOptions) -> String {
    let a = parse_str(a).unwrap();
    let b = parse_str(b).unwrap();
    xml_diff_to_string(&a, &b, options).unwrap()
}

fn minimal_report(a: &str, b: &str, options: &DiffOptions) -> String {
    let parser = XmlParser::new(ParserOptions::minimal());
    let a = parser.parse_str(a).unwrap();
    let b = parser.parse_str(b).unwrap();
    xml_diff_to_string(&a, &b, options).unwrap()
}

const DOCUMENT: &str = r#"<?xml version="1.0"?>
<library xmlns:dc="http://purl.org/dc/elements/1.1/">
  <book id="b1" dc:lang="en">
    <dc:title>Programming Rust</dc:title>
    <note>Covers &lt;unsafe&gt; &amp; FFI</note>
  </book>
  <book id="b2">
    <dc:title>Rust for Rustaceans</dc:title>
  </book>
</library>
"#;

#[test]
fn identical_documents_produce_no_output() {
    assert_eq!(report(DOCUMENT, DOCUMENT), "");
}

#[test]
fn sibling_insert_and_delete() {
    let expected = concat!(
        " <a>\n",
        "-  <b/>\n",
        "   <c/>\n",
        "+  <d/>\n",
        " </a>\n",
    );
    assert_eq!(report("<a><b/><c/></a>", "<a><c/><d/></a>"), expected);
}

#[test]
fn attribute_value_change() {
    assert_eq!(
        report(r#"<a x="1"/>"#, r#"<a x="2"/>"#),
        " <a\n-  x=\"1\"\n+  x=\"2\"/>\n"
    );
}

#[test]
fn attribute_changes_keep_shared_attributes_on_open_tag() {
    let expected = concat!(
        " <a keep=\"k\"\n",
        "-  gone=\"g\"\n",
        "+  new=\"n\"\n",
        "-  x=\"1\"\n",
        "+  x=\"2\">\n",
        "   <b/>\n",
        " </a>\n",
    );
    assert_eq!(
        report(
            r#"<a keep="k" gone="g" x="1"><b/></a>"#,
            r#"<a keep="k" new="n" x="2"><b/></a>"#
        ),
        expected
    );
}

#[test]
fn seeded_prefix_is_used_for_identical_trees() {
    let doc = r#"<x:a xmlns:x="urn:x"/>"#;
    let options = DiffOptions::new().with_namespace("ns", "urn:x");
    assert_eq!(report_with(doc, doc, &options), "");

    let changed = r#"<x:a xmlns:x="urn:x" k="1"/>"#;
    assert_eq!(
        report_with(doc, changed, &options),
        " <ns:a xmlns:ns=\"urn:x\"\n+  k=\"1\"/>\n"
    );
}

#[test]
fn document_prefixes_are_reused() {
    let expected = concat!(
        " <p:a xmlns:p=\"urn:p\">\n",
        "+  <p:c/>\n",
        "-  <p:b/>\n",
        " </p:a>\n",
    );
    assert_eq!(
        report(
            r#"<p:a xmlns:p="urn:p"><p:b/></p:a>"#,
            r#"<p:a xmlns:p="urn:p"><p:c/></p:a>"#
        ),
        expected
    );
}

#[test]
fn minimal_trees_get_synthetic_prefixes() {
    assert_eq!(
        minimal_report(
            r#"<p:a xmlns:p="urn:p" k="1"/>"#,
            r#"<p:a xmlns:p="urn:p" k="2"/>"#,
            &DiffOptions::default()
        ),
        " <ns0:a xmlns:ns0=\"urn:p\"\n-  k=\"1\"\n+  k=\"2\"/>\n"
    );
}

#[test]
fn prefixes_found_deep_in_the_tree_are_declared_at_the_root() {
    assert_eq!(
        minimal_report(
            "<r/>",
            r#"<r><x:e xmlns:x="urn:e"/></r>"#,
            &DiffOptions::default()
        ),
        " <r xmlns:ns0=\"urn:e\">\n+  <ns0:e/>\n </r>\n"
    );
}

#[test]
fn rebound_prefix_shows_as_declaration_change() {
    let expected = concat!(
        " <r\n",
        "-  xmlns:p=\"urn:1\"\n",
        "+  xmlns:p=\"urn:2\">\n",
        "+  <p:x/>\n",
        "-  <p:x/>\n",
        " </r>\n",
    );
    assert_eq!(
        report(
            r#"<r xmlns:p="urn:1"><p:x/></r>"#,
            r#"<r xmlns:p="urn:2"><p:x/></r>"#
        ),
        expected
    );
}

#[test]
fn replaced_root_is_separated_by_blank_line() {
    assert_eq!(
        report("<a><x/></a>", "<b/>"),
        "-<a>\n-  <x/>\n-</a>\n\n+<b/>\n"
    );
}

#[test]
fn added_subtree_is_printed_whole() {
    assert_eq!(
        report("<a/>", "<a><b><c>t</c></b></a>"),
        " <a>\n+  <b>\n+    <c>t</c>\n+  </b>\n </a>\n"
    );
}

#[test]
fn identity_attributes_align_children() {
    let expected = concat!(
        " <l>\n",
        "-  <i id=\"1\">a</i>\n",
        "   <i id=\"2\">b</i>\n",
        " </l>\n",
    );
    assert_eq!(
        report(
            r#"<l><i id="1">a</i><i id="2">b</i></l>"#,
            r#"<l><i id="2">b</i></l>"#
        ),
        expected
    );
}

#[test]
fn text_is_escaped() {
    assert_eq!(
        report("<a>x &lt; y</a>", "<a>x &gt; y</a>"),
        " <a>\n+  x &gt; y\n-  x &lt; y\n </a>\n"
    );
}

#[test]
fn attribute_values_are_escaped() {
    assert_eq!(
        report(r#"<a t="x"/>"#, r#"<a t="a&quot;b&#10;c"/>"#),
        " <a\n-  t=\"x\"\n+  t=\"a&quot;b&#10;c\"/>\n"
    );
}

#[test]
fn skipped_tags_are_ignored() {
    let a = r#"<doc xmlns:m="urn:m"><m:meta rev="1"/><body/></doc>"#;
    let b = r#"<doc xmlns:m="urn:m"><m:meta rev="2"/><body/><m:meta/></doc>"#;
    let options = DiffOptions::new().with_filter(TagFilter::new(["{urn:m}meta"]));
    assert_eq!(report_with(a, b, &options), "");
}

#[test]
fn report_goes_to_any_writer() {
    let a = parse_str("<a><b/></a>").unwrap();
    let b = parse_str("<a/>").unwrap();
    let mut out = Vec::new();
    xml_diff(&a, &b, &DiffOptions::default(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), " <a>\n-  <b/>\n </a>\n");
}

#[test]
fn comments_are_rejected_when_kept() {
    let options = ParserOptions {
        keep_comments: true,
        ..ParserOptions::default()
    };
    let parser = XmlParser::new(options);
    let a = parser.parse_str("<a><!-- note --></a>").unwrap();
    assert!(matches!(
        xml_diff_to_string(&a, &a, &DiffOptions::default()),
        Err(Error::UnsupportedNodeKind(_))
    ));
}

#[test]
fn unbound_prefix_is_a_parse_error() {
    assert!(matches!(parse_str("<p:a/>"), Err(Error::Parse(_))));
}

#[test]
fn multiline_text_keeps_marker_on_every_line() {
    let expected = concat!(
        " <a>\n",
        "   <p>\n",
        "+    one\n",
        "+    three\n",
        "-    one\n",
        "-    two\n",
        "   </p>\n",
        " </a>\n",
    );
    assert_eq!(
        report("<a><p>one\ntwo</p></a>", "<a><p>one\nthree</p></a>"),
        expected
    );
}

#[test]
fn added_element_with_multiline_text() {
    let expected = concat!(
        " <a>\n",
        "+  <p>\n",
        "+    x &lt; y\n",
        "+    z\n",
        "+  </p>\n",
        " </a>\n",
    );
    assert_eq!(report("<a/>", "<a><p>x &lt; y\nz</p></a>"), expected);
}

#[test]
fn document_binding_does_not_replace_seeded_prefix() {
    let options = DiffOptions::new().with_namespace("p", "urn:seed");
    let a = r#"<r xmlns:p="urn:doc" xmlns:q="urn:seed"><q:s/><p:d/></r>"#;
    let b = r#"<r xmlns:p="urn:doc" xmlns:q="urn:seed"><q:s/><p:d/><q:t/></r>"#;
    let expected = concat!(
        " <r xmlns:ns0=\"urn:doc\" xmlns:p=\"urn:seed\">\n",
        "   <p:s/>\n",
        "   <ns0:d/>\n",
        "+  <p:t/>\n",
        " </r>\n",
    );
    assert_eq!(report_with(a, b, &options), expected);
}

#[test]
fn zero_indent_adds_no_blank_lines_inside_the_tree() {
    let options = DiffOptions::new().with_indent_width(0);
    let expected = concat!(" <a>\n", " <b>\n", "+<d/>\n", "-<c/>\n", " </b>\n", " </a>\n");
    assert_eq!(
        report_with("<a><b><c/></b></a>", "<a><b><d/></b></a>", &options),
        expected
    );
}
