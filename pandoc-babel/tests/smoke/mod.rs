//! Smoke tests against a real pandoc. Skipped when pandoc is not on PATH.

use pandoc_babel::{ConversionError, Converter, FormatRegistry, OptionDecl};

fn pandoc_available() -> bool {
    if which::which("pandoc").is_ok() {
        true
    } else {
        eprintln!("Skipping real pandoc tests (pandoc not found on PATH)");
        false
    }
}

#[test]
fn markdown_heading_to_html() {
    if !pandoc_available() {
        return;
    }
    let registry = FormatRegistry::global();
    let mut converter = registry.open("markdown", "# hello").unwrap();
    let html = registry.write("html", &mut converter, vec![]).unwrap();
    let html = html.as_text().unwrap();
    assert!(html.contains("<h1"), "{html}");
    assert!(html.contains("hello</h1>"), "{html}");
}

#[test]
fn one_shot_convert_matches_instance_convert() {
    if !pandoc_available() {
        return;
    }
    let options = vec![OptionDecl::value("from", "markdown"), OptionDecl::value("to", "html")];
    let helper = pandoc_babel::convert("# hello", options.clone()).unwrap();
    let instance = Converter::new("# hello", options).convert(vec![]).unwrap();
    assert_eq!(helper, instance);
}

#[test]
fn markdown_to_rst_with_options() {
    if !pandoc_available() {
        return;
    }
    let mut converter = Converter::new(
        "# Title\n\nSome *emphasis*.",
        vec![OptionDecl::value("from", "markdown"), OptionDecl::value("to", "rst")],
    );
    let rst = converter.to_text().unwrap();
    assert!(rst.contains("Title\n====="), "{rst}");
    assert!(rst.contains("*emphasis*"), "{rst}");
}

#[test]
fn docx_output_is_a_zip_archive() {
    if !pandoc_available() {
        return;
    }
    let mut converter = Converter::from_reader("markdown", "# Report").unwrap();
    let bytes = converter.to_writer("docx", vec![]).unwrap().into_bytes();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn bad_option_is_reported() {
    if !pandoc_available() {
        return;
    }
    let mut converter = Converter::new("# hello", vec![OptionDecl::flag("badopt")]);
    match converter.convert(vec![]) {
        Err(ConversionError::Invocation { stderr, .. }) => {
            assert!(stderr.contains("badopt"), "{stderr}")
        }
        other => panic!("Expected Invocation error, got {other:?}"),
    }
}
