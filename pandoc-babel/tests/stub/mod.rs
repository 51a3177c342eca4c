//! End to end conversions through a real child process (a stub pandoc script).

#[cfg(unix)]
mod unix {
    use crate::common::{output_arg, stub_pandoc, write_fixture};
    use pandoc_babel::publish::{publish_with, PublishArtifact, PublishSpec};
    use pandoc_babel::{
        ConversionError, ConversionOutput, Converter, ExitStatusCode, FormatRegistry,
        OptionDecl, Settings,
    };
    use std::path::Path;

    fn settings(executable: String) -> Settings {
        Settings::default().with_executable_path(executable)
    }

    #[test]
    fn converts_heading_through_stdin() {
        let stub = stub_pandoc();
        let mut converter = Converter::new("# hello", vec![OptionDecl::value("to", "html")])
            .with_settings(settings(stub.executable()));

        let html = converter.to_text().unwrap();
        assert_eq!(html.trim(), "<h1>hello</h1>");
        assert_eq!(stub.calls(), vec!["--to html".to_string()]);
    }

    #[test]
    fn one_shot_helper_matches_instance_convert() {
        let stub = stub_pandoc();
        let options = vec![OptionDecl::value("to", "html")];

        let helper =
            pandoc_babel::convert_with(settings(stub.executable()), "# hello", options.clone())
                .unwrap();
        let instance = Converter::new("# hello", options)
            .with_settings(settings(stub.executable()))
            .convert(vec![])
            .unwrap();

        assert_eq!(helper, instance);
        assert_eq!(helper.as_text().map(str::trim), Some("<h1>hello</h1>"));
        assert_eq!(stub.calls(), vec!["--to html".to_string(); 2]);
    }

    #[test]
    fn joins_literal_inputs_with_blank_line() {
        let stub = stub_pandoc();
        let mut converter = Converter::new(["# one", "## two"], vec![])
            .with_settings(settings(stub.executable()));

        let html = converter.to_text().unwrap();
        assert_eq!(html, "<h1>one</h1>\n\n<h2>two</h2>\n");
    }

    #[test]
    fn unknown_option_fails_with_stderr() {
        let stub = stub_pandoc();
        let mut converter = Converter::new("# hello", vec![OptionDecl::flag("badopt")])
            .with_settings(settings(stub.executable()));

        match converter.convert(vec![]) {
            Err(ConversionError::Invocation {
                command,
                status,
                stderr,
            }) => {
                assert!(command.ends_with(" --badopt"));
                assert_eq!(status, ExitStatusCode::Code(1));
                assert_eq!(stderr, "Unknown option --badopt.");
            }
            other => panic!("Expected Invocation error, got {other:?}"),
        }
    }

    #[test]
    fn stderr_on_success_depends_on_settings() {
        let stub = stub_pandoc();
        let options = vec![OptionDecl::flag("verbose")];

        let mut strict =
            Converter::new("# hi", options.clone()).with_settings(settings(stub.executable()));
        assert!(matches!(
            strict.convert(vec![]),
            Err(ConversionError::Invocation {
                status: ExitStatusCode::Code(0),
                ..
            })
        ));

        let mut lenient = Converter::new("# hi", options)
            .with_settings(settings(stub.executable()).with_fail_on_stderr(false));
        let output = lenient.convert(vec![]).unwrap();
        assert_eq!(output.as_text().map(str::trim), Some("<h1>hi</h1>"));
    }

    #[test]
    fn binary_writer_returns_bytes_and_removes_temp_file() {
        let stub = stub_pandoc();
        let registry = FormatRegistry::with_settings(settings(stub.executable()));

        let mut converter = registry.open("markdown", "# Report").unwrap();
        let output = registry.write("docx", &mut converter, vec![]).unwrap();
        assert_eq!(output, ConversionOutput::Binary(b"PK\x03\x04stub".to_vec()));

        let calls = stub.calls();
        let temp = output_arg(&calls[0]).expect("temp output path");
        assert!(temp.ends_with(".docx"));
        assert!(!Path::new(&temp).exists(), "{temp} left behind");
    }

    #[test]
    fn epub3_temp_file_uses_epub_extension() {
        let stub = stub_pandoc();
        let mut converter = Converter::new("# Book", vec![])
            .with_settings(settings(stub.executable()));

        converter.to_writer("epub3", vec![]).unwrap();
        let temp = output_arg(&stub.calls()[0]).unwrap();
        assert!(temp.ends_with(".epub"), "{temp}");
    }

    #[test]
    fn repeated_binary_conversions_leave_no_temp_files() {
        let stub = stub_pandoc();
        let registry = FormatRegistry::with_settings(settings(stub.executable()));

        for _ in 0..400 {
            let mut converter = registry.open("markdown", "# Chapter").unwrap();
            let output = registry.write("odt", &mut converter, vec![]).unwrap();
            assert!(output.is_binary());
        }

        let calls = stub.calls();
        assert_eq!(calls.len(), 400);
        let mut seen = std::collections::HashSet::new();
        for call in &calls {
            let temp = output_arg(call).unwrap();
            assert!(!Path::new(&temp).exists(), "{temp} left behind");
            assert!(seen.insert(temp), "temp path reused");
        }
    }

    #[test]
    fn path_mode_passes_existing_files_as_arguments() {
        let stub = stub_pandoc();
        let fixtures = tempfile::tempdir().unwrap();
        let first = write_fixture(fixtures.path(), "one.md", "# First\n");
        let second = write_fixture(fixtures.path(), "two.md", "## Second\n");

        let mut converter = Converter::new(vec![first.clone(), second.clone()], vec![])
            .with_settings(settings(stub.executable()).with_path_mode(true));
        let html = converter.to_writer("html", vec![]).unwrap();

        assert_eq!(html.as_text(), Some("<h1>First</h1>\n<h2>Second</h2>\n"));
        assert_eq!(stub.calls(), vec![format!("--to html {first} {second}")]);
    }

    #[test]
    fn path_mode_falls_back_to_literal_text() {
        let stub = stub_pandoc();
        let mut converter = Converter::new("# not a file", vec![])
            .with_settings(settings(stub.executable()).with_path_mode(true));

        assert_eq!(converter.to_text().unwrap().trim(), "<h1>not a file</h1>");
        assert_eq!(stub.calls(), vec![String::new()]);
    }

    #[test]
    fn path_mode_rejects_mixed_inputs_without_running() {
        let stub = stub_pandoc();
        let fixtures = tempfile::tempdir().unwrap();
        let real = write_fixture(fixtures.path(), "real.md", "# Real\n");

        let mut converter = Converter::new(vec![real, "# literal".to_string()], vec![])
            .with_settings(settings(stub.executable()).with_path_mode(true));
        assert!(matches!(
            converter.convert(vec![]),
            Err(ConversionError::Input(_))
        ));
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn publish_writes_binary_output_directly() {
        let stub = stub_pandoc();
        let registry = FormatRegistry::with_settings(settings(stub.executable()));
        let out_dir = tempfile::tempdir().unwrap();
        let target = out_dir.path().join("report.docx");

        let spec = PublishSpec::new("# Report", "docx")
            .with_reader("markdown")
            .with_output_path(&target);
        let result = publish_with(&registry, spec).unwrap();

        assert_eq!(result.artifact, PublishArtifact::File(target.clone()));
        assert_eq!(std::fs::read(&target).unwrap(), b"PK\x03\x04stub");
    }

    #[test]
    fn missing_executable_is_a_launch_error() {
        let mut converter = Converter::new("# hello", vec![])
            .with_settings(settings("/nonexistent/pandoc-babel/pandoc".to_string()));
        assert!(matches!(
            converter.convert(vec![]),
            Err(ConversionError::Launch { .. })
        ));
    }
}
