//! Static catalog of the formats pandoc knows about
//!
//! Readers and writers are kept as plain tables. Writers are split in two:
//! string writers print to standard output, binary writers must be given an
//! output file. The two writer tables never share a key.

use crate::format::{FormatEntry, FormatKind};

pub const READERS: &[FormatEntry] = &[
    FormatEntry::reader("html", "HTML").with_extensions(&["html", "htm"]),
    FormatEntry::reader("latex", "LaTeX").with_extensions(&["tex", "latex"]),
    FormatEntry::reader("textile", "textile").with_extensions(&["textile"]),
    FormatEntry::reader("native", "pandoc native").with_extensions(&["native"]),
    FormatEntry::reader("markdown", "markdown").with_extensions(&["md", "markdown"]),
    FormatEntry::reader("json", "pandoc JSON").with_extensions(&["json"]),
    FormatEntry::reader("rst", "reStructuredText").with_extensions(&["rst"]),
];

pub const STRING_WRITERS: &[FormatEntry] = &[
    FormatEntry::string_writer("mediawiki", "MediaWiki markup").with_extensions(&["wiki"]),
    FormatEntry::string_writer("html", "HTML").with_extensions(&["html", "htm"]),
    FormatEntry::string_writer("plain", "plain").with_extensions(&["txt"]),
    FormatEntry::string_writer("latex", "LaTeX").with_extensions(&["tex", "latex"]),
    FormatEntry::string_writer("s5", "S5 HTML slideshow"),
    FormatEntry::string_writer("textile", "textile").with_extensions(&["textile"]),
    FormatEntry::string_writer("texinfo", "GNU Texinfo").with_extensions(&["texi", "texinfo"]),
    FormatEntry::string_writer("docbook", "DocBook XML").with_extensions(&["dbk"]),
    FormatEntry::string_writer("html5", "HTML5"),
    FormatEntry::string_writer("native", "pandoc native").with_extensions(&["native"]),
    FormatEntry::string_writer("org", "emacs org mode").with_extensions(&["org"]),
    FormatEntry::string_writer("rtf", "rich text format").with_extensions(&["rtf"]),
    FormatEntry::string_writer("markdown", "markdown").with_extensions(&["md", "markdown"]),
    FormatEntry::string_writer("man", "groff man").with_extensions(&["man"]),
    FormatEntry::string_writer("dzslides", "Dzslides HTML slideshow"),
    FormatEntry::string_writer("beamer", "Beamer PDF slideshow"),
    FormatEntry::string_writer("json", "pandoc JSON").with_extensions(&["json"]),
    FormatEntry::string_writer("opendocument", "OpenDocument XML").with_extensions(&["fodt"]),
    FormatEntry::string_writer("slidy", "Slidy HTML slideshow"),
    FormatEntry::string_writer("rst", "reStructuredText").with_extensions(&["rst"]),
    FormatEntry::string_writer("context", "ConTeXt").with_extensions(&["ctx"]),
    FormatEntry::string_writer("asciidoc", "asciidoc").with_extensions(&["adoc", "asciidoc"]),
];

pub const BINARY_WRITERS: &[FormatEntry] = &[
    FormatEntry::binary_writer("odt", "OpenDocument").with_extensions(&["odt"]),
    FormatEntry::binary_writer("docx", "Word docx").with_extensions(&["docx"]),
    FormatEntry::binary_writer("epub", "EPUB V2").with_extensions(&["epub"]),
    FormatEntry::binary_writer("epub3", "EPUB V3"),
];

pub fn readers() -> &'static [FormatEntry] {
    READERS
}

pub fn string_writers() -> &'static [FormatEntry] {
    STRING_WRITERS
}

pub fn binary_writers() -> &'static [FormatEntry] {
    BINARY_WRITERS
}

/// All writers, string writers first.
pub fn writers() -> impl Iterator<Item = &'static FormatEntry> {
    STRING_WRITERS.iter().chain(BINARY_WRITERS.iter())
}

fn find(table: &'static [FormatEntry], name: &str) -> Option<&'static FormatEntry> {
    table.iter().find(|entry| entry.name == name)
}

pub fn reader(name: &str) -> Option<&'static FormatEntry> {
    find(READERS, name)
}

pub fn writer(name: &str) -> Option<&'static FormatEntry> {
    find(STRING_WRITERS, name).or_else(|| find(BINARY_WRITERS, name))
}

pub fn reader_label(name: &str) -> Option<&'static str> {
    reader(name).map(|entry| entry.label)
}

pub fn writer_label(name: &str) -> Option<&'static str> {
    writer(name).map(|entry| entry.label)
}

pub fn is_reader(name: &str) -> bool {
    reader(name).is_some()
}

pub fn is_writer(name: &str) -> bool {
    writer(name).is_some()
}

pub fn is_binary_writer(name: &str) -> bool {
    find(BINARY_WRITERS, name).is_some()
}

/// Kind of writer registered under `name`, if any.
pub fn writer_kind(name: &str) -> Option<FormatKind> {
    writer(name).map(|entry| entry.kind)
}
