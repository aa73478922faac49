//! Plain-text read/write for .docx files.
//!
//! A .docx file is a ZIP package; the text lives in `word/document.xml` as
//! WordprocessingML. Reading extracts the text runs paragraph by paragraph;
//! writing produces a minimal package with one paragraph per input line.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::SandboxError;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Read the paragraph text of a .docx file.
pub fn read_docx_text(path: &Path) -> Result<String, SandboxError> {
    let file = fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| SandboxError::other(format!("failed to open docx package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| SandboxError::other(format!("docx package has no document part: {}", e)))?
        .read_to_string(&mut xml)?;

    Ok(extract_paragraph_text(&xml))
}

/// Write text as a minimal .docx package, one paragraph per line.
pub fn write_docx_text(path: &Path, text: &str) -> Result<(), SandboxError> {
    let file = fs::File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let zip_err = |e: zip::result::ZipError| {
        SandboxError::other(format!("failed to write docx package: {}", e))
    };

    writer
        .start_file("[Content_Types].xml", options)
        .map_err(zip_err)?;
    writer.write_all(CONTENT_TYPES_XML.as_bytes())?;

    writer.start_file("_rels/.rels", options).map_err(zip_err)?;
    writer.write_all(RELS_XML.as_bytes())?;

    writer
        .start_file("word/document.xml", options)
        .map_err(zip_err)?;
    writer.write_all(document_xml(text).as_bytes())?;

    writer.finish().map_err(zip_err)?;
    Ok(())
}

/// Build the WordprocessingML document part.
fn document_xml(text: &str) -> String {
    let mut body = String::new();
    for line in text.split('\n') {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape_xml(line));
        body.push_str("</w:t></w:r></w:p>");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    )
}

/// Collect the text runs of a WordprocessingML document; paragraph ends
/// become newlines.
fn extract_paragraph_text(xml: &str) -> String {
    let mut out = String::new();
    let mut pos = 0;

    while let Some(open) = xml[pos..].find('<') {
        let tag_start = pos + open;
        let Some(close_rel) = xml[tag_start..].find('>') else {
            break;
        };
        let tag_end = tag_start + close_rel;
        let tag = &xml[tag_start + 1..tag_end];

        if tag == "w:t" || tag.starts_with("w:t ") {
            if let Some(text_end_rel) = xml[tag_end + 1..].find("</w:t>") {
                let run = &xml[tag_end + 1..tag_end + 1 + text_end_rel];
                out.push_str(&unescape_xml(run));
                pos = tag_end + 1 + text_end_rel + "</w:t>".len();
                continue;
            }
        } else if tag == "/w:p" {
            out.push('\n');
        }

        pos = tag_end + 1;
    }

    while out.ends_with('\n') {
        out.pop();
    }
    out
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
