use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;

lazy_static! {
    static ref TEXT_RUN: Regex = Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").unwrap();
}

/// Pull paragraph text out of the `word/document.xml` entry of a DOCX
/// package. Paragraphs are joined with newlines; run formatting is
/// discarded.
pub fn document_text(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    Ok(paragraph_text(&xml))
}

fn paragraph_text(xml: &str) -> String {
    let mut paragraphs = Vec::new();

    for chunk in xml.split("</w:p>") {
        let mut text = String::new();
        for cap in TEXT_RUN.captures_iter(chunk) {
            text.push_str(&unescape_xml(&cap[1]));
        }
        if !text.is_empty() {
            paragraphs.push(text);
        }
    }

    paragraphs.join("\n")
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
