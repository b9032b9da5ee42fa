use lopdf::{Dictionary, Document, Object};
use std::path::Path;

pub fn load(path: &Path) -> Result<Document, lopdf::Error> {
    Document::load(path)
}

/// Extract the text of every page. lopdf decodes the content streams and
/// font encodings itself; any failure is the caller's cue to fall back to
/// raw-byte hashing.
pub fn document_text(doc: &Document) -> Result<String, lopdf::Error> {
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&page_numbers)
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Lowercased, lossily-decoded Producer and Creator metadata fields.
/// Malformed byte encodings are tolerated rather than failed.
pub fn metadata_fields(doc: &Document) -> Vec<String> {
    let mut fields = Vec::new();
    if let Some(info) = info_dict(doc) {
        for key in [b"Producer".as_slice(), b"Creator".as_slice()] {
            if let Ok(Object::String(bytes, _)) = info.get(key) {
                fields.push(String::from_utf8_lossy(bytes).to_lowercase());
            }
        }
    }
    fields
}

/// Operators that paint a path (stroke/fill variants). Text and image
/// operators are deliberately not counted.
const PAINT_OPERATORS: [&str; 9] = ["S", "s", "f", "F", "f*", "B", "B*", "b", "b*"];

/// Count path-painting operators on the first page only — one page is
/// enough to recognize a drawing, and it keeps the probe cheap.
pub fn first_page_paint_ops(doc: &Document) -> Result<usize, lopdf::Error> {
    let pages = doc.get_pages();
    let page_id = match pages.values().next() {
        Some(id) => *id,
        None => return Ok(0),
    };

    let content_data = doc.get_page_content(page_id)?;
    let content = lopdf::content::Content::decode(&content_data)?;

    let count = content
        .operations
        .iter()
        .filter(|op| PAINT_OPERATORS.contains(&op.operator.as_str()))
        .count();

    Ok(count)
}
