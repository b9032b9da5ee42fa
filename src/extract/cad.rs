use super::pdf;
use lopdf::Document;
use tracing::debug;

/// Producer/Creator substrings that identify CAD and vector-drawing
/// authoring tools. A match aborts before any page is parsed.
const CAD_SIGNATURES: [&str; 6] = [
    "autocad",
    "bentley",
    "microstation",
    "revit",
    "bluebeam",
    "graphisoft",
];

/// Decide whether a PDF is machine-generated vector art rather than prose.
/// Two independent signals, either one sufficient:
///
/// 1. Producer/Creator metadata naming a known CAD/vector tool.
/// 2. More path-painting operators on the first page than the threshold.
///
/// If the page structure cannot be inspected at all, the document is
/// flagged — a skipped prose PDF is recoverable by exact hashing, a false
/// near-duplicate between unrelated drawings is not.
pub fn is_vector_origin(doc: &Document, ops_threshold: usize) -> bool {
    let fields = pdf::metadata_fields(doc);
    if fields
        .iter()
        .any(|field| CAD_SIGNATURES.iter().any(|sig| field.contains(sig)))
    {
        debug!("CAD producer signature matched: {:?}", fields);
        return true;
    }

    match pdf::first_page_paint_ops(doc) {
        Ok(count) => {
            if count > ops_threshold {
                debug!("Vector-heavy first page ({} paint ops)", count);
                true
            } else {
                false
            }
        }
        Err(err) => {
            debug!("Cannot probe page content, assuming vector origin: {}", err);
            true
        }
    }
}
