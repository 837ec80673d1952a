//! Question and answer text for detection QA records.

use super::ResolvedDetection;

const QUESTION_PREFIX: &str = "Does the image contain the following objects? ";
const QUESTION_SUFFIX: &str = ". If yes, please mark their locations.";
const ANSWER_PREFIX: &str = "Yes, the image contains the following objects: ";
const ANSWER_SUFFIX: &str = ".";

/// Separator between answer clauses (full-width semicolon).
pub const CLAUSE_SEPARATOR: &str = "；";

/// Render the human turn for a set of labels.
///
/// `labels` should already be deduplicated; they are joined in the order
/// given.
pub fn render_question<S: AsRef<str>>(labels: &[S]) -> String {
    let joined = labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{QUESTION_PREFIX}{joined}{QUESTION_SUFFIX}")
}

/// Render the assistant turn: one clause per detection, in order.
pub fn render_answer(detections: &[ResolvedDetection]) -> String {
    let clauses = detections
        .iter()
        .map(render_clause)
        .collect::<Vec<_>>()
        .join(CLAUSE_SEPARATOR);
    format!("{ANSWER_PREFIX}{clauses}{ANSWER_SUFFIX}")
}

/// Coordinates print as their task file wrote them: integers bare, floats
/// with a fractional part.
fn render_clause(det: &ResolvedDetection) -> String {
    let [x1, y1, x2, y2] = det.bbox;
    format!(
        "Object {} (ID: {}), Location: [{}, {}, {}, {}]",
        det.label, det.category_id, x1, y1, x2, y2
    )
}
