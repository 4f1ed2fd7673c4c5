//! Defensive normalization of oracle output.
//!
//! The gap-analysis roles are asked for a JSON array of `{topic, reason}`
//! objects but frequently return prose, partial JSON, or nothing. These
//! functions coerce whatever came back into a validated `Vec<GapFinding>`
//! and never panic or error.

use serde_json::Value;

use tacit_common::{GapFinding, RankedHit, RELATED_DOC_DISPLAY_LIMIT};

/// Reason attached to the fallback record when the oracle call itself failed.
pub const ERROR_FALLBACK_REASON: &str =
    "An error occurred while analyzing the knowledge base. Please try again.";

/// Shown instead of a search answer when the oracle call failed.
pub const SEARCH_FALLBACK_ANSWER: &str =
    "I apologize, but I encountered an error. Please try again.";

/// Shown when the oracle returned an empty search answer.
pub const EMPTY_ANSWER: &str = "I'm sorry, I can't answer that question.";

/// Drop duplicate whole sentences (split on ". "), keeping first occurrence.
/// Small generative models tend to repeat themselves verbatim.
pub fn dedupe_sentences(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for sentence in text.trim().split(". ") {
        if !seen.contains(&sentence) {
            seen.push(sentence);
        }
    }
    seen.join(". ")
}

/// Coerce raw gap-analysis output into `{topic, reason}` records.
///
/// Strategy, in order:
/// 1. Strict JSON-array parse of the substring between the first `[` and the
///    last `]`. Elements missing both keys are dropped; a missing `reason`
///    becomes an empty string.
/// 2. Line-oriented parse of `Topic:` / `Reason:` prefixed lines.
/// 3. A single `{topic: "General Gap", reason: <raw text>}` record.
///
/// A well-formed empty array (`[]`) yields an empty list — the oracle found
/// no gaps. Every other input produces at least one record. The caller uses
/// [`error_fallback`] when the oracle call itself failed.
pub fn parse_gap_findings(raw: &str) -> Vec<GapFinding> {
    let cleaned = dedupe_sentences(raw);

    if let Some(findings) = parse_json_array(&cleaned) {
        return findings;
    }

    let findings = parse_topic_reason_lines(&cleaned);
    if !findings.is_empty() {
        return findings;
    }

    vec![GapFinding {
        topic: "General Gap".to_string(),
        reason: cleaned,
    }]
}

/// The deterministic record substituted when the oracle is unreachable or
/// errored outright.
pub fn error_fallback() -> Vec<GapFinding> {
    vec![GapFinding {
        topic: "Error".to_string(),
        reason: ERROR_FALLBACK_REASON.to_string(),
    }]
}

/// Append a deterministic "Related Documents" section listing the top hits
/// by score. `hits` is assumed ordered by descending score.
pub fn append_related_documents(text: &str, hits: &[RankedHit]) -> String {
    if hits.is_empty() {
        return text.to_string();
    }

    let mut out = String::from(text);
    out.push_str("\n\nRelated Documents:");
    for hit in hits.iter().take(RELATED_DOC_DISPLAY_LIMIT) {
        out.push_str(&format!(
            "\n- {} (Field: {})",
            hit.title,
            hit.field.as_deref().unwrap_or("N/A")
        ));
        if let Some(link) = hit.view_link.as_deref() {
            out.push_str(&format!(" — {link}"));
        }
    }
    out
}

fn parse_json_array(text: &str) -> Option<Vec<GapFinding>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }

    let value: Value = serde_json::from_str(&text[start..=end]).ok()?;
    let items = value.as_array()?;

    let mut findings = Vec::new();
    for item in items {
        let topic = item.get("topic").and_then(Value::as_str).unwrap_or("");
        let reason = item.get("reason").and_then(Value::as_str).unwrap_or("");
        if topic.is_empty() && reason.is_empty() {
            continue;
        }
        findings.push(GapFinding {
            topic: topic.to_string(),
            reason: reason.to_string(),
        });
    }
    Some(findings)
}

fn parse_topic_reason_lines(text: &str) -> Vec<GapFinding> {
    let mut findings = Vec::new();
    let mut current: Option<GapFinding> = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Topic:") {
            if let Some(gap) = current.take() {
                findings.push(gap);
            }
            current = Some(GapFinding {
                topic: rest.trim().to_string(),
                reason: String::new(),
            });
        } else if let Some(rest) = line.strip_prefix("Reason:") {
            if let Some(gap) = current.as_mut() {
                gap.reason = rest.trim().to_string();
            }
        }
    }

    if let Some(gap) = current.take() {
        findings.push(gap);
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacit_common::DocType;
    use uuid::Uuid;

    #[test]
    fn json_array_embedded_in_prose() {
        let raw = r#"here are gaps: [{"topic":"A","reason":"B"}] end"#;
        assert_eq!(
            parse_gap_findings(raw),
            vec![GapFinding {
                topic: "A".to_string(),
                reason: "B".to_string()
            }]
        );
    }

    #[test]
    fn malformed_elements_are_dropped_not_fatal() {
        let raw = r#"[{"topic":"A","reason":"B"}, {"unrelated": 1}, {"topic":"C"}]"#;
        let findings = parse_gap_findings(raw);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].topic, "A");
        assert_eq!(findings[1].topic, "C");
        assert_eq!(findings[1].reason, "");
    }

    #[test]
    fn topic_reason_lines_without_brackets() {
        let raw = "Topic: X\nReason: Y\n";
        assert_eq!(
            parse_gap_findings(raw),
            vec![GapFinding {
                topic: "X".to_string(),
                reason: "Y".to_string()
            }]
        );
    }

    #[test]
    fn multiple_topic_reason_pairs() {
        let raw = "Topic: A\nReason: ra\nTopic: B\nReason: rb";
        let findings = parse_gap_findings(raw);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[1].topic, "B");
        assert_eq!(findings[1].reason, "rb");
    }

    #[test]
    fn valid_empty_array_means_no_gaps() {
        assert!(parse_gap_findings("[]").is_empty());
        assert!(parse_gap_findings("No gaps found: []").is_empty());
    }

    #[test]
    fn garbage_becomes_general_gap() {
        let raw = "the model rambled about nothing structured";
        let findings = parse_gap_findings(raw);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].topic, "General Gap");
        assert_eq!(findings[0].reason, raw);
    }

    #[test]
    fn empty_input_never_panics() {
        let findings = parse_gap_findings("");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].topic, "General Gap");
    }

    #[test]
    fn invalid_json_falls_through_to_line_parse() {
        let raw = "[not json\nTopic: X\nReason: Y]";
        // The bracketed span fails strict parsing, but Topic:/Reason: lines
        // are still recovered.
        let findings = parse_gap_findings(raw);
        assert_eq!(findings[0].topic, "X");
    }

    #[test]
    fn error_fallback_shape() {
        let findings = error_fallback();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].topic, "Error");
        assert_eq!(findings[0].reason, ERROR_FALLBACK_REASON);
    }

    #[test]
    fn duplicate_sentences_dropped_in_order() {
        let text = "First point. Second point. First point. Third point";
        assert_eq!(
            dedupe_sentences(text),
            "First point. Second point. Third point"
        );
    }

    fn hit(title: &str, score: f64) -> RankedHit {
        RankedHit {
            id: Uuid::new_v4(),
            title: title.to_string(),
            doc_type: DocType::Document,
            file_link: Some(format!("/uploads/{title}.pdf")),
            view_link: Some(format!("/uploads/{title}.pdf")),
            keywords: vec![],
            matched_keywords: vec![],
            field: Some("devops".to_string()),
            content_type: None,
            filename: None,
            original_filename: None,
            score,
            author: None,
            created_at: None,
            summary_content: None,
        }
    }

    #[test]
    fn related_documents_capped_at_three() {
        let hits: Vec<_> = (0..4).map(|i| hit(&format!("doc{i}"), 1.0)).collect();
        let out = append_related_documents("answer", &hits);
        assert!(out.starts_with("answer"));
        assert!(out.contains("doc0"));
        assert!(out.contains("doc2"));
        assert!(!out.contains("doc3"));
    }

    #[test]
    fn no_hits_leaves_text_untouched() {
        assert_eq!(append_related_documents("answer", &[]), "answer");
    }
}
