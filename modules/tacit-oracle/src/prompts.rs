//! Role system prompts and context formatting for the text oracle.

use tacit_common::{DocType, RankedHit, RELATED_DOC_DISPLAY_LIMIT};

use crate::traits::TopicContext;

pub const SEARCH_SYSTEM_PROMPT: &str = "You are an advanced AI designed to guide users to find the best knowledge from the given text documents. \
When responding, focus on the topics and keywords from the relevant documents in our knowledge base. \
If relevant documents are found, reference them in your response and explain how they relate to the user's query. \
Keep your responses well-structured and use appropriate formatting. \
If the user asks an unrelated question, just say 'I'm sorry, I can't answer that question.'";

pub const GAP_ANALYSIS_SYSTEM_PROMPT: &str = "You are an AI expert in analyzing knowledge gaps and identifying missing topics in educational content. \
Your task is to analyze the existing knowledge base and identify potential gaps that should be addressed. \
Consider industry standards, prerequisites, related concepts, and practical applications. \
Format your response as a JSON array of objects with 'topic' and 'reason' fields. \
Each topic should be specific and actionable, and each reason should explain why this topic is important and how it relates to existing content.";

pub const TOPIC_GAP_ANALYSIS_SYSTEM_PROMPT: &str = "You are an AI expert in analyzing specific topics for knowledge gaps. \
Your task is to analyze the given topic and identify related concepts or subtopics that should be covered. \
Consider prerequisites, practical applications, and industry best practices. \
Format your response as a JSON array of objects with 'topic' and 'reason' fields. \
Focus on specific, actionable topics that would enhance understanding of the main subject.";

pub const GAP_ANALYSIS_PROMPT: &str = "Based on the existing knowledge base topics and keywords, identify potential knowledge gaps \
that should be covered. Consider industry standards, related topics, and prerequisite knowledge. \
For each gap, provide a clear topic and reason why it should be added.";

pub fn topic_gap_analysis_prompt(topic: &str) -> String {
    format!(
        "Analyze the knowledge base for gaps related to '{topic}'. \
Consider prerequisites, related concepts, and practical applications. \
For each gap, provide a clear topic and reason why it should be added."
    )
}

/// Summarize the top ranked hits for the `search` role system prompt.
/// Shows at most the top three documents; assumes `hits` is already ordered
/// by descending score.
pub fn format_search_context(hits: &[RankedHit]) -> String {
    if hits.is_empty() {
        return "No relevant documents found in the knowledge base.".to_string();
    }

    let mut text =
        String::from("Based on our knowledge base, I can provide information about the following topics:\n");

    for (i, hit) in hits.iter().take(RELATED_DOC_DISPLAY_LIMIT).enumerate() {
        let kind = match hit.doc_type {
            DocType::Document => "Document",
            DocType::Summary => "Summary",
        };
        text.push_str(&format!("\n{}. {}: '{}'\n", i + 1, kind, hit.title));
        text.push_str(&format!(
            "   Field: {}\n",
            hit.field.as_deref().unwrap_or("N/A")
        ));
        match hit.doc_type {
            DocType::Document if !hit.keywords.is_empty() => {
                text.push_str(&format!("   Keywords: {}\n", hit.keywords.join(", ")));
                if !hit.matched_keywords.is_empty() {
                    text.push_str(&format!(
                        "   Matched terms: {}\n",
                        hit.matched_keywords.join(", ")
                    ));
                }
            }
            DocType::Summary if hit.summary_content.is_some() => {
                text.push_str("   Type: Chat Summary\n");
            }
            _ => {}
        }
    }

    text
}

/// List the existing topics for the gap-analysis roles.
pub fn format_topic_context(ctx: &TopicContext) -> String {
    let mut text = String::from("\n\nExisting topics and their information:\n");
    for row in &ctx.topics {
        text.push_str(&format!("\nTopic: {}", row.topic));
        if !row.keywords.is_empty() {
            text.push_str(&format!("\nKeywords: {}", row.keywords.join(", ")));
        }
        if !row.fields.is_empty() {
            text.push_str(&format!("\nFields: {}", row.fields.join(", ")));
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacit_common::TopicRow;
    use uuid::Uuid;

    fn doc_hit(title: &str, score: f64, keywords: &[&str]) -> RankedHit {
        RankedHit {
            id: Uuid::new_v4(),
            title: title.to_string(),
            doc_type: DocType::Document,
            file_link: Some("/uploads/x.pdf".to_string()),
            view_link: Some("/uploads/x.pdf".to_string()),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            matched_keywords: vec![],
            field: Some("devops".to_string()),
            content_type: Some("application/pdf".to_string()),
            filename: Some("x.pdf".to_string()),
            original_filename: Some("x.pdf".to_string()),
            score,
            author: Some("a".to_string()),
            created_at: None,
            summary_content: None,
        }
    }

    #[test]
    fn empty_context_has_fixed_message() {
        assert_eq!(
            format_search_context(&[]),
            "No relevant documents found in the knowledge base."
        );
    }

    #[test]
    fn context_caps_at_three_documents() {
        let hits: Vec<_> = (0..5)
            .map(|i| doc_hit(&format!("Doc {i}"), 1.0 - i as f64 * 0.1, &["kw"]))
            .collect();
        let text = format_search_context(&hits);
        assert!(text.contains("Doc 0"));
        assert!(text.contains("Doc 2"));
        assert!(!text.contains("Doc 3"));
    }

    #[test]
    fn topic_context_lists_keywords_and_fields() {
        let ctx = TopicContext {
            topics: vec![TopicRow {
                topic: "Kubernetes Basics".to_string(),
                keywords: vec!["k8s".to_string(), "orchestration".to_string()],
                fields: vec!["devops".to_string()],
                id: Uuid::new_v4(),
            }],
        };
        let text = format_topic_context(&ctx);
        assert!(text.contains("Topic: Kubernetes Basics"));
        assert!(text.contains("Keywords: k8s, orchestration"));
        assert!(text.contains("Fields: devops"));
    }
}
