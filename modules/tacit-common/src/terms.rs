use crate::types::TermExtractor;

/// The search-term set for one query: the case-folded, deduplicated union of
/// the raw query, extracted named entities, and extracted lemmatized keywords.
///
/// Insertion order is preserved (query first) so the same inputs always
/// produce the same store parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    raw_query: String,
    terms: Vec<String>,
}

impl SearchTerms {
    /// Build the term set by running the NLP collaborator over the query.
    pub fn from_query(query: &str, extractor: &dyn TermExtractor) -> Self {
        let extraction = extractor.extract(query);
        Self::build(query, &extraction.entities, &extraction.keywords)
    }

    pub fn build(query: &str, entities: &[String], keywords: &[String]) -> Self {
        let raw_query = query.trim().to_string();
        let mut terms: Vec<String> = Vec::new();

        let mut push = |term: &str| {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        };

        push(&raw_query);
        for entity in entities {
            push(entity);
        }
        for keyword in keywords {
            push(keyword);
        }

        Self { raw_query, terms }
    }

    /// The query exactly as the caller supplied it (minus surrounding whitespace).
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    /// All terms, lowercased, query first.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn query_comes_first_and_is_casefolded() {
        let terms = SearchTerms::build("K8s Networking", &[], &strings(&["networking"]));
        assert_eq!(terms.raw_query(), "K8s Networking");
        assert_eq!(terms.terms(), &["k8s networking", "networking"]);
    }

    #[test]
    fn duplicates_across_sources_collapse() {
        let terms = SearchTerms::build(
            "rust",
            &strings(&["Rust", "tokio"]),
            &strings(&["rust", "TOKIO", "async"]),
        );
        assert_eq!(terms.terms(), &["rust", "tokio", "async"]);
    }

    #[test]
    fn blank_terms_are_dropped() {
        let terms = SearchTerms::build("query", &strings(&["", "  "]), &strings(&["kw"]));
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn same_inputs_same_terms() {
        let a = SearchTerms::build("q", &strings(&["e1", "e2"]), &strings(&["k1"]));
        let b = SearchTerms::build("q", &strings(&["e1", "e2"]), &strings(&["k1"]));
        assert_eq!(a, b);
    }

    #[test]
    fn extractor_output_feeds_the_term_set() {
        struct Fixed;

        impl TermExtractor for Fixed {
            fn extract(&self, _text: &str) -> crate::types::Extraction {
                crate::types::Extraction {
                    entities: strings(&["Kubernetes"]),
                    keywords: strings(&["k8s", "networking"]),
                }
            }
        }

        let terms = SearchTerms::from_query("k8s networking", &Fixed);
        assert_eq!(
            terms.terms(),
            &["k8s networking", "kubernetes", "k8s", "networking"]
        );
    }
}
