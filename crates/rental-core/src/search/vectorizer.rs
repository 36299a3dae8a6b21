//! TF-IDF vectorizer fitted once over the catalog feature texts
//!
//! # Weighting
//!
//! ```text
//! idf(t)     = ln((1 + n) / (1 + df(t))) + 1
//! tfidf(t,d) = count(t, d) * idf(t), then L2-normalized per vector
//! ```
//!
//! Where `n` is the number of fitted documents and `df(t)` the number of
//! documents containing `t`. The smoothing keeps every weight positive, so
//! cosine similarity between two vectors always lies in `[0, 1]`.
//!
//! The vocabulary is frozen at fit time. Terms never seen while fitting are
//! dropped by [`TfidfVectorizer::transform`].

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};

lazy_static! {
    /// Runs of two or more word characters
    static ref TOKEN_PATTERN: Regex = Regex::new(r"(?u)\b\w\w+\b").unwrap();
}

/// Split text into lowercase terms
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fitted vocabulary and inverse document frequencies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfVectorizer {
    /// term -> dimension index, indices follow lexicographic term order
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per dimension
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit vocabulary and IDF weights over a corpus
    ///
    /// An empty corpus (or one without a single usable token) produces a
    /// zero-dimensional model; every transform then yields an empty vector.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let n = corpus.len() as f32;
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();

        for document in corpus {
            let unique: BTreeSet<String> = tokenize(document.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Self { vocabulary, idf }
    }

    /// Map text into the fitted space
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension()];
        if vector.is_empty() {
            return vector;
        }

        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        for (idx, count) in counts {
            vector[idx] = count * self.idf[idx];
        }

        l2_normalize(&mut vector);
        vector
    }

    /// Transform every document of a corpus
    pub fn transform_all<S: AsRef<str>>(&self, corpus: &[S]) -> Vec<Vec<f32>> {
        corpus.iter().map(|d| self.transform(d.as_ref())).collect()
    }

    /// Number of vocabulary terms
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// IDF weight of a term, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }

    /// Vocabulary terms in index order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }
}

/// Scale a vector to unit length in place; zero vectors stay zero
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> Vec<&'static str> {
        vec![
            "toyota corolla petrol automatic sedan",
            "honda city petrol manual sedan",
            "tata nexon electric automatic suv",
        ]
    }

    #[test]
    fn test_tokenize_drops_single_characters() {
        assert_eq!(
            tokenize("Maruti Suzuki S-Presso, Manual / Automatic"),
            vec!["maruti", "suzuki", "presso", "manual", "automatic"]
        );
        assert_eq!(tokenize("Hyundai i20"), vec!["hyundai", "i20"]);
    }

    #[test]
    fn test_vocabulary_is_sorted_and_complete() {
        let model = TfidfVectorizer::fit(&fleet());
        let terms: Vec<&str> = model.terms().collect();

        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
        assert_eq!(model.dimension(), 12);
        assert!(model.contains("nexon"));
    }

    #[test]
    fn test_smoothed_idf() {
        let model = TfidfVectorizer::fit(&fleet());
        // "sedan" appears in 2 of 3 documents
        let expected = (4.0f32 / 3.0).ln() + 1.0;
        assert!((model.idf("sedan").unwrap() - expected).abs() < 1e-6);
        // rarer terms weigh more
        assert!(model.idf("toyota").unwrap() > model.idf("sedan").unwrap());
    }

    #[test]
    fn test_transform_is_unit_length() {
        let model = TfidfVectorizer::fit(&fleet());
        let v = model.transform("Toyota sedan");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_vocabulary_terms_ignored() {
        let model = TfidfVectorizer::fit(&fleet());
        let v = model.transform("lamborghini hovercraft");
        assert_eq!(v.len(), model.dimension());
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_empty_corpus() {
        let model = TfidfVectorizer::fit::<&str>(&[]);
        assert_eq!(model.dimension(), 0);
        assert!(model.transform("anything").is_empty());
    }
}
