//! Bag-of-words keyword counting over comment text.

use crate::model::KeywordCount;
use ahash::AHashMap;
use regex::Regex;
use std::sync::OnceLock;

pub const STOPWORDS: [&str; 19] = [
    "the", "is", "a", "an", "and", "or", "to", "of", "in", "on", "for", "this", "that", "it", "with", "i", "you",
    "we", "they",
];

/// Tokens must be longer than this many characters.
pub const MIN_TOKEN_EXCLUSIVE: usize = 3;

pub const DEFAULT_TOP_N: usize = 50;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"http\S+").expect("static regex"))
}

/// Lowercase, drop `http...` runs, keep only ASCII letters and whitespace.
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let no_urls = url_re().replace_all(&lower, "");
    no_urls.chars().filter(|c| c.is_ascii_alphabetic() || c.is_whitespace()).collect()
}

#[inline]
pub fn is_keyword(token: &str) -> bool {
    token.len() > MIN_TOKEN_EXCLUSIVE && !STOPWORDS.contains(&token)
}

/// Frequency counter that remembers first-seen order for stable tie-breaking.
#[derive(Debug, Default)]
pub struct KeywordCounter {
    index: AHashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl KeywordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, text: &str) {
        let cleaned = clean_text(text);
        for tok in cleaned.split_whitespace().filter(|t| is_keyword(t)) {
            match self.index.get(tok) {
                Some(&i) => self.entries[i].1 += 1,
                None => {
                    self.index.insert(tok.to_string(), self.entries.len());
                    self.entries.push((tok.to_string(), 1));
                }
            }
        }
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn frequency(&self, keyword: &str) -> u64 {
        self.index.get(keyword).map_or(0, |&i| self.entries[i].1)
    }

    /// Highest counts first; equal counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<KeywordCount> {
        let mut ranked: Vec<&(String, u64)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(n)
            .map(|(k, f)| KeywordCount { keyword: k.clone(), frequency: *f })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_urls_and_symbols() {
        assert_eq!(clean_text("Visit https://x.io/a?b=1 NOW!!"), "visit  now");
        assert_eq!(clean_text("Café 123 déjà-vu"), "caf  djvu");
    }

    #[test]
    fn short_tokens_and_stopwords_are_dropped() {
        let mut c = KeywordCounter::new();
        c.add_text("This is a video with excellent audio");
        c.add_text("THIS excellent editing, excellent!");
        c.add_text("excellent excellent");

        let top = c.top(DEFAULT_TOP_N);
        assert!(top.iter().all(|k| k.keyword != "a" && k.keyword != "this" && k.keyword != "with"));
        assert_eq!(c.frequency("excellent"), 5);
        assert_eq!(top[0], KeywordCount { keyword: "excellent".into(), frequency: 5 });
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut c = KeywordCounter::new();
        c.add_text("zebra apple mango apple zebra mango");
        let words: Vec<String> = c.top(10).into_iter().map(|k| k.keyword).collect();
        assert_eq!(words, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn top_fifty_of_sixty() {
        // 60 distinct letter-only words, word i repeated (i + 1) times.
        let word = |i: usize| format!("word{}{}", (b'a' + (i / 26) as u8) as char, (b'a' + (i % 26) as u8) as char);
        let mut c = KeywordCounter::new();
        for i in 0..60 {
            let text = vec![word(i); i + 1].join(" ");
            c.add_text(&text);
        }
        assert_eq!(c.distinct(), 60);

        let top = c.top(DEFAULT_TOP_N);
        assert_eq!(top.len(), 50);
        for (rank, kw) in top.iter().enumerate() {
            let i = 59 - rank;
            assert_eq!(kw.keyword, word(i));
            assert_eq!(kw.frequency, (i + 1) as u64);
        }
    }
}
