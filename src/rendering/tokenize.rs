//! Paragraph tokenizer: splits text into plain, highlighted and whitespace runs

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub is_highlight: bool,
    pub is_space: bool,
}

impl Token {
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_space = text.chars().all(char::is_whitespace);
        Self { text, is_highlight: false, is_space }
    }

    pub fn highlight(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_highlight: true, is_space: false }
    }

    /// Same flags, different text. Used for character-level fragments.
    pub fn fragment(&self, text: impl Into<String>) -> Self {
        Self { text: text.into(), ..self.clone() }
    }
}

/// Tokenize one paragraph (no embedded `\n`).
///
/// Matching is case-insensitive, literal, greedy and non-overlapping. An empty
/// or whitespace-only highlight word produces no highlight tokens. Joining the
/// token texts always reproduces `text`.
pub fn tokenize(text: &str, highlight: &str) -> Vec<Token> {
    let mut out = Vec::new();
    if text.is_empty() {
        return out;
    }
    if highlight.trim().is_empty() {
        split_whitespace_runs(text, &mut out);
        return out;
    }

    // A literal pattern built from an escaped string cannot fail to compile,
    // but a pathological word could exceed the size limit.
    let re = match RegexBuilder::new(&regex::escape(highlight))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            log::warn!("highlight word rejected ({}); rendering without highlight", e);
            split_whitespace_runs(text, &mut out);
            return out;
        }
    };

    let mut cursor = 0;
    for m in re.find_iter(text) {
        if m.start() > cursor {
            split_whitespace_runs(&text[cursor..m.start()], &mut out);
        }
        out.push(Token::highlight(m.as_str()));
        cursor = m.end();
    }
    if cursor < text.len() {
        split_whitespace_runs(&text[cursor..], &mut out);
    }
    out
}

fn split_whitespace_runs(span: &str, out: &mut Vec<Token>) {
    let mut start = 0;
    let mut run_is_space: Option<bool> = None;
    for (i, ch) in span.char_indices() {
        let ws = ch.is_whitespace();
        match run_is_space {
            Some(prev) if prev != ws => {
                out.push(Token { text: span[start..i].to_string(), is_highlight: false, is_space: prev });
                start = i;
            }
            _ => {}
        }
        run_is_space = Some(ws);
    }
    if let Some(ws) = run_is_space {
        out.push(Token { text: span[start..].to_string(), is_highlight: false, is_space: ws });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_whitespace_without_highlight() {
        let toks = tokenize("hello world", "");
        let texts: Vec<_> = toks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["hello", " ", "world"]);
        assert!(toks[1].is_space);
        assert!(toks.iter().all(|t| !t.is_highlight));
    }

    #[test]
    fn whitespace_only_highlight_is_ignored() {
        let toks = tokenize("a b", "  ");
        assert!(toks.iter().all(|t| !t.is_highlight));
        assert_eq!(joined(&toks), "a b");
    }

    #[test]
    fn highlight_is_case_insensitive_and_preserves_source_case() {
        let toks = tokenize("Best of the BEST", "best");
        let hl: Vec<_> = toks.iter().filter(|t| t.is_highlight).map(|t| t.text.as_str()).collect();
        assert_eq!(hl, ["Best", "BEST"]);
        assert_eq!(joined(&toks), "Best of the BEST");
    }

    #[test]
    fn highlight_inside_word_splits_the_word() {
        let toks = tokenize("superbestdeal", "best");
        let texts: Vec<_> = toks.iter().map(|t| (t.text.as_str(), t.is_highlight)).collect();
        assert_eq!(texts, [("super", false), ("best", true), ("deal", false)]);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let toks = tokenize("price (a+b) vs a+b", "(a+b)");
        let hl: Vec<_> = toks.iter().filter(|t| t.is_highlight).collect();
        assert_eq!(hl.len(), 1);
        assert_eq!(hl[0].text, "(a+b)");
    }

    #[test]
    fn matches_do_not_overlap() {
        let toks = tokenize("aaaa", "aa");
        let hl: Vec<_> = toks.iter().filter(|t| t.is_highlight).map(|t| t.text.as_str()).collect();
        assert_eq!(hl, ["aa", "aa"]);
        let toks = tokenize("aaa", "aa");
        assert_eq!(toks.len(), 2);
        assert!(!toks[1].is_highlight);
    }

    #[test]
    fn cjk_highlight_round_trips() {
        let text = "在这里输入正文内容，包含高亮关键词的部分会自动高亮显示...";
        let toks = tokenize(text, "高亮关键词");
        assert_eq!(joined(&toks), text);
        assert_eq!(toks.iter().filter(|t| t.is_highlight).count(), 1);
    }

    #[test]
    fn no_empty_tokens() {
        let toks = tokenize("  lead  best  trail  ", "best");
        assert!(toks.iter().all(|t| !t.text.is_empty()));
        assert_eq!(joined(&toks), "  lead  best  trail  ");
        assert!(toks[0].is_space);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("", "x").is_empty());
        assert!(tokenize("", "").is_empty());
    }
}
