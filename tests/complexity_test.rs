use codemetrics::complexity::*;
use codemetrics::types::ComplexityLevel;

const TOKENS: &[&str] = &["if", "else", "while", "for", "case", "catch", "&&", "||", "?"];

#[test]
fn test_score_never_below_one() {
    for text in ["", "   ", "let x = 1;", "\n\n\n"] {
        assert!(estimate(text) >= 1);
    }
}

#[test]
fn test_each_token_adds_exactly_one() {
    let base = "let value = compute();\n";
    let before = estimate(base);
    for token in TOKENS {
        let text = format!("{} {} ", base, token);
        assert_eq!(estimate(&text), before + 1, "token {:?}", token);
    }
}

#[test]
fn test_repeated_tokens_accumulate() {
    let mut text = String::from("start");
    let mut expected = 1;
    for _ in 0..10 {
        text.push_str(" if ");
        expected += 1;
        assert_eq!(estimate(&text), expected);
    }
}

#[test]
fn test_two_ifs_and_one_and() {
    let text = "function check(a, b) {\n\
                \x20 if (a) {\n\
                \x20   return 1;\n\
                \x20 }\n\
                \x20 if (a && b) {\n\
                \x20   return 2;\n\
                \x20 }\n\
                \x20 return 0;\n\
                }\n\
                module.exports = check;\n";
    let (score, level) = assess(text);
    assert_eq!(score, 4);
    assert_eq!(level, ComplexityLevel::Low);
}

#[test]
fn test_tokens_inside_strings_and_comments_are_counted() {
    // Textual heuristic: no lexing, so these count.
    let text = "// if this fails\nlet s = \"a && b\";\n";
    assert_eq!(estimate(text), 3);
}

#[test]
fn test_band_partition() {
    for score in 0..=100u32 {
        let level = ComplexityLevel::from_score(score);
        let expected = if score <= 5 {
            ComplexityLevel::Low
        } else if score <= 10 {
            ComplexityLevel::Medium
        } else if score <= 20 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::Critical
        };
        assert_eq!(level, expected, "score {}", score);
    }
}

#[test]
fn test_critical_file() {
    let text = "if x { }\n".repeat(25);
    let (score, level) = assess(&text);
    assert_eq!(score, 26);
    assert_eq!(level, ComplexityLevel::Critical);
}
