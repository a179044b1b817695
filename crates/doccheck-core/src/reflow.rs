// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Split documentation text into logical lines.
//!
//! A line break inside `(...)`, `[...]` or `{...}` does not end a line, so a
//! wrapped call or literal stays in one piece:
//!
//! ```text
//! >>example1: cls(1,          >>example1: cls(1, [2, 3])
//!     [2,                 =>
//!      3])
//! ```

/// Bracket-aware line splitting with whitespace collapsed.
///
/// Unbalanced openers keep merging until the end of the text; closers
/// never take a depth below zero.
pub fn reflow(doc: &str) -> Vec<String> {
    let mut merged = String::with_capacity(doc.len());
    let (mut paren, mut bracket, mut brace) = (0usize, 0usize, 0usize);

    for ch in doc.chars() {
        match ch {
            '(' => paren += 1,
            ')' => paren = paren.saturating_sub(1),
            '[' => bracket += 1,
            ']' => bracket = bracket.saturating_sub(1),
            '{' => brace += 1,
            '}' => brace = brace.saturating_sub(1),
            '\n' if paren > 0 || bracket > 0 || brace > 0 => {
                merged.push(' ');
                continue;
            }
            _ => {}
        }
        merged.push(ch);
    }

    merged
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_call_becomes_one_line() {
        let doc = ">>example1: cls(2,\n        6,\n        \"hello\")\n>>test: True";
        assert_eq!(
            reflow(doc),
            vec![">>example1: cls(2, 6, \"hello\")", ">>test: True"]
        );
    }

    #[test]
    fn nested_groups_of_every_kind() {
        let doc = "f([1,\n  {'a':\n (2,\n 3)}],\n x)\nnext";
        assert_eq!(reflow(doc), vec!["f([1, {'a': (2, 3)}], x)", "next"]);
    }

    #[test]
    fn whitespace_collapses_and_blank_lines_drop() {
        let doc = "\n   first    line  \n\n\t\n second\tline\r\n";
        assert_eq!(reflow(doc), vec!["first line", "second line"]);
    }

    #[test]
    fn unbalanced_opener_keeps_merging() {
        let doc = "open(\nstill\nopen";
        assert_eq!(reflow(doc), vec!["open( still open"]);
    }

    #[test]
    fn stray_closers_do_not_go_negative() {
        let doc = "a)\nb(\nc)\nd";
        assert_eq!(reflow(doc), vec!["a)", "b( c)", "d"]);
    }

    #[test]
    fn crlf_inside_brackets() {
        let doc = "f(1,\r\n2)\r\ng";
        assert_eq!(reflow(doc), vec!["f(1, 2)", "g"]);
    }

    #[test]
    fn empty_doc_yields_nothing() {
        assert!(reflow("").is_empty());
        assert!(reflow("  \n \n").is_empty());
    }
}
