// ABOUTME: Finds the line range enclosed by a `{ ... }` pair via brace counting

fn find_open(lines: &[String], start_idx: usize) -> Option<usize> {
    (start_idx..lines.len()).find(|&i| lines[i].contains('{'))
}

/// Scans forward from `start_idx` for the first line containing `{`, then
/// collects lines until depth returns to zero, tracking nested braces
/// character-by-character (not by per-line net count, since a line like
/// `} else if (...) then {` both closes one block and opens the next on
/// the same line). Returns `(body, index_of_the_line_that_closed_it)`; that
/// line itself is excluded from `body`. `None` if no `{` is found.
fn collect_until_terminator(lines: &[String], start_idx: usize) -> Option<(Vec<String>, usize)> {
    let open = find_open(lines, start_idx)?;
    let mut depth: i32 = 1;
    let mut body = Vec::new();
    let mut i = open + 1;
    while i < lines.len() {
        let mut closed_here = false;
        for c in lines[i].chars() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        closed_here = true;
                        break;
                    }
                }
                _ => {}
            }
        }
        if closed_here {
            return Some((body, i));
        }
        body.push(lines[i].clone());
        i += 1;
    }
    Some((body, i))
}

/// Same scan as [`collect_until_terminator`] but exposed for callers (like
/// the if/else-if/else chain executor) that need to inspect the terminating
/// line itself, since it may carry a trailing `else`/`else if` header.
pub fn collect_block_until_terminator(
    lines: &[String],
    start_idx: usize,
) -> Option<(Vec<String>, usize)> {
    collect_until_terminator(lines, start_idx)
}

/// Returns `(body, index_after_closing_brace)`. If no `{` is found, returns
/// an empty body and the unchanged start index.
pub fn collect_block(lines: &[String], start_idx: usize) -> (Vec<String>, usize) {
    match collect_until_terminator(lines, start_idx) {
        Some((body, term)) => (body, term + 1),
        None => (Vec::new(), start_idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn collects_a_flat_block() {
        let input = lines(&["if (1==1) then {", "print x", "print y", "}"]);
        let (body, next) = collect_block(&input, 0);
        assert_eq!(body, vec!["print x", "print y"]);
        assert_eq!(next, 4);
    }

    #[test]
    fn respects_nested_braces() {
        let input = lines(&[
            "function f ( a ) {",
            "if ( a == 1 ) then {",
            "print a",
            "}",
            "}",
            "f ( 1 )",
        ]);
        let (body, next) = collect_block(&input, 0);
        assert_eq!(body, vec!["if ( a == 1 ) then {", "print a", "}"]);
        assert_eq!(next, 5);
    }

    #[test]
    fn scanning_for_the_opening_brace_skips_leading_lines() {
        let input = lines(&["let x = 1", "if (1==1) then {", "print x", "}"]);
        let (body, next) = collect_block(&input, 0);
        assert_eq!(body, vec!["print x"]);
        assert_eq!(next, 4);
    }

    #[test]
    fn no_opening_brace_is_an_empty_body_at_the_start_index() {
        let input = lines(&["print x", "print y"]);
        let (body, next) = collect_block(&input, 0);
        assert!(body.is_empty());
        assert_eq!(next, 0);
    }

    #[test]
    fn a_combined_close_and_reopen_line_terminates_the_first_block() {
        let input = lines(&[
            "if ( 1 >> 2 ) then {",
            "let a = 1",
            "} else if ( 2 >> 1 ) then {",
            "let a = 2",
            "}",
        ]);
        let (body, term) = collect_block_until_terminator(&input, 0).unwrap();
        assert_eq!(body, vec!["let a = 1"]);
        assert_eq!(input[term], "} else if ( 2 >> 1 ) then {");
    }
}
