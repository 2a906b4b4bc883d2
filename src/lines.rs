/// Splits `text` into logical lines.
///
/// A newline only ends a line while the quotes seen since the previous line
/// boundary are balanced, so a quoted field may span several physical lines.
/// A `\r` right before a boundary is part of the line ending. Lines that are
/// blank after trimming are dropped. A leading byte order mark is ignored.
pub fn logical_lines(text: &str) -> Vec<&str> {
	let text = text.trim_start_matches('\u{feff}').trim();
	let mut lines = Vec::new();
	let mut start = 0;
	let mut in_quotes = false;

	for (i, byte) in text.bytes().enumerate() {
		match byte {
			b'"' => in_quotes = !in_quotes,
			b'\n' if !in_quotes => {
				push_line(&mut lines, &text[start..i]);
				start = i + 1;
			}
			_ => {}
		}
	}
	push_line(&mut lines, &text[start..]);
	lines
}

fn push_line<'a>(lines: &mut Vec<&'a str>, line: &'a str) {
	let line = line.strip_suffix('\r').unwrap_or(line);
	if !line.trim().is_empty() {
		lines.push(line);
	}
}

#[test]
fn splits_lf_and_crlf() {
	assert_eq!(logical_lines("a,b\r\n1,2\n3,4"), vec!["a,b", "1,2", "3,4"]);
}

#[test]
fn ignores_byte_order_mark() {
	assert_eq!(logical_lines("\u{feff}Name,Price\r\nBed,$20"), vec!["Name,Price", "Bed,$20"]);
	assert!(logical_lines("\u{feff}\r\n").is_empty());
}

#[test]
fn drops_blank_lines() {
	assert_eq!(logical_lines("\n\na\n   \n\tb\n\n"), vec!["a", "\tb"]);
	assert!(logical_lines("").is_empty());
	assert!(logical_lines("\n").is_empty());
	assert!(logical_lines(" \r\n \r\n").is_empty());
}

#[test]
fn keeps_quoted_newlines() {
	let lines = logical_lines("title,notes\n\"Item\",\"Line one\nLine two\"\nNext,x");
	assert_eq!(
		lines,
		vec!["title,notes", "\"Item\",\"Line one\nLine two\"", "Next,x"]
	);
}

#[test]
fn keeps_quoted_crlf() {
	let lines = logical_lines("notes\r\n\"a\r\nb\"\r\n");
	assert_eq!(lines, vec!["notes", "\"a\r\nb\""]);
}

#[test]
fn escaped_quotes_keep_parity() {
	let lines = logical_lines("title\n\"5\"\" Widget\"\n\"Other\"");
	assert_eq!(lines, vec!["title", "\"5\"\" Widget\"", "\"Other\""]);
}

#[test]
fn unbalanced_quote_swallows_rest() {
	let lines = logical_lines("title\n\"open\nstill open\nend");
	assert_eq!(lines, vec!["title", "\"open\nstill open\nend"]);
}
