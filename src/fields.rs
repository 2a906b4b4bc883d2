use crate::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Default,
	InQuotes,
}

/// Splits one logical line into trimmed fields.
///
/// `""` inside quotes is a literal quote. Quote characters are never copied
/// into the field, they only switch delimiter handling on and off.
pub fn split_fields(line: &str, delimiter: char) -> Row {
	let mut row = Row::new();
	let mut field = String::new();
	let mut state = State::Default;
	let mut chars = line.chars().peekable();

	while let Some(c) = chars.next() {
		match (state, c) {
			(State::InQuotes, '"') if chars.peek() == Some(&'"') => {
				chars.next();
				field.push('"');
			}
			(State::InQuotes, '"') => state = State::Default,
			(State::Default, '"') => state = State::InQuotes,
			(State::Default, c) if c == delimiter => {
				row.push_field(field.trim());
				field.clear();
			}
			(_, c) => field.push(c),
		}
	}
	row.push_field(field.trim());
	row
}
