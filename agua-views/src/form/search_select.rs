//! Search-select buffer and label highlighting.

use super::field::SelectOption;

/// Free-text state of a search-select field, separate from its committed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub buffer: String,
    pub open: bool,
}

/// Piece of an option label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// The piece matches the search buffer.
    pub highlighted: bool,
}

/// An option as the dropdown shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
    pub segments: Vec<Segment>,
}

impl DropdownOption {
    pub fn new(option: &SelectOption, query: &str) -> Self {
        Self {
            value: option.value.clone(),
            label: option.label.clone(),
            segments: highlight(&option.label, query),
        }
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Splits `label` into segments, marking every case-insensitive occurrence
/// of `query`. A blank query yields the label as one plain segment.
pub fn highlight(label: &str, query: &str) -> Vec<Segment> {
    let needle: Vec<char> = query.trim().chars().map(fold).collect();
    let chars: Vec<char> = label.chars().collect();
    if needle.is_empty() || chars.is_empty() {
        return vec![Segment {
            text: label.to_string(),
            highlighted: false,
        }];
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut push = |text: String, highlighted: bool| {
        if text.is_empty() {
            return;
        }
        match segments.last_mut() {
            Some(last) if last.highlighted == highlighted => last.text.push_str(&text),
            _ => segments.push(Segment { text, highlighted }),
        }
    };

    let mut i = 0;
    let mut plain = String::new();
    while i < chars.len() {
        let end = i + needle.len();
        let hit = end <= chars.len() && chars[i..end].iter().map(|c| fold(*c)).eq(needle.iter().copied());
        if hit {
            push(std::mem::take(&mut plain), false);
            push(chars[i..end].iter().collect(), true);
            i = end;
        } else {
            plain.push(chars[i]);
            i += 1;
        }
    }
    push(plain, false);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, highlighted: bool) -> Segment {
        Segment {
            text: text.into(),
            highlighted,
        }
    }

    #[test]
    fn test_highlights_case_insensitively() {
        assert_eq!(
            highlight("Juan Pérez", "juan"),
            vec![seg("Juan", true), seg(" Pérez", false)]
        );
    }

    #[test]
    fn test_highlights_every_occurrence() {
        assert_eq!(
            highlight("Ana Banana", "an"),
            vec![
                seg("An", true),
                seg("a B", false),
                seg("anan", true),
                seg("a", false),
            ]
        );
    }

    #[test]
    fn test_accented_match() {
        assert_eq!(
            highlight("JOSÉ", "sé"),
            vec![seg("JO", false), seg("SÉ", true)]
        );
    }

    #[test]
    fn test_blank_or_missing_query() {
        assert_eq!(highlight("Juan", "  "), vec![seg("Juan", false)]);
        assert_eq!(highlight("Juan", "x"), vec![seg("Juan", false)]);
    }
}
