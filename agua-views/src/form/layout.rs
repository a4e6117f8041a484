//! Grouping fields into visual rows.

use super::field::{Field, FieldKind};

/// One row of the form grid, by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRow {
    /// Full-width field or textarea alone on its row.
    Full(String),
    Pair(String, String),
    /// Trailing odd field.
    Single(String),
}

fn spans_row(field: &Field) -> bool {
    field.full_width || matches!(field.kind, FieldKind::TextArea { .. })
}

/// Pairs fields two per row in declaration order.
///
/// A full-width field or textarea flushes any pending field into its own
/// single row, then takes a row of its own.
pub fn layout(fields: &[Field]) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    let mut pending: Option<&Field> = None;

    for field in fields {
        if spans_row(field) {
            if let Some(left) = pending.take() {
                rows.push(FieldRow::Single(left.name.clone()));
            }
            rows.push(FieldRow::Full(field.name.clone()));
            continue;
        }
        match pending.take() {
            Some(left) => rows.push(FieldRow::Pair(left.name.clone(), field.name.clone())),
            None => pending = Some(field),
        }
    }
    if let Some(left) = pending {
        rows.push(FieldRow::Single(left.name.clone()));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str) -> Field {
        Field::new(name, name, FieldKind::text())
    }

    #[test]
    fn test_pairs_and_trailing_single() {
        let rows = layout(&[text("a"), text("b"), text("c")]);
        assert_eq!(
            rows,
            vec![
                FieldRow::Pair("a".into(), "b".into()),
                FieldRow::Single("c".into()),
            ]
        );
    }

    #[test]
    fn test_full_width_flushes_pending() {
        let rows = layout(&[
            text("a"),
            Field::new("notas", "Notas", FieldKind::textarea(3)),
            text("b"),
            text("c"),
            text("d").full_width(),
        ]);
        assert_eq!(
            rows,
            vec![
                FieldRow::Single("a".into()),
                FieldRow::Full("notas".into()),
                FieldRow::Pair("b".into(), "c".into()),
                FieldRow::Full("d".into()),
            ]
        );
    }

    #[test]
    fn test_empty() {
        assert!(layout(&[]).is_empty());
    }
}
