// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Normalize a spreadsheet phone cell to `+<digits>` form.
///
/// Dashes, spaces, parentheses and `=` (left over from formula cells) are
/// removed. Returns `None` when nothing is left.
pub fn clean_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '(' | ')' | '='))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.starts_with('+') {
        Some(cleaned.to_string())
    } else {
        Some(format!("+{cleaned}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_and_adds_plus() {
        assert_eq!(clean_phone("(972) 50-123 4567").as_deref(), Some("+972501234567"));
        assert_eq!(clean_phone("=+15550001111").as_deref(), Some("+15550001111"));
    }

    #[test]
    fn keeps_existing_plus() {
        assert_eq!(clean_phone("+1000").as_deref(), Some("+1000"));
    }

    #[test]
    fn blank_cells_are_rejected() {
        assert_eq!(clean_phone(""), None);
        assert_eq!(clean_phone(" - () "), None);
    }
}
