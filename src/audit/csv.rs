//! CSV rendering for audit trail exports.

use crate::audit::models::AuditEntry;

/// Fixed header row of the export.
const HEADER: &str = "\"Action\",\"Details\",\"Performed By\",\"IP Address\",\"Timestamp\"";

/// Render audit entries as a UTF-8 CSV document.
///
/// Starts with a BOM so spreadsheet tools pick up the encoding (the trail
/// contains Arabic text). Every field is quoted; embedded quotes are
/// doubled.
pub fn export_csv(entries: &[AuditEntry]) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str(HEADER);
    out.push('\n');

    for entry in entries {
        let row = [
            entry.action.as_str(),
            entry.details.as_str(),
            entry.performed_by.as_str(),
            entry.ip_address.as_deref().unwrap_or(""),
            entry.timestamp.as_str(),
        ];
        let quoted: Vec<String> = row.iter().map(|field| quote(field)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }

    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, action: &str, details: &str, by: &str, ts: &str) -> AuditEntry {
        AuditEntry {
            id,
            action: action.to_string(),
            details: details.to_string(),
            performed_by: by.to_string(),
            ip_address: Some("10.0.0.1".to_string()),
            timestamp: ts.to_string(),
        }
    }

    /// Minimal CSV reader for the round-trip test; only understands the
    /// all-fields-quoted dialect `export_csv` emits.
    fn parse_csv(text: &str) -> Vec<Vec<String>> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        text.lines()
            .map(|line| {
                let mut fields = Vec::new();
                let mut current = String::new();
                let mut in_quotes = false;
                let mut chars = line.chars().peekable();
                while let Some(c) = chars.next() {
                    match c {
                        '"' if in_quotes && chars.peek() == Some(&'"') => {
                            current.push('"');
                            chars.next();
                        }
                        '"' => in_quotes = !in_quotes,
                        ',' if !in_quotes => {
                            fields.push(std::mem::take(&mut current));
                        }
                        _ => current.push(c),
                    }
                }
                fields.push(current);
                fields
            })
            .collect()
    }

    #[test]
    fn test_starts_with_bom_and_header() {
        let csv = export_csv(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.contains("\"Action\",\"Details\",\"Performed By\",\"IP Address\",\"Timestamp\""));
    }

    #[test]
    fn test_every_field_quoted() {
        let csv = export_csv(&[entry(
            1,
            "LOGIN",
            "Successful login",
            "alaa",
            "2026-02-01T10:00:00+00:00",
        )]);

        let data_line = csv.lines().nth(1).unwrap();
        assert_eq!(
            data_line,
            "\"LOGIN\",\"Successful login\",\"alaa\",\"10.0.0.1\",\"2026-02-01T10:00:00+00:00\""
        );
    }

    #[test]
    fn test_embedded_quotes_and_commas_escaped() {
        let csv = export_csv(&[entry(
            1,
            "UPDATE",
            "Section \"home\" renamed, reordered",
            "alaa",
            "2026-02-01T10:00:00+00:00",
        )]);

        let rows = parse_csv(&csv);
        assert_eq!(rows[1][1], "Section \"home\" renamed, reordered");
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let entries = vec![
            entry(1, "LOGIN", "Successful login", "alaa", "2026-02-01T10:00:00+00:00"),
            entry(2, "DELETE", "News #7 deleted", "alaa", "2026-02-01T10:05:00+00:00"),
            entry(3, "SYNC", "Synced 2 posts from WhatsApp feed", "system", "2026-02-01T11:00:00+00:00"),
        ];

        let rows = parse_csv(&export_csv(&entries));
        assert_eq!(rows.len(), entries.len() + 1);

        for (row, entry) in rows[1..].iter().zip(&entries) {
            assert_eq!(row[0], entry.action);
            assert_eq!(row[2], entry.performed_by);
            assert_eq!(row[4], entry.timestamp);
        }
    }

    #[test]
    fn test_missing_ip_rendered_empty() {
        let mut e = entry(1, "LOGOUT", "Logged out", "alaa", "2026-02-01T10:00:00+00:00");
        e.ip_address = None;

        let rows = parse_csv(&export_csv(&[e]));
        assert_eq!(rows[1][3], "");
    }
}
