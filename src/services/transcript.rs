use chrono::{TimeZone, Utc};

pub const CSV_HEADER: [&str; 5] = ["账号", "密码", "过期时间", "UUID", "创建时间"];

/// Rendered instead of a blank when an account never expires.
pub const NO_EXPIRY: &str = "长期有效";

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRow {
    pub email: String,
    pub password: String,
    pub expired_at: Option<i64>,
    pub uuid: String,
    pub created_at: i64,
}

/// Plaintext record of a batch generation, handed back to the operator once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTranscript {
    rows: Vec<TranscriptRow>,
}

impl CsvTranscript {
    pub fn new(rows: Vec<TranscriptRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header line plus one CRLF-terminated line per account.
    pub fn render(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, CSV_HEADER.iter().map(|s| s.to_string()));

        for row in &self.rows {
            let expiry = row
                .expired_at
                .map(|ts| ts.to_string())
                .unwrap_or_else(|| NO_EXPIRY.to_string());
            push_line(
                &mut out,
                [
                    row.email.clone(),
                    row.password.clone(),
                    expiry,
                    row.uuid.clone(),
                    format_timestamp(row.created_at),
                ]
                .into_iter(),
            );
        }
        out
    }
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| escape_field(&f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(email: &str, expired_at: Option<i64>) -> TranscriptRow {
        TranscriptRow {
            email: email.to_string(),
            password: email.to_string(),
            expired_at,
            uuid: "3f2504e0-4f89-11d3-9a0c-0305e82c3301".to_string(),
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_header_and_row_count() {
        let transcript = CsvTranscript::new(vec![
            row("a@x.com", None),
            row("b@x.com", Some(1_800_000_000)),
            row("c@x.com", None),
        ]);
        let csv = transcript.render();
        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "账号,密码,过期时间,UUID,创建时间");
        assert!(csv.ends_with("\r\n"));
    }

    #[test]
    fn test_no_expiry_uses_sentinel() {
        let csv = CsvTranscript::new(vec![row("a@x.com", None)]).render();
        assert!(csv.contains(
            "a@x.com,a@x.com,长期有效,3f2504e0-4f89-11d3-9a0c-0305e82c3301,2023-11-14 22:13:20\r\n"
        ));
    }

    #[test]
    fn test_expiry_rendered_verbatim() {
        let csv = CsvTranscript::new(vec![row("a@x.com", Some(1_800_000_000))]).render();
        assert!(csv.contains(",1800000000,"));
        assert!(!csv.contains(NO_EXPIRY));
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut r = row("a@x.com", None);
        r.password = "p,\"q\"".to_string();
        let csv = CsvTranscript::new(vec![r]).render();
        assert!(csv.contains("a@x.com,\"p,\"\"q\"\"\",长期有效"));
    }

    #[test]
    fn test_empty_transcript_is_header_only() {
        let transcript = CsvTranscript::default();
        assert!(transcript.is_empty());
        assert_eq!(transcript.render(), "账号,密码,过期时间,UUID,创建时间\r\n");
    }
}
