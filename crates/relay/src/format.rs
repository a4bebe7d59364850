//! Display formatting for relayed federated messages.

use {chrono::NaiveDateTime, tracing::warn};

/// Field separator of the federated wire record.
const FIELD_SEPARATOR: char = '\t';

/// Timestamp layout on the wire (ISO-8601 UTC).
const WIRE_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Locale-neutral display layout.
const DISPLAY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Format a raw relayed message for chat display.
///
/// A well-formed record has three tab-separated fields: timestamp, sender,
/// body. Anything else is treated as already displayable and returned
/// unchanged. Total: never fails, for any input.
#[must_use]
pub fn format_relayed(raw: &str) -> String {
    let fields: Vec<&str> = raw.splitn(3, FIELD_SEPARATOR).collect();
    let [timestamp, sender, body] = fields.as_slice() else {
        return raw.to_string();
    };

    let timestamp = match NaiveDateTime::parse_from_str(timestamp, WIRE_TIMESTAMP) {
        Ok(t) => t.format(DISPLAY_TIMESTAMP).to_string(),
        Err(e) => {
            // Non-fatal: keep the raw field so the message still gets through.
            warn!(field = %timestamp, error = %e, "unparseable relay timestamp");
            (*timestamp).to_string()
        },
    };

    let sender = sender.trim_matches(|c| c == '(' || c == ')');

    format!("{timestamp} <{sender}>\n{body}")
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[test]
    fn well_formed_record() {
        assert_eq!(
            format_relayed("2024-01-02T03:04:05Z\t(bob)\thi there"),
            "2024-01-02 03:04:05 <bob>\nhi there"
        );
    }

    #[rstest]
    #[case("")]
    #[case("plain text, no tabs")]
    #[case("one\ttab only")]
    fn malformed_input_passes_through(#[case] raw: &str) {
        assert_eq!(format_relayed(raw), raw);
    }

    #[test]
    fn extra_tabs_stay_in_the_body() {
        // splitn keeps everything after the second separator as the body.
        assert_eq!(
            format_relayed("2024-01-02T03:04:05Z\tbob\ta\tb"),
            "2024-01-02 03:04:05 <bob>\na\tb"
        );
    }

    #[test]
    fn bad_timestamp_kept_raw() {
        assert_eq!(
            format_relayed("yesterday\t(bob)\thi"),
            "yesterday <bob>\nhi"
        );
    }

    #[test]
    fn sender_parentheses_stripped_only_at_the_edges() {
        assert_eq!(
            format_relayed("2024-01-02T03:04:05Z\t(b(o)b)\thi"),
            "2024-01-02 03:04:05 <b(o)b>\nhi"
        );
    }

    #[test]
    fn sender_without_parentheses_unchanged() {
        assert_eq!(
            format_relayed("2024-01-02T03:04:05Z\tbob@example.com\thi"),
            "2024-01-02 03:04:05 <bob@example.com>\nhi"
        );
    }

    #[test]
    fn empty_fields_still_format() {
        assert_eq!(format_relayed("\t\t"), " <>\n");
    }
}
