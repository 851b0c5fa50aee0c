//! Phone identity helpers. Twilio hands numbers around in several shapes
//! (`whatsapp:+34600111222`, `+34 600 111 222`, `600111222`); matching
//! between messages and bookings always goes through [`fingerprint`].

const FINGERPRINT_DIGITS: usize = 9;

/// Strip the channel prefix and formatting, keeping the raw number text.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("whatsapp:")
        .replace(['+', ' '], "")
}

/// The trailing digits that identify a number regardless of country-code
/// or formatting differences.
pub fn fingerprint(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let skip = digits.len().saturating_sub(FINGERPRINT_DIGITS);
    digits[skip..].to_string()
}

/// Destination format required by the provider's WhatsApp channel.
pub fn to_whatsapp(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("whatsapp:") {
        trimmed.to_string()
    } else {
        format!("whatsapp:+{}", normalize(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_prefix_and_formatting() {
        assert_eq!(normalize("whatsapp:+34 600 111 222"), "34600111222");
        assert_eq!(normalize("+34600111222"), "34600111222");
        assert_eq!(normalize("600111222"), "600111222");
    }

    #[test]
    fn test_fingerprint_keeps_trailing_digits() {
        assert_eq!(fingerprint("whatsapp:+34600111222"), "600111222");
        assert_eq!(fingerprint("+34 600 111 222"), "600111222");
        assert_eq!(fingerprint("600111222"), "600111222");
    }

    #[test]
    fn test_fingerprint_collides_across_formats() {
        assert_eq!(
            fingerprint("whatsapp:+34 600 111 222"),
            fingerprint("600111222")
        );
    }

    #[test]
    fn test_fingerprint_short_numbers() {
        assert_eq!(fingerprint("1234"), "1234");
        assert_eq!(fingerprint(""), "");
        assert_eq!(fingerprint("whatsapp:"), "");
    }

    #[test]
    fn test_to_whatsapp() {
        assert_eq!(to_whatsapp("+34600111222"), "whatsapp:+34600111222");
        assert_eq!(to_whatsapp("34 600 111 222"), "whatsapp:+34600111222");
        assert_eq!(to_whatsapp("whatsapp:+34600111222"), "whatsapp:+34600111222");
    }
}
