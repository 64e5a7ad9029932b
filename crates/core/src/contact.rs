//! Contact-signal heuristics for blast audience sizing.
//!
//! These are deliberately crude presence checks over free-text fields, not
//! validators. Report counts depend on them staying loose; tightening them
//! would silently shrink audiences.

/// Which blast channel a contact value is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactChannel {
    Email,
    WhatsApp,
}

/// A value is treated as a usable email if it contains an `@` anywhere.
pub fn has_email_signal(value: &str) -> bool {
    value.contains('@')
}

/// A value looks like a reachable Malaysian mobile number if it carries the
/// `+6` country prefix or starts with a local `01` prefix.
pub fn has_whatsapp_signal(value: &str) -> bool {
    let v = value.trim();
    v.contains("+6") || v.starts_with("01")
}

/// Dispatch on channel; keeps store implementations free of per-channel
/// branching.
pub fn has_signal(value: &str, channel: ContactChannel) -> bool {
    match channel {
        ContactChannel::Email => has_email_signal(value),
        ContactChannel::WhatsApp => has_whatsapp_signal(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_signal_is_a_presence_check() {
        assert!(has_email_signal("kchan@example.my"));
        assert!(has_email_signal("reach us at: info@assoc"));
        assert!(!has_email_signal("no email on file"));
        assert!(!has_email_signal(""));
    }

    #[test]
    fn whatsapp_signal_accepts_country_and_local_prefixes() {
        assert!(has_whatsapp_signal("+60123456789"));
        assert!(has_whatsapp_signal("  0123456789"));
        assert!(has_whatsapp_signal("fax +6082-2000"));
        assert!(!has_whatsapp_signal("082-123456"));
        assert!(!has_whatsapp_signal(""));
    }
}
