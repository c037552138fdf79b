//! Notification message rendering.
//!
//! The Telegram Bot API renders a restricted HTML subset, so every
//! user-supplied field is escaped before interpolation.

use crate::models::ValidatedLead;

/// Escapes `&`, `<` and `>` for embedding in Telegram HTML messages.
///
/// `&` must be replaced first; the entities produced by the `<` and `>`
/// replacements would otherwise be escaped again.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Formats an amount with thousands separators, e.g. `10000000` ->
/// `"10,000,000"`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Renders the fixed-structure notification text for a validated lead.
///
/// Every recipient receives this exact text; the dispatcher renders it once
/// per submission.
pub fn render_lead_message(lead: &ValidatedLead) -> String {
    format!(
        "<b>[신규접수]</b>\n\
         이름: {}\n\
         연락처: {}\n\
         유형: {}\n\
         금액: {}원\n\
         지역: {}",
        escape_html(&lead.name),
        escape_html(&lead.phone),
        escape_html(lead.biz_type.label()),
        format_amount(lead.amount),
        escape_html(&lead.region),
    )
}
