/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use lead_notify_api::message::{escape_html, format_amount, render_lead_message};
use lead_notify_api::models::{parse_amount, BusinessType, ValidatedLead};
use proptest::prelude::*;
use serde_json::Value;

// Property: escaping never leaves raw markup characters
proptest! {
    #[test]
    fn escaping_never_panics(input in "\\PC*") {
        let _ = escape_html(&input);
    }

    #[test]
    fn escaped_text_contains_no_raw_angle_brackets(input in "\\PC*") {
        let escaped = escape_html(&input);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
    }

    #[test]
    fn every_ampersand_in_escaped_text_starts_an_entity(input in "\\PC*") {
        let escaped = escape_html(&input);
        for (i, c) in escaped.char_indices() {
            if c == '&' {
                let rest = &escaped[i..];
                prop_assert!(
                    rest.starts_with("&amp;") || rest.starts_with("&lt;") || rest.starts_with("&gt;"),
                    "bare ampersand at {} in {:?}", i, escaped
                );
            }
        }
    }

    #[test]
    fn text_without_markup_is_unchanged(input in "[^&<>]*") {
        prop_assert_eq!(escape_html(&input), input);
    }
}

// Property: amount parsing strips separators but preserves the digits
proptest! {
    #[test]
    fn amount_parsing_never_panics(input in "\\PC*") {
        let _ = parse_amount(&Value::String(input));
    }

    #[test]
    fn amount_parsing_ignores_separator_characters(
        digits in "[1-9][0-9]{0,12}",
        separator in prop::sample::select(vec![",", " ", ".", "원", "₩", "-"]),
    ) {
        // Interleave a separator after every third digit, plus a suffix.
        let mut formatted = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && i % 3 == 0 {
                formatted.push_str(separator);
            }
            formatted.push(c);
        }
        formatted.push_str(separator);

        let expected: u64 = digits.parse().unwrap();
        prop_assert_eq!(parse_amount(&Value::String(formatted)), Some(expected));
    }

    #[test]
    fn digit_free_amounts_never_parse(input in "[^0-9]*") {
        prop_assert_eq!(parse_amount(&Value::String(input)), None);
    }
}

// Property: thousands-separator formatting is lossless and well-grouped
proptest! {
    #[test]
    fn formatted_amount_roundtrips(amount in any::<u64>()) {
        let formatted = format_amount(amount);
        let back: u64 = formatted.replace(',', "").parse().unwrap();
        prop_assert_eq!(back, amount);
    }

    #[test]
    fn formatted_amount_groups_by_three(amount in any::<u64>()) {
        let formatted = format_amount(amount);
        let groups: Vec<&str> = formatted.split(',').collect();
        prop_assert!(!groups[0].is_empty() && groups[0].len() <= 3);
        for group in &groups[1..] {
            prop_assert_eq!(group.len(), 3);
        }
    }
}

// Property: the rendered message keeps its fixed structure for any field text
proptest! {
    #[test]
    fn rendered_message_keeps_template_structure(
        name in "[^\\r\\n]{1,40}",
        phone in "[^\\r\\n]{1,20}",
        region in "[^\\r\\n]{1,30}",
        amount in 100_000u64..10_000_000_000,
    ) {
        let lead = ValidatedLead {
            name,
            phone,
            biz_type: BusinessType::CorporateEntity,
            amount,
            region,
        };
        let text = render_lead_message(&lead);

        let lines: Vec<&str> = text.lines().collect();
        prop_assert_eq!(lines.len(), 6);
        prop_assert_eq!(lines[0], "<b>[신규접수]</b>");
        prop_assert!(lines[1].starts_with("이름: "));
        prop_assert!(lines[2].starts_with("연락처: "));
        prop_assert!(lines[3].starts_with("유형: "));
        prop_assert!(lines[4].starts_with("금액: ") && lines[4].ends_with("원"));
        prop_assert!(lines[5].starts_with("지역: "));

        // Only the template header carries raw markup.
        let stripped = text.replace("<b>[신규접수]</b>", "");
        prop_assert!(!stripped.contains('<'));
        prop_assert!(!stripped.contains('>'));
    }
}
