//! Artifact filename derivation.

use common::OrderNumber;

/// Used when nothing of the buyer name survives sanitization.
pub const FALLBACK_BUYER_SEGMENT: &str = "comprador";

/// Upper bound for the buyer part of a filename, in UTF-8 bytes. With the
/// `Orden<n>_` prefix and `.png` suffix the name stays under 255 bytes.
pub const MAX_BUYER_SEGMENT_BYTES: usize = 200;

/// Turns a buyer name into a single safe filename segment.
///
/// Whitespace becomes `_`. Path separators (`/`, `\`, `:`), control
/// characters and `..` runs are removed, as are dots at either end. Every
/// other character is kept as written.
pub fn sanitize_buyer_name(buyer_name: &str) -> String {
    let mut segment: String = buyer_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| !matches!(c, '/' | '\\' | ':') && !c.is_control())
        .collect();

    while segment.contains("..") {
        segment = segment.replace("..", "");
    }

    if segment.len() > MAX_BUYER_SEGMENT_BYTES {
        let mut cut = MAX_BUYER_SEGMENT_BYTES;
        while !segment.is_char_boundary(cut) {
            cut -= 1;
        }
        segment.truncate(cut);
    }

    let segment = segment.trim_matches('.');
    if segment.is_empty() {
        FALLBACK_BUYER_SEGMENT.to_string()
    } else {
        segment.to_string()
    }
}

/// `Orden<order number>_<sanitized buyer>.png`
pub fn artifact_filename(order_number: OrderNumber, buyer_name: &str) -> String {
    format!("Orden{order_number}_{}.png", sanitize_buyer_name(buyer_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(
            artifact_filename(OrderNumber::FIRST, "Ana Maria Lopez"),
            "Orden1_Ana_Maria_Lopez.png"
        );
    }

    #[test]
    fn simple_name_is_unchanged() {
        assert_eq!(artifact_filename(OrderNumber::FIRST, "Ana"), "Orden1_Ana.png");
    }

    #[test]
    fn traversal_characters_are_dropped() {
        assert_eq!(sanitize_buyer_name("../evil"), "evil");
        assert_eq!(sanitize_buyer_name("..\\..\\win"), "win");
        assert_eq!(sanitize_buyer_name("a/b"), "ab");
        assert_eq!(sanitize_buyer_name("C:\\x"), "Cx");
        assert_eq!(sanitize_buyer_name("a...b"), "a.b");
        assert_eq!(sanitize_buyer_name("Ana\tLu\u{0}"), "Ana_Lu");
        assert!(!artifact_filename(OrderNumber::FIRST, "../../etc/passwd").contains(".."));
    }

    #[test]
    fn punctuation_that_cannot_traverse_is_kept() {
        assert_eq!(
            artifact_filename(OrderNumber::FIRST, "J. O'Brien"),
            "Orden1_J._O'Brien.png"
        );
        assert_eq!(sanitize_buyer_name("Ana (VIP) #1!"), "Ana_(VIP)_#1!");
        assert_eq!(sanitize_buyer_name("Smith Jr."), "Smith_Jr");
    }

    #[test]
    fn unicode_letters_are_kept() {
        assert_eq!(sanitize_buyer_name("José Pérez"), "José_Pérez");
    }

    #[test]
    fn empty_result_falls_back() {
        assert_eq!(sanitize_buyer_name("../.."), FALLBACK_BUYER_SEGMENT);
        assert_eq!(
            artifact_filename(OrderNumber::new(4).unwrap(), "///"),
            "Orden4_comprador.png"
        );
    }

    #[test]
    fn long_names_are_cut_on_a_char_boundary() {
        let segment = sanitize_buyer_name(&"ñ".repeat(150));
        assert_eq!(segment.len(), MAX_BUYER_SEGMENT_BYTES);
        assert_eq!(segment.chars().count(), MAX_BUYER_SEGMENT_BYTES / 2);

        let segment = sanitize_buyer_name(&format!("a{}", "ñ".repeat(150)));
        assert_eq!(segment.len(), MAX_BUYER_SEGMENT_BYTES - 1);

        let filename = artifact_filename(OrderNumber::new(u64::MAX).unwrap(), &"€".repeat(100));
        assert!(filename.len() <= 255);
    }
}
