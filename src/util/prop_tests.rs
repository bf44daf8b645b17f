use super::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn escaped_output_has_no_markup(s in ".*") {
        let escaped = escape_output(&s);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('\''));
    }

    #[test]
    fn escape_is_identity_on_safe_text(s in "[a-zA-Z0-9 .,!?-]*") {
        prop_assert_eq!(escape_output(&s), s);
    }

    #[test]
    fn positive_ids_parse(id in 1..=i32::MAX) {
        prop_assert_eq!(id_from_param(&id.to_string()), Some(id));
    }

    #[test]
    fn non_numeric_ids_rejected(s in "[0-9]*[^0-9]+[0-9]*") {
        prop_assert_eq!(id_from_param(&s), None);
    }

    #[test]
    fn redirects_stay_local(s in ".*") {
        let path = redirect_path(Some(&s));
        prop_assert!(path.starts_with('/'));
        prop_assert!(!path.starts_with("//"));
    }

    #[test]
    fn known_mime_types_round_trip(idx in 0..IMAGE_TYPES.len()) {
        let (_, mime) = IMAGE_TYPES[idx];
        let ext = mime_type_to_ext(mime).unwrap();
        prop_assert_eq!(ext_to_mime_type(ext), Some(mime));
    }
}
