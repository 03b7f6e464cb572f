/// Replace every character outside `[A-Za-z0-9:_]` with `_`.
pub fn sanitize_metric_name(s: &str) -> String {
    replace_invalid(s, |c| c.is_ascii_alphanumeric() || c == ':' || c == '_')
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_label_name(s: &str) -> String {
    replace_invalid(s, |c| c.is_ascii_alphanumeric() || c == '_')
}

#[inline]
fn replace_invalid(s: &str, valid: impl Fn(char) -> bool) -> String {
    s.chars().map(|c| if valid(c) { c } else { '_' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn metric_name_keeps_colons() {
        assert_eq!(sanitize_metric_name("disk:sda1.read-ops"), "disk:sda1_read_ops");
        assert_eq!(sanitize_metric_name("already_valid:42"), "already_valid:42");
    }

    #[test]
    fn label_name_replaces_colons() {
        assert_eq!(sanitize_label_name("k8s:pod-name"), "k8s_pod_name");
    }

    #[test]
    fn each_multibyte_char_becomes_one_underscore() {
        assert_eq!(sanitize_metric_name("température"), "temp_rature");
        assert_eq!(sanitize_label_name("a b\tc"), "a_b_c");
    }

    proptest! {
        #[test]
        fn metric_name_only_contains_allowed_chars(s in ".*") {
            let out = sanitize_metric_name(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '_'));
            prop_assert_eq!(out.chars().count(), s.chars().count());
        }

        #[test]
        fn label_name_only_contains_allowed_chars(s in ".*") {
            let out = sanitize_label_name(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }

        #[test]
        fn sanitizing_is_idempotent(s in ".*") {
            let once = sanitize_metric_name(&s);
            prop_assert_eq!(sanitize_metric_name(&once), once.clone());

            let once = sanitize_label_name(&s);
            prop_assert_eq!(sanitize_label_name(&once), once.clone());
        }
    }
}
