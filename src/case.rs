/// Converts a field name to the suffix of its accessor methods, so `line_items` gets
/// `getLineItems`.
///
/// The name is split into words at underscores, and the first letter of each word is
/// capitalized. Other letters keep their case, so `HTTP_code` becomes `HTTPCode`.
pub fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .flat_map(|word| {
            let mut chars = word.chars();
            let first = chars.next().map(|ch| ch.to_ascii_uppercase());
            first.into_iter().chain(chars)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn pascal_case() {
        assert_eq!(to_pascal_case("bar"), "Bar");
        assert_eq!(to_pascal_case("line_items"), "LineItems");
        assert_eq!(to_pascal_case("foo_bar"), "FooBar");
        assert_eq!(to_pascal_case("fooBar"), "FooBar");
        assert_eq!(to_pascal_case("foo__bar_"), "FooBar");
        assert_eq!(to_pascal_case("_private"), "Private");
        assert_eq!(to_pascal_case("field_1"), "Field1");
        assert_eq!(to_pascal_case("HTTP_code"), "HTTPCode");
        assert_eq!(to_pascal_case(""), "");
    }

    proptest! {
        #[test]
        fn pascal_case_is_pure(name in "[a-zA-Z_][a-zA-Z0-9_]{0,20}") {
            let first = to_pascal_case(&name);
            prop_assert_eq!(&first, &to_pascal_case(&name));
            prop_assert!(!first.contains('_'));
            if let Some(ch) = first.chars().next() {
                prop_assert!(!ch.is_ascii_lowercase());
            }
        }
    }
}
