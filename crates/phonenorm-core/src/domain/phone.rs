/// Strips everything but ASCII digits, keeping their order.
///
/// No length or prefix checks are made; a value without digits becomes the
/// empty string, which is itself canonical.
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

pub fn is_canonical(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}
