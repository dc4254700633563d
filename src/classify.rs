/// Reseller that fronts another clinical system in the composite label.
pub const EVERGREENLIFE: &str = "EVERGREENLIFE";

/// Reduce a slash-delimited appointment-systems label to its main system.
///
/// A lone system is returned unchanged. For a pair, the Evergreen Life
/// sentinel is dropped in favour of the system it wraps. Any other pair, and
/// every label with three or more systems, resolves to the first system.
pub fn main_system(label: &str) -> &str {
    let systems: Vec<&str> = label.split('/').collect();
    match systems.as_slice() {
        [only] => *only,
        [first, second] if *first == EVERGREENLIFE => *second,
        [first, second] if *second == EVERGREENLIFE => *first,
        [first, ..] => *first,
        [] => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_alone_is_kept() {
        assert_eq!(main_system("EVERGREENLIFE"), "EVERGREENLIFE");
    }

    #[test]
    fn empty_label_is_empty_system() {
        assert_eq!(main_system(""), "");
    }
}
