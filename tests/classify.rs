use gpad_suppliers::classify::main_system;

#[test]
fn single_system_is_unchanged() {
    assert_eq!(main_system("TPP"), "TPP");
}

#[test]
fn evergreenlife_prefix_is_dropped() {
    assert_eq!(main_system("EVERGREENLIFE/TPP"), "TPP");
}

#[test]
fn evergreenlife_suffix_is_dropped() {
    assert_eq!(main_system("TPP/EVERGREENLIFE"), "TPP");
}

#[test]
fn plain_pair_takes_first() {
    assert_eq!(main_system("A/B"), "A");
}

#[test]
fn three_or_more_take_first() {
    assert_eq!(main_system("A/B/C"), "A");
    assert_eq!(main_system("EVERGREENLIFE/TPP/EMIS"), "EVERGREENLIFE");
}
