mod common;

use common::tokens;
use graphify::text::{english_filter, replace_numbers};

#[test]
fn articles_and_leading_to_are_dropped() {
    assert_eq!(english_filter(&tokens(&["to", "the", "dog"])), tokens(&["dog"]));
    assert_eq!(
        english_filter(&tokens(&["go", "to", "school"])),
        tokens(&["go", "to", "school"])
    );
}

#[test]
fn filter_falls_back_when_nothing_survives() {
    assert_eq!(english_filter(&tokens(&["the"])), tokens(&["the"]));
    assert_eq!(english_filter(&tokens(&["to", "a"])), tokens(&["to", "a"]));
    assert!(english_filter(&[]).is_empty());
}

#[test]
fn multi_digit_numbers_are_folded() {
    assert_eq!(replace_numbers("1990s"), "####s");
    assert_eq!(replace_numbers("route_66"), "route_##");
    assert_eq!(replace_numbers("4th"), "4th");
    assert_eq!(replace_numbers("dog"), "dog");
}
