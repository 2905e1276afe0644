mod common;

use common::tokens;
use graphify::{
    embeddings::Vocab,
    extract::{exhaustive, greedy, ExtractionStrategy},
};
use proptest::prelude::*;

fn vocab() -> Vocab {
    Vocab::new(tokens(&["dog", "hot", "hot_dog", "cat", "####s"]))
}

#[test]
fn exhaustive_lists_every_ngram_shortest_first() {
    let concepts = exhaustive(&tokens(&["hot", "dog"]), &vocab(), 3);
    assert_eq!(concepts, tokens(&["hot", "dog", "hot_dog"]));
}

#[test]
fn exhaustive_respects_ngram_length() {
    let concepts = exhaustive(&tokens(&["hot", "dog"]), &vocab(), 1);
    assert_eq!(concepts, tokens(&["hot", "dog"]));
    assert!(exhaustive(&tokens(&["hot", "dog"]), &vocab(), 0).is_empty());
}

#[test]
fn greedy_prefers_longest_match_and_skips_unknown_tokens() {
    let concepts = greedy(&tokens(&["big", "hot", "dog", "cat"]), &vocab(), 3);
    assert_eq!(concepts, tokens(&["hot_dog", "cat"]));
    assert!(greedy(&tokens(&["hot", "dog"]), &vocab(), 0).is_empty());
}

#[test]
fn numbers_are_folded_before_lookup() {
    let concepts = ExtractionStrategy::Greedy.extract(&tokens(&["1990s"]), &vocab(), 3);
    assert_eq!(concepts, tokens(&["####s"]));
}

proptest! {
    #[test]
    fn extracted_concepts_are_in_vocab(
        words in prop::collection::vec(prop::sample::select(vec!["hot", "dog", "cat", "the", "x"]), 0..8),
        n in 0usize..4,
    ) {
        let vocab = vocab();
        let words: Vec<String> = words.into_iter().map(String::from).collect();
        for strategy in [ExtractionStrategy::Exhaustive, ExtractionStrategy::Greedy] {
            let concepts = strategy.extract(&words, &vocab, n);
            prop_assert!(concepts.iter().all(|c| vocab.contains(c)));
            if strategy == ExtractionStrategy::Greedy {
                prop_assert!(concepts.len() <= words.len());
            }
        }
    }
}
