#![allow(dead_code)]

use std::{fs, path::Path};

use graphify::embeddings::{Embeddings, Vocab};
use ndarray::array;

pub const EMBEDDINGS_TXT: &str = "\
5 3
dog 1 0 0
hot_dog 0 1 0
hot 0.6 0.8 0
cat 0.8 0.6 0
##th 0 0 1
";

pub fn tiny_embeddings() -> Embeddings {
    Embeddings {
        vocab: Vocab::new(
            ["dog", "hot_dog", "hot", "cat", "##th"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        ),
        matrix: array![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.6, 0.8, 0.0],
            [0.8, 0.6, 0.0],
            [0.0, 0.0, 1.0],
        ],
    }
}

pub fn write_embeddings(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("numberbatch.txt");
    fs::write(&path, EMBEDDINGS_TXT).expect("write embeddings");
    path
}

pub fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
