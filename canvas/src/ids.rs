//! Client-generated identifiers and shareable board links.
//!
//! Object ids are assigned by the creating client; board codes are generated
//! client-side when a participant starts a new board and travel between
//! participants as a `?board=<code>` deep link.

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use rand::Rng;

use crate::consts::{BOARD_CODE_LEN, ID_ALPHABET, OBJECT_ID_LEN};

/// Query parameter that carries the board code in a deep link.
pub const BOARD_PARAM: &str = "board";

fn random_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

/// A fresh object id.
#[must_use]
pub fn new_object_id() -> String {
    random_id(OBJECT_ID_LEN)
}

/// A fresh board code.
#[must_use]
pub fn new_board_code() -> String {
    random_id(BOARD_CODE_LEN)
}

/// Deep link that opens `code` from `base`. Any query or fragment on `base` is replaced.
#[must_use]
pub fn board_link(base: &str, code: &str) -> String {
    let end = base.find(['?', '#']).unwrap_or(base.len());
    format!("{}?{BOARD_PARAM}={code}", &base[..end])
}

/// Board code carried by a deep link, if any.
#[must_use]
pub fn board_from_link(link: &str) -> Option<String> {
    let (_, rest) = link.split_once('?')?;
    let query = rest.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == BOARD_PARAM)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
