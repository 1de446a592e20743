#![allow(dead_code)]

use fixedwidth::Record;

#[derive(Record)]
struct Twice {
    #[fixed(1, 5)]
    #[fixed(6, 10)]
    code: String,
}

fn main() {}
