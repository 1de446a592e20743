#![allow(dead_code)]

use fixedwidth::Record;

#[derive(Record)]
struct Borrowed<'a> {
    #[fixed(1, 5)]
    name: &'a str,
}

fn main() {}
