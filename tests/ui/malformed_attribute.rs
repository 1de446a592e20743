#![allow(dead_code)]

use fixedwidth::Record;

#[derive(Record)]
struct Named {
    #[fixed(start, end)]
    code: String,
}

fn main() {}
