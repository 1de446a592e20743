#![allow(dead_code)]

use fixedwidth::Record;

#[derive(Record)]
struct Point {
    #[fixed(1, 6)]
    at: (u8, u8),
}

fn main() {}
