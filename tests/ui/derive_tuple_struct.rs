#![allow(dead_code)]

use fixedwidth::Record;

#[derive(Record)]
struct Pair(String, u32);

fn main() {}
