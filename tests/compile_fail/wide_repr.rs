//! Discriminants that may not fit in an i64 are rejected.
#![allow(dead_code)]

use typeshift::Typed;

#[derive(Typed)]
#[repr(u64)]
enum Mask {
    Low = 1,
    High = 1 << 63,
}

fn main() {}
