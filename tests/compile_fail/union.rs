//! Unions are rejected.
#![allow(dead_code)]

use typeshift::Typed;

#[derive(Typed)]
union Bits {
    int: u32,
    float: f32,
}

fn main() {}
