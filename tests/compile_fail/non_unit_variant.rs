//! Enum variants must not carry data.
#![allow(dead_code)]

use typeshift::Typed;

#[derive(Typed)]
enum Shape {
    Point,
    Circle(f64),
}

fn main() {}
