//! Generic types have no single runtime identity.
#![allow(dead_code)]

use typeshift::Typed;

#[derive(Typed)]
struct Wrapper<T>(T);

fn main() {}
