//! Unknown `#[typed(...)]` keys are rejected.
#![allow(dead_code)]

use typeshift::Typed;

#[derive(Typed)]
#[typed(colour)]
struct Paint;

fn main() {}
