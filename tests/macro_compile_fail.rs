//! Compile-fail tests for `#[derive(Typed)]` error paths.
//!
//! Each case must be rejected with a message pointing at the offending
//! item.

#[test]
fn macro_compile_fail_tests() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/*.rs");
}
