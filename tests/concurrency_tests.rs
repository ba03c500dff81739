//! Concurrent use of one `ConversionContext`.
//!
//! Registration, lookup, reset and cache population race against each other
//! here; every operation must stay atomic and nothing may deadlock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use typeshift::{ConversionContext, ConversionError, TypePair, Typed, primitives};

mod common;

const THREADS: usize = 8;
const ROUNDS: usize = 200;

#[test]
fn test_concurrent_conversions_agree() {
    common::init_tracing();
    let ctx = ConversionContext::new();

    thread::scope(|s| {
        for t in 0..THREADS {
            let ctx = &ctx;
            s.spawn(move || {
                for i in 0..ROUNDS {
                    let n = (t * ROUNDS + i) as i32;
                    assert_eq!(ctx.convert::<i32, i64>(n).unwrap(), i64::from(n));
                    assert_eq!(ctx.convert::<i32, String>(n).unwrap(), n.to_string());
                    assert_eq!(ctx.convert::<String, i32>(n.to_string()).unwrap(), n);
                    assert_eq!(ctx.try_convert_or::<i32, u8>(n + 256, 1), 1);
                    assert_eq!(ctx.convert::<i32, Option<i32>>(n).unwrap(), Some(n));
                }
            });
        }
    });

    let cache = ctx.prober().cache();
    let probes = cache.probe_count();
    // every distinct pair was classified at most once per racing thread
    assert!(probes as usize <= cache.len() * THREADS);
    for pair in [
        TypePair::new(primitives::INT32, primitives::INT64),
        TypePair::new(primitives::INT32, primitives::UINT8),
        TypePair::new(primitives::INT32, <Option<i32>>::type_hash()),
    ] {
        assert!(ctx.prober().probe(pair).exists());
    }
    assert_eq!(cache.probe_count(), probes);
}

#[test]
fn test_one_registration_wins_a_race() {
    common::init_tracing();
    let ctx = ConversionContext::new();
    let wins = AtomicUsize::new(0);
    let duplicates = AtomicUsize::new(0);

    thread::scope(|s| {
        for t in 0..THREADS {
            let ctx = &ctx;
            let wins = &wins;
            let duplicates = &duplicates;
            s.spawn(move || {
                let offset = t as i64;
                match ctx.register_fn::<u16, i64, _>(move |v| i64::from(v) + offset) {
                    Ok(()) => wins.fetch_add(1, Ordering::SeqCst),
                    Err(ConversionError::DuplicateRegistration { .. }) => {
                        duplicates.fetch_add(1, Ordering::SeqCst)
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                };
            });
        }
    });

    assert_eq!(wins.load(Ordering::SeqCst), 1);
    assert_eq!(duplicates.load(Ordering::SeqCst), THREADS - 1);
    let converted = ctx.convert::<u16, i64>(10).unwrap();
    assert!((10..10 + THREADS as i64).contains(&converted));
}

#[test]
fn test_reset_during_lookups() {
    common::init_tracing();
    let ctx = ConversionContext::new();
    ctx.register_fn::<u32, String, _>(|v| format!("#{v}")).unwrap();

    thread::scope(|s| {
        for _ in 0..THREADS {
            let ctx = &ctx;
            s.spawn(move || {
                for i in 0..ROUNDS as u32 {
                    let text = ctx.convert::<u32, String>(i).unwrap();
                    // either the binding or the text fallback, never anything else
                    assert!(text == format!("#{i}") || text == i.to_string());
                }
            });
        }
        let ctx = &ctx;
        s.spawn(move || {
            for _ in 0..ROUNDS {
                ctx.reset_converters();
                let _ = ctx.register_fn::<u32, String, _>(|v| format!("#{v}"));
            }
        });
    });

    // the registry is still consistent afterwards
    ctx.reset_converters();
    assert!(ctx.converters().is_empty());
    ctx.register_fn::<u32, String, _>(|v| format!("#{v}")).unwrap();
    assert_eq!(ctx.convert::<u32, String>(1).unwrap(), "#1");
}

#[test]
fn test_cache_toggle_during_probes() {
    common::init_tracing();
    let ctx = ConversionContext::new();

    thread::scope(|s| {
        for _ in 0..THREADS {
            let ctx = &ctx;
            s.spawn(move || {
                for i in 0..ROUNDS as i16 {
                    assert_eq!(ctx.convert::<i16, f64>(i).unwrap(), f64::from(i));
                }
            });
        }
        let ctx = &ctx;
        s.spawn(move || {
            for i in 0..ROUNDS {
                ctx.set_cache_enabled(i % 2 == 0);
            }
            ctx.set_cache_enabled(true);
        });
    });

    assert!(ctx.prober().cache().is_enabled());
}
