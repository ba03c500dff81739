//! Nullable wrapper conversions.
//!
//! `T -> Option<T>` and `Option<T> -> T` are wrapper relationships, not
//! value conversions, and are recognized before any other path. Wrapping is
//! implicit; unwrapping is explicit because it fails for `None`.
//!
//! Other pairs involving a wrapper are lifted over the path between the
//! wrapped types:
//!
//! | Pair | Plan | Class |
//! |---|---|---|
//! | `A -> Option<B>` | `A -> B`, then wrap | same as `A -> B` |
//! | `Option<A> -> B` | unwrap, then `A -> B` | explicit |
//! | `Option<A> -> Option<B>` | lifted `A -> B`, `None` stays `None` | same as `A -> B` |

use typeshift_core::{TypeHash, TypePair};
use typeshift_registry::TypeRegistry;

use crate::{Capability, CastPlan};

/// Find a direct wrap or unwrap between a type and its own wrapper.
pub fn find_wrapper(
    source: TypeHash,
    target: TypeHash,
    types: &TypeRegistry,
) -> Option<Capability> {
    if let Some(info) = types.nullable(target)
        && info.inner == source
    {
        return Some(Capability::Implicit(CastPlan::Wrap(info)));
    }
    if let Some(info) = types.nullable(source)
        && info.inner == target
    {
        return Some(Capability::Explicit(CastPlan::Unwrap(info)));
    }
    None
}

/// Find a lifted conversion through the wrapped types.
///
/// `resolve` classifies the pair of wrapped types.
pub fn find_lifted<F>(
    source: TypeHash,
    target: TypeHash,
    types: &TypeRegistry,
    resolve: F,
) -> Option<Capability>
where
    F: Fn(TypePair) -> Capability,
{
    let source_info = types.nullable(source);
    let target_info = types.nullable(target);

    match (source_info, target_info) {
        (None, None) => None,
        (None, Some(target_info)) => {
            let inner = resolve(TypePair::new(source, target_info.inner));
            let flag_of = classify(&inner);
            let plan = inner.plan()?.clone();
            Some(flag_of(CastPlan::Chain(vec![plan, CastPlan::Wrap(target_info)])))
        }
        (Some(source_info), None) => {
            let inner = resolve(TypePair::new(source_info.inner, target));
            let plan = inner.plan()?.clone();
            Some(Capability::Explicit(CastPlan::Chain(vec![
                CastPlan::Unwrap(source_info),
                plan,
            ])))
        }
        (Some(source_info), Some(target_info)) => {
            let inner = resolve(TypePair::new(source_info.inner, target_info.inner));
            let flag_of = classify(&inner);
            let plan = inner.plan()?.clone();
            Some(flag_of(CastPlan::Lifted {
                source: source_info,
                inner: Box::new(plan),
                target: target_info,
            }))
        }
    }
}

fn classify(inner: &Capability) -> fn(CastPlan) -> Capability {
    match inner {
        Capability::Implicit(_) => Capability::Implicit,
        _ => Capability::Explicit,
    }
}
