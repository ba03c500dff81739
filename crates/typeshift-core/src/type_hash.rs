//! Deterministic hash-based type identity.
//!
//! This module provides [`TypeHash`], a 64-bit hash that identifies a type by
//! name, and [`TypePair`], the ordered `(source, target)` key used by every
//! lookup table in the conversion engine.
//!
//! Hashes are computed from names rather than assigned sequentially, so:
//!
//! - the same name always yields the same hash, in every process
//! - well-known hashes can be computed in `const` context (see [`primitives`])
//! - nullable wrappers get a hash derived from their inner type without
//!   needing a registry round-trip
//!
//! # Examples
//!
//! ```
//! use typeshift_core::{TypeHash, TypePair, primitives};
//!
//! assert_eq!(TypeHash::from_name("i32"), primitives::INT32);
//!
//! let widen = TypePair::new(primitives::INT32, primitives::INT64);
//! assert_ne!(widen, widen.reversed());
//! ```

use std::fmt;

use xxhash_rust::const_xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant used when folding argument hashes together.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Argument position mixing constants.
    /// Each position gets its own constant so argument order matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty hash. Stands for "no type supplied".
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of a template instance from the template marker and
    /// its argument hashes.
    ///
    /// Argument order matters: `pair<a, b>` and `pair<b, a>` hash differently.
    #[inline]
    pub fn from_template_instance(template: TypeHash, args: &[TypeHash]) -> Self {
        let mut hash = template.0;
        for (i, arg) in args.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps the fold non-commutative
            hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ arg.0);
        }
        TypeHash(hash)
    }

    /// Check if this is the empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// An ordered `(source, target)` pair of type hashes.
///
/// `(A, B)` and `(B, A)` are different keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypePair {
    /// Type the value is declared as.
    pub source: TypeHash,
    /// Type the value should become.
    pub target: TypeHash,
}

impl TypePair {
    /// Create a pair from two hashes.
    #[inline]
    pub const fn new(source: TypeHash, target: TypeHash) -> Self {
        Self { source, target }
    }

    /// Same source and target.
    #[inline]
    pub fn is_identity(self) -> bool {
        self.source == self.target
    }

    /// The pair with source and target swapped.
    #[inline]
    pub const fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl fmt::Debug for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypePair({} -> {})", self.source, self.target)
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Well-known hashes for the built-in types.
///
/// All of these are `TypeHash::from_name(<rust type name>)`, evaluated at
/// compile time.
pub mod primitives {
    use super::TypeHash;

    /// `bool`
    pub const BOOL: TypeHash = TypeHash::from_name("bool");
    /// `char`
    pub const CHAR: TypeHash = TypeHash::from_name("char");
    /// `i8`
    pub const INT8: TypeHash = TypeHash::from_name("i8");
    /// `i16`
    pub const INT16: TypeHash = TypeHash::from_name("i16");
    /// `i32`
    pub const INT32: TypeHash = TypeHash::from_name("i32");
    /// `i64`
    pub const INT64: TypeHash = TypeHash::from_name("i64");
    /// `u8`
    pub const UINT8: TypeHash = TypeHash::from_name("u8");
    /// `u16`
    pub const UINT16: TypeHash = TypeHash::from_name("u16");
    /// `u32`
    pub const UINT32: TypeHash = TypeHash::from_name("u32");
    /// `u64`
    pub const UINT64: TypeHash = TypeHash::from_name("u64");
    /// `f32`
    pub const FLOAT: TypeHash = TypeHash::from_name("f32");
    /// `f64`
    pub const DOUBLE: TypeHash = TypeHash::from_name("f64");
    /// `String`, the textual type.
    pub const STRING: TypeHash = TypeHash::from_name("String");

    /// Template marker for nullable wrappers (`Option<T>`).
    /// Never a concrete type on its own.
    pub const NULLABLE: TypeHash = TypeHash::from_name("Option");
}
