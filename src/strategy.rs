//! The resolution strategies, in priority order.
//!
//! Every strategy reports an [`Attempt`]. A declined or failed attempt moves
//! the pipeline on to the next strategy; nothing inside a strategy is ever
//! raised to the caller.

use std::fmt;

use tracing::{debug, trace};

use typeshift_core::{CastFailure, Dynamic, TypePair};

use crate::ConversionContext;

/// One fallback technique of the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A converter bound in the converter registry.
    Registered,
    /// A native cast found by the prober.
    NativeCast,
    /// Representation coercion, with nullable targets and sources peeled.
    Coerce,
    /// Enum name text in either direction.
    Enum,
    /// The target's parse hook, or the source's text.
    Parse,
}

impl Strategy {
    /// Strategies in the order the pipeline tries them.
    pub const ORDER: [Strategy; 5] = [
        Strategy::Registered,
        Strategy::NativeCast,
        Strategy::Coerce,
        Strategy::Enum,
        Strategy::Parse,
    ];

    /// Short name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Registered => "registered",
            Strategy::NativeCast => "native-cast",
            Strategy::Coerce => "coerce",
            Strategy::Enum => "enum",
            Strategy::Parse => "parse",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a single strategy.
#[derive(Debug)]
pub(crate) enum Attempt {
    /// The strategy produced a value.
    Converted(Dynamic),
    /// The strategy does not apply to this pair.
    Declined,
    /// The strategy applied but rejected this value.
    Failed(String),
}

impl From<Result<Dynamic, CastFailure>> for Attempt {
    fn from(result: Result<Dynamic, CastFailure>) -> Self {
        match result {
            Ok(value) => Attempt::Converted(value),
            Err(failure) => Attempt::Failed(failure.to_string()),
        }
    }
}

impl ConversionContext {
    /// Run every strategy in order and stop at the first success.
    pub(crate) fn run_strategies(&self, pair: TypePair, value: &Dynamic) -> Option<Dynamic> {
        for strategy in Strategy::ORDER {
            match self.attempt(strategy, pair, value) {
                Attempt::Converted(converted) => {
                    debug!(%pair, %strategy, "conversion resolved");
                    return Some(converted);
                }
                Attempt::Declined => trace!(%pair, %strategy, "strategy declined"),
                Attempt::Failed(reason) => trace!(%pair, %strategy, %reason, "strategy failed"),
            }
        }
        None
    }

    fn attempt(&self, strategy: Strategy, pair: TypePair, value: &Dynamic) -> Attempt {
        match strategy {
            Strategy::Registered => self.try_registered(pair, value),
            Strategy::NativeCast => self.try_native_cast(pair, value),
            Strategy::Coerce => self.try_coerce(pair, value),
            Strategy::Enum => self.try_enum(pair, value),
            Strategy::Parse => self.try_parse(pair, value),
        }
    }

    fn try_registered(&self, pair: TypePair, value: &Dynamic) -> Attempt {
        let Some(converter) = self.converters().get_converter(pair) else {
            return Attempt::Declined;
        };
        match converter.convert_dynamic(value.clone()) {
            Ok(converted) => Attempt::Converted(converted),
            Err(rejected) => Attempt::Failed(format!(
                "converter does not accept a value of type '{}'",
                rejected.type_name()
            )),
        }
    }

    fn try_native_cast(&self, pair: TypePair, value: &Dynamic) -> Attempt {
        let result = self.prober().cast(pair, value);
        match (result.value, result.error) {
            (Some(converted), _) => Attempt::Converted(converted),
            (None, Some(CastFailure::NoConversion)) => Attempt::Declined,
            (None, Some(failure)) => Attempt::Failed(failure.to_string()),
            (None, None) => Attempt::Declined,
        }
    }

    /// Nullable targets run the whole pipeline against the wrapped type and
    /// wrap the result. A nullable source is unwrapped the same way. Anything
    /// else goes to the installed coercer.
    fn try_coerce(&self, pair: TypePair, value: &Dynamic) -> Attempt {
        let types = self.types();

        if let Some(info) = types.nullable(pair.target) {
            let inner = TypePair::new(pair.source, info.inner);
            return match self.run_strategies(inner, value) {
                Some(converted) => info.wrap(&converted).into(),
                None => Attempt::Failed(format!("no conversion to '{}'", types.name_of(info.inner))),
            };
        }

        if let Some(info) = types.nullable(pair.source)
            && value.type_hash() == pair.source
        {
            let unwrapped = match info.unwrap(value) {
                Ok(unwrapped) => unwrapped,
                Err(failure) => return Attempt::Failed(failure.to_string()),
            };
            return match self.run_strategies(TypePair::new(info.inner, pair.target), &unwrapped) {
                Some(converted) => Attempt::Converted(converted),
                None => Attempt::Failed(format!("no conversion from '{}'", types.name_of(info.inner))),
            };
        }

        match self.coercer().coerce(value, pair.target) {
            Ok(converted) => Attempt::Converted(converted),
            Err(e) => Attempt::Failed(e.to_string()),
        }
    }

    fn try_enum(&self, pair: TypePair, value: &Dynamic) -> Attempt {
        let types = self.types();

        if let Some(info) = types.enum_info(pair.source) {
            if !types.is_text(pair.target) {
                return Attempt::Declined;
            }
            return match info.text_of(value) {
                Some(text) => Attempt::Converted(Dynamic::new(text)),
                None => Attempt::Failed(format!(
                    "value of type '{}' is not a '{}'",
                    value.type_name(),
                    types.name_of(pair.source)
                )),
            };
        }

        if let Some(info) = types.enum_info(pair.target) {
            let text = value.to_text();
            return match info.parse(&text) {
                Some(parsed) => Attempt::Converted(parsed),
                None => Attempt::Failed(format!(
                    "'{text}' names no variant of '{}'",
                    types.name_of(pair.target)
                )),
            };
        }

        Attempt::Declined
    }

    fn try_parse(&self, pair: TypePair, value: &Dynamic) -> Attempt {
        let types = self.types();
        let source_is_text = types.is_text(pair.source);
        let target_is_text = types.is_text(pair.target);

        if source_is_text && !target_is_text {
            let Some(entry) = types.get(pair.target) else {
                return Attempt::Declined;
            };
            let Some(text) = value.downcast_ref::<String>() else {
                return Attempt::Failed(format!(
                    "expected text, got a value of type '{}'",
                    value.type_name()
                ));
            };
            return match entry.parse(text) {
                Some(Ok(parsed)) => Attempt::Converted(parsed),
                Some(Err(reason)) => Attempt::Failed(reason),
                None => Attempt::Declined,
            };
        }

        if target_is_text && !source_is_text {
            return Attempt::Converted(Dynamic::new(value.to_text()));
        }

        Attempt::Declined
    }
}
