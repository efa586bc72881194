// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros for reducing boilerplate.
//!
//! - [`simple_display!`]: `Display` impl mapping enum variants to string literals
//! - [`simple_from_str!`]: the matching `FromStr` impl for unit-variant enums

/// Generate a `Display` impl that maps enum variants to string literals.
///
/// Unit variants match directly; data-carrying variants use `(..)` to ignore fields.
///
/// ```ignore
/// crate::simple_display! {
///     MyEnum {
///         Foo => "foo",
///         Bar(..) => "bar",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? => $str, )+
                })
            }
        }
    };
}

/// Generate a `FromStr` impl for a unit-variant enum, the inverse of
/// [`simple_display!`]. Unrecognized input yields the given error built from
/// the offending string.
///
/// ```ignore
/// crate::simple_from_str! {
///     MyEnum, MyError::Invalid {
///         Foo => "foo",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_from_str {
    ($enum:ty, $err:path { $( $variant:ident => $str:literal ),+ $(,)? }) => {
        impl std::str::FromStr for $enum {
            type Err = $crate::id::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str => Ok(Self::$variant), )+
                    other => Err($err(other.to_string())),
                }
            }
        }
    };
}
