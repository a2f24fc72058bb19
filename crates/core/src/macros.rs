// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the protocol types.

/// `Display` for a fieldless enum, one wire-facing name per variant.
///
/// ```ignore
/// crate::simple_display! {
///     MessageKind {
///         Broadcast => "BROADCAST",
///         Detach => "DETACH",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $name:literal ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => $name, )+
                })
            }
        }
    };
}

/// Test builder for a plain struct: every field gets a default and an
/// `impl Into` setter. Only compiled for tests and `test-support`.
///
/// ```ignore
/// crate::builder! {
///     pub struct TaskBuilder => Task {
///         mlir_code: ByteText = "compute(e)",
///         inputs: Vec<StoredInfo> = Vec::new(),
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            $( $field:ident : $ty:ty = $default:expr ),+ $(,)?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        #[derive(Debug, Clone)]
        pub struct $builder {
            $( $field: $ty, )+
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self { $( $field: $default.into(), )+ }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $field(mut self, v: impl Into<$ty>) -> Self {
                    self.$field = v.into();
                    self
                }
            )+

            pub fn build(self) -> $target {
                $target { $( $field: self.$field, )+ }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}
