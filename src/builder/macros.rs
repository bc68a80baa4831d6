//! Macros for ergonomic state declarations.

/// Generate the derive list and [`State`](crate::core::State) impl for a
/// plain enum of surface states.
///
/// Also emits an `ALL` constant listing every variant, convenient for
/// feeding the builder's valid-state set.
///
/// # Example
///
/// ```
/// use veer::core::State;
///
/// veer::surface_states! {
///     pub enum Home {
///         Default,
///         Drawer,
///         Swiping,
///     }
/// }
///
/// assert_eq!(Home::Swiping.name(), "Swiping");
/// assert_eq!(Home::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! surface_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl $name {
            /// Every state of this machine, in declaration order.
            $vis const ALL: &'static [$name] = &[$(Self::$variant),*];
        }
    };
}
