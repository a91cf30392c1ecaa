//! Macros for ergonomic state declaration.

/// Generate a `State` implementation for a fieldless enum.
///
/// The enum gets the derives `State` requires, and each variant is named
/// after itself.
///
/// # Example
///
/// ```
/// use stagehand::core::State;
/// use stagehand::state_enum;
///
/// state_enum! {
///     pub enum GameState {
///         StartScreen,
///         InGame,
///         Options,
///     }
/// }
///
/// assert_eq!(GameState::InGame.name(), "InGame");
/// ```
#[macro_export]
macro_rules! state_enum {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
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
    };
}
