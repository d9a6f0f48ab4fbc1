//! Helper macro for generating domain port error enums.
//!
//! Each port declares its failure modes once; the macro derives the
//! `thiserror` display implementation and snake_case constructor helpers
//! so adapters build errors without spelling out struct variants.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $( define_port_error!(@ctor $variant $( { $($field : $ty),* } )?); )*
        }
    };

    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Example error used only by these tests.
        pub enum ExamplePortError {
            /// Unit variant.
            Offline => "store offline",
            /// Message-carrying variant.
            Broken { message: String } => "broken: {message}",
        }
    }

    #[test]
    fn unit_constructor_builds_variant() {
        assert_eq!(ExamplePortError::offline().to_string(), "store offline");
    }

    #[test]
    fn field_constructor_accepts_str() {
        let err = ExamplePortError::broken("disk full");
        assert_eq!(err.to_string(), "broken: disk full");
    }
}
