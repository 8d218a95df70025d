//! Helper macro for port error enums whose variants each carry a message.
//!
//! `define_port_error!` expands every `Variant => "format"` arm into a
//! `Variant { message: String }` variant plus a snake_case constructor
//! accepting `impl Into<String>`, an `is_<variant>` predicate and a shared
//! `message` accessor.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant { message: String },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Build a [`" $name "::" $variant "`] error."]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }

                    #[doc = "Whether this is a [`" $name "::" $variant "`] error."]
                    #[must_use]
                    pub fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, Self::$variant { .. })
                    }
                }
            )*

            /// Adapter-supplied detail carried by every variant.
            #[must_use]
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } => message, )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
