//! Helper macro generating port error enums and their constructors.
//!
//! Each variant becomes a `thiserror` variant with the given display text and
//! a snake_case constructor whose fields accept `impl Into<T>`.

macro_rules! define_port_error {
    (@ctor $name:ident $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`", stringify!($name), "::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $name:ident $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $name $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $name:ident $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`", stringify!($name), "::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $name:ident $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $name
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($(#[$field_meta:meta])* $field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($(#[$field_meta])* $field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $name $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SamplePortError {
            Offline { message: String } => "offline: {message}",
            Retries { attempts: u32 } => "gave up after {attempts} attempts",
            Mixed { message: String, attempts: u32 } => "{message} after {attempts}",
            Empty => "nothing to do",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(SamplePortError::offline("dns").to_string(), "offline: dns");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(
            SamplePortError::retries(3_u32).to_string(),
            "gave up after 3 attempts"
        );
    }

    #[test]
    fn mixed_fields_are_positional() {
        let err = SamplePortError::mixed("timeout", 2_u32);
        assert_eq!(
            err,
            SamplePortError::Mixed {
                message: "timeout".to_owned(),
                attempts: 2
            }
        );
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::empty().to_string(), "nothing to do");
    }
}
