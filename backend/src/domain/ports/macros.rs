//! `define_port_error!`: declares a port error enum with a `thiserror`
//! derive and one snake_case constructor per variant.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
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
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum SamplePortError {
            Unreachable => "service unreachable",
            Rejected { message: String } => "rejected: {message}",
            Throttled { retry_after: u32 } => "throttled for {retry_after}s",
            Partial { message: String, written: u32 } => "partial write ({written}): {message}",
        }
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::unreachable(), SamplePortError::Unreachable);
        assert_eq!(SamplePortError::unreachable().to_string(), "service unreachable");
    }

    #[rstest]
    fn string_fields_accept_str() {
        assert_eq!(
            SamplePortError::rejected("bad input").to_string(),
            "rejected: bad input"
        );
    }

    #[rstest]
    fn other_field_types_pass_through() {
        assert_eq!(
            SamplePortError::throttled(3_u32).to_string(),
            "throttled for 3s"
        );
        assert_eq!(
            SamplePortError::partial("disk full", 2_u32).to_string(),
            "partial write (2): disk full"
        );
    }
}
