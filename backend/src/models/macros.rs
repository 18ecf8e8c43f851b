/// Defines a newtype identifier over `i64` that only admits strictly positive
/// values, and generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)
/// - `Deserialize` routed through `TryFrom<i64>` so non-positive ids never decode
/// - `Display`, `FromStr`
/// - `TryFrom<i64> for $name` and `From<$name> for i64`
///
/// Usage:
///   define_positive_id!(BuildingId);
#[macro_export]
macro_rules! define_positive_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Build an identifier, returning `None` for zero or negative values.
            pub fn new(value: i64) -> Option<Self> {
                (value > 0).then_some($name(value))
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::convert::TryFrom<i64> for $name {
            type Error = String;

            fn try_from(v: i64) -> Result<Self, Self::Error> {
                $name::new(v).ok_or_else(|| {
                    ::std::format!("{} must be a positive integer, got {}", stringify!($name), v)
                })
            }
        }

        impl ::std::convert::From<$name> for i64 {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| ::std::format!("Invalid {}: {}", stringify!($name), s))?;
                <$name as ::std::convert::TryFrom<i64>>::try_from(raw)
            }
        }
    };
}
