//! Typed database keys.
//!
//! Every table keyed by a `SERIAL` column gets its own ID type so a frame
//! style ID can never be passed where a product ID is expected.

/// Declare `i32` key newtypes.
///
/// Each type serializes as a bare number, displays and parses like an
/// `i32` (so it works as an axum path segment) and, with the `postgres`
/// feature, binds and decodes as `INTEGER`.
///
/// ```rust
/// frameshop_core::define_ids!(PosterId, ShipmentId);
///
/// let poster = PosterId::new(7);
/// assert_eq!(poster.as_i32(), 7);
/// assert_eq!("7".parse::<PosterId>(), Ok(poster));
/// ```
#[macro_export]
macro_rules! define_ids {
    ($($name:ident),+ $(,)?) => {$(
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    )+};
}

define_ids!(
    UserId,
    ProductId,
    FrameStyleId,
    SizeOptionId,
    OrderId,
    OrderItemId,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parses_from_path_segment() {
        assert_eq!("17".parse::<OrderId>().ok(), Some(OrderId::new(17)));
        assert!("seventeen".parse::<OrderId>().is_err());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&FrameStyleId::new(3)).ok();
        assert_eq!(json.as_deref(), Some("3"));

        let back: Option<FrameStyleId> = serde_json::from_str("3").ok();
        assert_eq!(back, Some(FrameStyleId::new(3)));
    }

    #[test]
    fn test_display_matches_inner_value() {
        assert_eq!(ProductId::new(-4).to_string(), "-4");
        assert_eq!(format!("{:>4}", UserId::new(9)), "   9");
    }
}
