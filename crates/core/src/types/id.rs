//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Catalog IDs arrive from the product API as opaque strings, so the wrapper
/// holds a `String` rather than a number. Creates a newtype with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `Into<String>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use marketplace_core::define_id;
/// define_id!(SkuId);
/// define_id!(ListingId);
///
/// let sku = SkuId::new("abc");
/// let listing = ListingId::new("abc");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = listing;
/// assert_eq!(sku.as_str(), listing.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        let id = ProductId::new("sku-42");
        assert_eq!(id.to_string(), "sku-42");
        assert_eq!(id.as_str(), "sku-42");
    }

    #[test]
    fn test_product_id_serializes_as_plain_string() {
        let id = ProductId::from("a");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""a""#);

        let parsed: ProductId = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_product_id_conversions() {
        let id: ProductId = String::from("x").into();
        let back: String = id.clone().into();
        assert_eq!(back, "x");
        assert_eq!(id.into_inner(), "x");
    }
}
