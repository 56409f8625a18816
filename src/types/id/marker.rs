use crate::internal::Sealed;

macro_rules! markers {
    { $( $(#[$meta:meta])* $ident:ident, )* } => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $ident;
        impl Sealed for $ident {}
        impl Marker for $ident {}
    )*};
}

markers! {
    /// Marks an [`Id`](super::Id) of a registered user.
    UserMarker,
    /// Marks an [`Id`](super::Id) of a published post.
    PostMarker,
}

#[cfg(test)]
markers! {
    AnyMarker,
}

/// This trait represents a marker restricting all objects to
/// from using it as a generic in [Id](super::Id) object.
pub trait Marker: Sealed {}
