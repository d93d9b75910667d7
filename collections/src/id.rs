//! Newtype integer ids, following the teacher's `create_ref_type!` macro
//! (`collections/src/ref_store.rs`): a `NonZeroU32`-backed index so that
//! `Option<Id>` is free, plus the `From`/`Into<usize>` impls a [`Store`](crate::Store)
//! needs to index its backing `Vec`.

use std::num::NonZeroU32;

/// Implemented by every generated id type. Lets generic code (e.g. [`crate::Store`])
/// work uniformly over `VarId`, `ClauseId`, `ConstraintId`, ...
pub trait Id: Copy + Eq + std::hash::Hash + Into<usize> + From<usize> {}

#[macro_export]
macro_rules! create_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(std::num::NonZeroU32);

        impl $name {
            #[allow(dead_code)]
            pub fn from_u32(u: u32) -> Self {
                $name(std::num::NonZeroU32::new(u + 1).expect("id overflow"))
            }
            #[allow(dead_code)]
            pub fn to_u32(self) -> u32 {
                self.0.get() - 1
            }
        }

        impl From<usize> for $name {
            fn from(u: usize) -> Self {
                $name::from_u32(u as u32)
            }
        }
        impl From<$name> for usize {
            fn from(v: $name) -> Self {
                v.to_u32() as usize
            }
        }
        impl $crate::id::Id for $name {}

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_u32())
            }
        }
    };
}

#[allow(unused)]
fn _assert_nonzero_niche() {
    assert_eq!(
        std::mem::size_of::<Option<NonZeroU32>>(),
        std::mem::size_of::<u32>()
    );
}
