use serde::{Deserialize, Serialize};

macro_rules! impl_id {
    ($name:ident) => {
        /// The ID type $name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub(crate) struct $name(usize);

        impl $name {
            #[inline]
            pub(crate) const fn new(index: usize) -> Self {
                $name(index)
            }

            #[inline]
            pub(crate) fn as_usize(&self) -> usize {
                self.0
            }
        }

        // Shifts ids when automata are merged.
        impl core::ops::AddAssign<usize> for $name {
            #[inline]
            fn add_assign(&mut self, rhs: usize) {
                self.0 += rhs;
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;

            #[inline]
            fn index(&self, index: $name) -> &Self::Output {
                &self[index.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self[index.0]
            }
        }
    };
}

// NFA states of a single rule's automaton.
impl_id!(StateID);
// Lexer states of a compiled model.
impl_id!(LexerStateID);
