/// Implements the shared surface of the three-component value types
/// (`Crp`, `Mrp`, `BodyRate`): construction, `Default`, `Clone`, `Debug`,
/// negation and the conversion into a `nalgebra` vector.
#[macro_export]
macro_rules! impl_three_component {
    ($type_name:ident, $a:ident, $b:ident, $c:ident) => {
        impl<T> $type_name<T> {
            #[doc = concat!("Initializes a new [`", stringify!($type_name), "`] instance.")]
            #[inline(always)]
            pub const fn new($a: T, $b: T, $c: T) -> Self {
                Self { $a, $b, $c }
            }

            #[doc = concat!("Initializes a new [`", stringify!($type_name), "`] from a column vector.")]
            #[inline]
            pub fn from_vector(vector: &nalgebra::Vector3<T>) -> Self
            where
                T: $crate::Real,
            {
                Self::new(vector[0], vector[1], vector[2])
            }

            /// Returns the components as a column vector.
            #[inline]
            pub fn to_vector(&self) -> nalgebra::Vector3<T>
            where
                T: $crate::Real,
            {
                nalgebra::Vector3::new(self.$a, self.$b, self.$c)
            }
        }

        impl<T> Default for $type_name<T>
        where
            T: Default,
        {
            #[inline]
            fn default() -> Self {
                Self::new(Default::default(), Default::default(), Default::default())
            }
        }

        impl<T> Clone for $type_name<T>
        where
            T: Clone,
        {
            fn clone(&self) -> Self {
                Self {
                    $a: self.$a.clone(),
                    $b: self.$b.clone(),
                    $c: self.$c.clone(),
                }
            }
        }

        impl<T> PartialEq for $type_name<T>
        where
            T: PartialEq,
        {
            fn eq(&self, other: &Self) -> bool {
                self.$a == other.$a && self.$b == other.$b && self.$c == other.$c
            }
        }

        impl<T> core::fmt::Debug for $type_name<T>
        where
            T: core::fmt::Debug,
        {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_tuple(stringify!($type_name))
                    .field(&self.$a)
                    .field(&self.$b)
                    .field(&self.$c)
                    .finish()
            }
        }

        impl<T> core::ops::Neg for $type_name<T>
        where
            T: core::ops::Neg<Output = T>,
        {
            type Output = $type_name<T>;

            #[inline]
            fn neg(self) -> Self::Output {
                Self {
                    $a: -self.$a,
                    $b: -self.$b,
                    $c: -self.$c,
                }
            }
        }

        impl<T> From<$type_name<T>> for nalgebra::Vector3<T>
        where
            T: $crate::Real,
        {
            #[inline]
            fn from(value: $type_name<T>) -> Self {
                value.to_vector()
            }
        }

        impl<T> From<$type_name<T>> for (T, T, T) {
            #[inline]
            fn from(value: $type_name<T>) -> Self {
                (value.$a, value.$b, value.$c)
            }
        }

        #[cfg(test)]
        paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:lower>] {
                use super::*;

                #[test]
                fn test_len() {
                    let value = $type_name::<f64>::default();
                    assert_eq!(value.len(), 3);
                }

                #[test]
                fn test_index() {
                    let value = $type_name::<f64>::new(1.0, 2.0, 3.0);
                    assert_eq!(value[0], 1.0);
                    assert_eq!(value[1], 2.0);
                    assert_eq!(value[2], 3.0);
                }

                #[test]
                fn test_vector_conversion() {
                    let value = $type_name::<f64>::new(1.0, -2.0, 3.0);
                    let vector: nalgebra::Vector3<f64> = value.into();
                    assert_eq!(vector, nalgebra::Vector3::new(1.0, -2.0, 3.0));
                    assert_eq!($type_name::from_vector(&vector), value);
                }

                #[test]
                fn test_neg() {
                    let value = -$type_name::<f64>::new(1.0, -2.0, 3.0);
                    assert_eq!(value, $type_name::new(-1.0, 2.0, -3.0));
                }
            }
        }
    };
}
