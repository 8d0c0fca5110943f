/// Generates a builder-style setter for a request field.
///
/// `setter!(max_results: u32)` accepts anything convertible into the field type.
macro_rules! setter {
    ($field:ident : $ty:ty) => {
        pub fn $field<T>(mut self, $field: T) -> Self
        where
            T: Into<$ty>,
        {
            self.$field = $field.into();
            self
        }
    };
}

pub(crate) use setter;
