/// Generate a frozen `#[pyclass]` struct where each field is `f64`.
///
/// Also generates a `from_core()` constructor that copies values from the
/// corresponding Rust core struct, and a `to_dict()` Python method.
macro_rules! define_value_class {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident from $core_type:ty {
            $($field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[pyo3::pyclass(frozen)]
        $vis struct $name {
            $(
                #[pyo3(get)]
                pub $field: f64,
            )+
        }

        impl $name {
            pub fn from_core(v: &$core_type) -> Self {
                Self {
                    $(
                        $field: v.$field,
                    )+
                }
            }
        }

        #[pyo3::pymethods]
        impl $name {
            /// Values as a dict keyed by field name.
            fn to_dict<'py>(
                &self,
                py: pyo3::Python<'py>,
            ) -> pyo3::PyResult<pyo3::Bound<'py, pyo3::types::PyDict>> {
                let dict = pyo3::types::PyDict::new(py);
                $(
                    dict.set_item(stringify!($field), self.$field)?;
                )+
                Ok(dict)
            }

            fn __repr__(&self) -> String {
                let parts: Vec<String> = vec![
                    $(format!("{}={}", stringify!($field), self.$field)),+
                ];
                format!("{}({})", stringify!($name), parts.join(", "))
            }
        }
    };
}
