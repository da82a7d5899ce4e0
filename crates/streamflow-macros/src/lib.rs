use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro that gives a flat struct of `f64` fields a fixed-arity array
/// layout, in field declaration order.
///
/// Generates on the struct:
/// - `LEN`: number of fields
/// - `field_names()`: external names of the fields
/// - `to_array()` / `from_array()`: conversion to and from `[f64; LEN]`
/// - `from_slice()`: checked conversion from a slice, rejecting wrong lengths
///
/// Use `#[field_vector(name = "I_max")]` on a field to override the name
/// reported by `field_names()` and by `from_slice()` errors.
#[proc_macro_derive(FieldVector, attributes(field_vector))]
pub fn derive_field_vector(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "FieldVector can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "FieldVector can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    if fields.is_empty() {
        return syn::Error::new_spanned(name, "FieldVector struct must have at least one field")
            .to_compile_error()
            .into();
    }

    let mut external_names = Vec::new();
    let mut field_idents = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if !is_f64_type(&field.ty) {
            return syn::Error::new_spanned(&field.ty, "FieldVector derive: all fields must be f64")
                .to_compile_error()
                .into();
        }
        let renamed = match extract_field_name(field) {
            Ok(r) => r,
            Err(e) => return e.to_compile_error().into(),
        };
        external_names.push(renamed.unwrap_or_else(|| ident.to_string()));
        field_idents.push(ident);
    }

    let len = field_idents.len();
    let indices: Vec<usize> = (0..len).collect();
    let name_str = name.to_string();

    let expanded = quote! {
        impl #name {
            /// Number of elements in the flat array layout.
            pub const LEN: usize = #len;

            /// External names of the fields, in array order.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#external_names),*]
            }

            /// Flatten into an array in field declaration order.
            pub fn to_array(&self) -> [f64; #len] {
                [#(self.#field_idents),*]
            }

            /// Build from an array in field declaration order.
            pub fn from_array(arr: [f64; #len]) -> Self {
                Self {
                    #(#field_idents: arr[#indices],)*
                }
            }

            /// Build from a slice, rejecting slices of the wrong length.
            pub fn from_slice(arr: &[f64]) -> ::std::result::Result<Self, String> {
                if arr.len() != #len {
                    return Err(format!(
                        "{} expects {} elements ({}), got {}",
                        #name_str,
                        #len,
                        Self::field_names().join(", "),
                        arr.len()
                    ));
                }
                Ok(Self {
                    #(#field_idents: arr[#indices],)*
                })
            }
        }
    };

    expanded.into()
}

fn extract_field_name(field: &syn::Field) -> syn::Result<Option<String>> {
    let mut renamed = None;
    for attr in &field.attrs {
        if attr.path().is_ident("field_vector") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    renamed = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported field_vector attribute, expected `name`"))
                }
            })?;
        }
    }
    Ok(renamed)
}

fn is_f64_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        type_path.path.is_ident("f64")
    } else {
        false
    }
}
