use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Lit, LitStr, Meta, Type};

/// Derive macro describing the CSV columns of a record from its fields.
///
/// For each named field:
/// - column name, honouring `#[serde(rename = "...")]`
/// - required, unless the field is an `Option<T>` or marked `#[serde(default)]`
/// - description, joined from the field's doc comments
///
/// Generates `fn csv_schema() -> &'static [CsvField]`. A `CsvField` struct with
/// `name`, `required` and `description` fields must be in scope at the derive site.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvSchema requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvSchema only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let serde = match SerdeField::from_attrs(&field.attrs) {
            Ok(serde) => serde,
            Err(err) => return err.to_compile_error().into(),
        };
        let column = serde.rename.unwrap_or_else(|| {
            field
                .ident
                .as_ref()
                .map(|i| i.to_string().trim_start_matches("r#").to_string())
                .unwrap_or_default()
        });
        let required = !serde.default && !is_option_type(&field.ty);
        let description = doc_comment(&field.attrs);

        entries.push(quote! {
            CsvField {
                name: #column,
                required: #required,
                description: #description,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn csv_schema() -> &'static [CsvField] {
                static SCHEMA: &[CsvField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeField {
    rename: Option<String>,
    default: bool,
}

impl SerdeField {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = SerdeField::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    out.rename = Some(value.value());
                } else if meta.path.is_ident("default") {
                    out.default = true;
                    // `default = "path"` form
                    if meta.input.peek(syn::Token![=]) {
                        let _: LitStr = meta.value()?.parse()?;
                    }
                } else if meta.input.peek(syn::Token![=]) {
                    // other serde options are irrelevant to the schema
                    let _: Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    let _content;
                    syn::parenthesized!(_content in meta.input);
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
