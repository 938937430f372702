use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr, Type};

/// Derive macro for record field tables.
///
/// Implements `recmap::Record`: the type's field descriptors, by-name read and
/// write accessors, and construction for map → record conversion.
///
/// Field attributes (`#[record(...)]`):
///
/// - `key = "..."` — map key used verbatim instead of the snake case form.
/// - `rename = "..."` — property identifier (defaults to the camel case form of
///   the field name).
/// - `parent` — the field embeds the ancestor record; its properties are
///   inherited. At most one per struct.
/// - `read_only` / `write_only` — only one accessor is generated.
/// - `skip` — not a property.
/// - `opaque` — the type is outside the supported set and goes through
///   `Display`/`FromStr`.
///
/// Struct attribute `construct = "path"` names a `fn() -> Result<Self, E>`
/// (`E: Display`) used instead of `Default::default()`.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct CardPayment {
///     #[record(parent)]
///     pub payment: Payment,
///
///     #[record(key = "ref")]
///     pub reference_code: String,
///
///     pub captured_at: Option<time::PrimitiveDateTime>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_record_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

/// Derive macro for unit enums used as record fields.
///
/// Implements `recmap::RecordEnum` and `recmap::FieldValue`. Constant names are
/// the variant names unless overridden with `#[record(rename = "...")]`;
/// lookup by name is case-sensitive.
#[proc_macro_derive(RecordEnum, attributes(record))]
pub fn derive_record_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_enum_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

#[derive(Default)]
struct FieldAttrs {
    key: Option<String>,
    rename: Option<String>,
    parent: bool,
    read_only: bool,
    write_only: bool,
    skip: bool,
    opaque: bool,
}

fn field_attrs(field: &syn::Field) -> Result<FieldAttrs, syn::Error> {
    let mut attrs = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.key = Some(value.value());
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.rename = Some(value.value());
            } else if meta.path.is_ident("parent") {
                attrs.parent = true;
            } else if meta.path.is_ident("read_only") {
                attrs.read_only = true;
            } else if meta.path.is_ident("write_only") {
                attrs.write_only = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else if meta.path.is_ident("opaque") {
                attrs.opaque = true;
            } else {
                return Err(meta.error("unknown record attribute"));
            }
            Ok(())
        })?;
    }
    if attrs.read_only && attrs.write_only {
        return Err(syn::Error::new_spanned(
            field,
            "a field cannot be both read_only and write_only",
        ));
    }
    if attrs.parent && (attrs.key.is_some() || attrs.rename.is_some() || attrs.opaque) {
        return Err(syn::Error::new_spanned(
            field,
            "a parent field takes no key, rename or opaque",
        ));
    }
    Ok(attrs)
}

fn construct_path(input: &DeriveInput) -> Result<Option<syn::Path>, syn::Error> {
    let mut path = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("construct") {
                let value: LitStr = meta.value()?.parse()?;
                path = Some(value.parse::<syn::Path>()?);
                Ok(())
            } else {
                Err(meta.error("unknown record attribute"))
            }
        })?;
    }
    Ok(path)
}

fn derive_record_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Record only supports structs")),
    };

    let mut descriptor_tokens = Vec::new();
    let mut read_arms = Vec::new();
    let mut write_arms = Vec::new();
    let mut parent: Option<(&Ident, &Type)> = None;
    let mut seen: Vec<String> = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        let field_ty = &field.ty;
        let attrs = field_attrs(field)?;

        if attrs.skip {
            continue;
        }
        if attrs.parent {
            if parent.is_some() {
                return Err(syn::Error::new_spanned(
                    field_name,
                    "only one #[record(parent)] field is allowed",
                ));
            }
            parent = Some((field_name, field_ty));
            continue;
        }

        let property = attrs
            .rename
            .clone()
            .unwrap_or_else(|| camel_case(&field_name.to_string()));
        if seen.contains(&property) {
            return Err(syn::Error::new_spanned(
                field_name,
                format!("duplicate property '{property}'"),
            ));
        }
        seen.push(property.clone());

        let override_key = match &attrs.key {
            Some(key) => quote! { ::std::option::Option::Some(#key) },
            None => quote! { ::std::option::Option::None },
        };
        let readable = !attrs.write_only;
        let writable = !attrs.read_only;

        let (type_tag, nullable, read_expr, write_expr) = if attrs.opaque {
            if is_option(field_ty) {
                (
                    quote! { ::recmap::value::TypeTag::Opaque },
                    quote! { true },
                    quote! { ::recmap::value::opaque_option_to_value(&self.#field_name) },
                    quote! { ::recmap::value::opaque_option_from_value(__value)? },
                )
            } else {
                (
                    quote! { ::recmap::value::TypeTag::Opaque },
                    quote! { false },
                    quote! { ::recmap::value::opaque_to_value(&self.#field_name) },
                    quote! { ::recmap::value::opaque_from_value(__value)? },
                )
            }
        } else {
            (
                quote! { <#field_ty as ::recmap::value::FieldValue>::TYPE },
                quote! { <#field_ty as ::recmap::value::FieldValue>::NULLABLE },
                quote! { ::recmap::value::FieldValue::to_value(&self.#field_name) },
                quote! { <#field_ty as ::recmap::value::FieldValue>::from_value(__value)? },
            )
        };

        descriptor_tokens.push(quote! {
            ::recmap::record::FieldDescriptor {
                name: #property,
                type_tag: #type_tag,
                override_key: #override_key,
                readable: #readable,
                writable: #writable,
                nullable: #nullable,
            }
        });

        if readable {
            read_arms.push(quote! {
                #property => ::std::option::Option::Some(#read_expr),
            });
        }
        if writable {
            write_arms.push(quote! {
                #property => {
                    self.#field_name = #write_expr;
                    ::std::result::Result::Ok(true)
                }
            });
        }
    }

    let (parent_expr, read_fallback, write_fallback) = match parent {
        Some((field_name, field_ty)) => (
            quote! {
                ::std::option::Option::Some(
                    <#field_ty as ::recmap::record::Record>::record_type
                        as fn() -> ::recmap::record::RecordType
                )
            },
            quote! { ::recmap::record::Record::read_field(&self.#field_name, __name) },
            quote! { ::recmap::record::Record::write_field(&mut self.#field_name, __name, __value) },
        ),
        None => (
            quote! { ::std::option::Option::None },
            quote! { ::std::option::Option::None },
            quote! { ::std::result::Result::Ok(false) },
        ),
    };

    let instantiate = match construct_path(input)? {
        Some(path) => quote! {
            #path().map_err(|e| ::recmap::error::ConvertError::Construction {
                record: #name_str.to_string(),
                reason: e.to_string(),
            })
        },
        None => quote! {
            ::std::result::Result::Ok(<Self as ::std::default::Default>::default())
        },
    };

    let expanded = quote! {
        impl #impl_generics ::recmap::record::Record for #name #ty_generics #where_clause {
            fn record_type() -> ::recmap::record::RecordType {
                ::recmap::record::RecordType {
                    name: #name_str,
                    fields: ::std::vec![
                        #(#descriptor_tokens),*
                    ],
                    parent: #parent_expr,
                }
            }

            fn read_field(&self, __name: &str) -> ::std::option::Option<::recmap::value::Value> {
                match __name {
                    #(#read_arms)*
                    _ => #read_fallback,
                }
            }

            #[allow(unused_variables)]
            fn write_field(
                &mut self,
                __name: &str,
                __value: ::recmap::value::Value,
            ) -> ::std::result::Result<bool, ::recmap::error::CoerceError> {
                match __name {
                    #(#write_arms)*
                    _ => #write_fallback,
                }
            }

            fn instantiate() -> ::std::result::Result<Self, ::recmap::error::ConvertError> {
                #instantiate
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

fn derive_enum_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => return Err(syn::Error::new_spanned(name, "RecordEnum only supports enums")),
    };
    if variants.is_empty() {
        return Err(syn::Error::new_spanned(name, "RecordEnum needs at least one variant"));
    }

    let mut constants = Vec::new();
    let mut idents = Vec::new();
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "RecordEnum only supports unit variants",
            ));
        }
        let mut constant = variant.ident.to_string();
        for attr in &variant.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    constant = value.value();
                    Ok(())
                } else {
                    Err(meta.error("unknown record attribute"))
                }
            })?;
        }
        if constants.contains(&constant) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate constant '{constant}'"),
            ));
        }
        constants.push(constant);
        idents.push(&variant.ident);
    }

    let expanded = quote! {
        impl #impl_generics ::recmap::value::RecordEnum for #name #ty_generics #where_clause {
            const INFO: ::recmap::value::EnumInfo = ::recmap::value::EnumInfo {
                name: #name_str,
                variants: &[#(#constants),*],
            };

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #constants,)*
                }
            }

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    #(#constants => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics ::recmap::value::FieldValue for #name #ty_generics #where_clause {
            const TYPE: ::recmap::value::TypeTag = ::recmap::value::TypeTag::Enum(
                <Self as ::recmap::value::RecordEnum>::INFO,
            );

            fn to_value(&self) -> ::recmap::value::Value {
                ::recmap::value::enum_to_value(self)
            }

            fn from_value(
                value: ::recmap::value::Value,
            ) -> ::std::result::Result<Self, ::recmap::error::CoerceError> {
                ::recmap::value::enum_from_value(value)
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

/// `order_id` → `orderId`; a raw identifier prefix is dropped.
fn camel_case(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    let mut upper = false;
    for c in ident.chars() {
        if c == '_' && !out.is_empty() {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether the last path segment of a type is `Option`.
fn is_option(ty: &Type) -> bool {
    type_ident_name(ty).is_some_and(|name| name == "Option")
}

/// Extract the last path segment ident name from a type (e.g. `Option`, `String`).
fn type_ident_name(ty: &Type) -> Option<String> {
    if let Type::Path(type_path) = ty {
        type_path
            .path
            .segments
            .last()
            .map(|seg| seg.ident.to_string())
    } else {
        None
    }
}
