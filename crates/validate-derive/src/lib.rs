//! Derive macros for `sortguard_shared::Validate` and
//! `sortguard_domain::SortTarget`.

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Fields, FieldsNamed, GenericArgument, Ident, LitStr, Path,
    PathArguments, Type,
};

/// Derive `sortguard_shared::Validate` with field-level checks.
#[proc_macro_derive(Validate, attributes(validate))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_validate(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive `sortguard_domain::SortTarget` from `#[sort(...)]` field tags.
///
/// ```ignore
/// #[derive(SortTarget)]
/// struct Article {
///     #[sort(intent = "Default", column = "column:published_at")]
///     published: String,
///     #[sort(intent = "-")]
///     title: String,
/// }
/// ```
#[proc_macro_derive(SortTarget, attributes(sort))]
pub fn derive_sort_target(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_sort_target(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_validate(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let error_ty = parse_error_type(&input.attrs)?;
    let fields = &named_fields(input, "Validate")?.named;

    let mut checks = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let (field_name, validators) = parse_field_validators(&field.attrs, ident)?;
        if validators.is_empty() {
            continue;
        }
        let (is_option, inner_ty) = unwrap_option(&field.ty);
        for validator in validators {
            let check = match validator {
                Validator::NonEmpty => {
                    expand_non_empty(ident, &field_name, inner_ty, is_option, &error_ty)?
                },
                Validator::Custom(path) => expand_custom(ident, &path, is_option),
                Validator::SortField(target) => {
                    expand_sort_field(ident, &field_name, inner_ty, is_option, &error_ty, &target)?
                },
            };
            checks.push(check);
        }
    }

    let name = &input.ident;
    Ok(quote! {
        impl sortguard_shared::Validate for #name {
            type Error = #error_ty;

            fn validate(&self) -> Result<(), Self::Error> {
                #(#checks)*
                Ok(())
            }
        }
    })
}

fn parse_error_type(attrs: &[Attribute]) -> Result<Path, syn::Error> {
    let mut error_ty: Option<Path> = None;
    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("error") {
                let value: LitStr = meta.value()?.parse()?;
                let parsed: Path = value.parse()?;
                if error_ty.is_some() {
                    return Err(meta.error("duplicate validate(error = ...)"));
                }
                error_ty = Some(parsed);
                return Ok(());
            }
            Err(meta.error("unsupported validate attribute on container"))
        })?;
    }

    error_ty.ok_or_else(|| {
        syn::Error::new(
            proc_macro2::Span::call_site(),
            "missing #[validate(error = \"path\")] on struct",
        )
    })
}

fn parse_field_validators(
    attrs: &[Attribute],
    ident: &Ident,
) -> Result<(String, Vec<Validator>), syn::Error> {
    let mut validators = Vec::new();
    let mut field_name_override: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("field") {
                let value: LitStr = meta.value()?.parse()?;
                if field_name_override.is_some() {
                    return Err(meta.error("duplicate validate(field = ...)"));
                }
                field_name_override = Some(value.value());
                return Ok(());
            }
            if meta.path.is_ident("non_empty") {
                validators.push(Validator::NonEmpty);
                return Ok(());
            }
            if meta.path.is_ident("custom") {
                let value: LitStr = meta.value()?.parse()?;
                let path: Path = value.parse()?;
                validators.push(Validator::Custom(path));
                return Ok(());
            }
            if meta.path.is_ident("sort_field") {
                let mut target: Option<Path> = None;
                meta.parse_nested_meta(|nested| {
                    if nested.path.is_ident("target") {
                        let value: LitStr = nested.value()?.parse()?;
                        target = Some(value.parse()?);
                        return Ok(());
                    }
                    Err(nested.error("unsupported sort_field attribute"))
                })?;
                let Some(target) = target else {
                    return Err(meta.error("sort_field requires target"));
                };
                validators.push(Validator::SortField(target));
                return Ok(());
            }
            Err(meta.error("unsupported validate attribute on field"))
        })?;
    }
    let name = field_name_override.unwrap_or_else(|| ident.to_string());
    Ok((name, validators))
}

#[derive(Debug)]
enum Validator {
    NonEmpty,
    Custom(Path),
    SortField(Path),
}

fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<&'a FieldsNamed, syn::Error> {
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        ));
    };
    match &struct_data.fields {
        Fields::Named(fields) => Ok(fields),
        _ => Err(syn::Error::new_spanned(
            &struct_data.fields,
            format!("{derive} requires named fields"),
        )),
    }
}

fn unwrap_option(ty: &Type) -> (bool, &Type) {
    option_inner(ty).map_or((false, ty), |inner| (true, inner))
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut type_arg = None;
    for arg in &args.args {
        if let GenericArgument::Type(inner) = arg {
            type_arg = Some(inner);
            break;
        }
    }
    type_arg
}

fn expand_non_empty(
    ident: &Ident,
    field_name: &str,
    ty: &Type,
    is_option: bool,
    error_ty: &Path,
) -> Result<proc_macro2::TokenStream, syn::Error> {
    if !is_string_like(ty) {
        return Err(syn::Error::new_spanned(
            ty,
            "non_empty can only be used on string-like fields",
        ));
    }
    let field_name = LitStr::new(field_name, proc_macro2::Span::call_site());
    let err_expr = quote! {
        <#error_ty as sortguard_shared::ValidationError>::empty(#field_name)
    };
    if is_option {
        Ok(quote! {
            if let Some(value) = self.#ident.as_ref() {
                if value.trim().is_empty() {
                    return Err(#err_expr);
                }
            }
        })
    } else {
        Ok(quote! {
            if self.#ident.trim().is_empty() {
                return Err(#err_expr);
            }
        })
    }
}

fn expand_custom(ident: &Ident, path: &Path, is_option: bool) -> proc_macro2::TokenStream {
    if is_option {
        quote! {
            #path(self.#ident.as_ref())?;
        }
    } else {
        quote! {
            #path(&self.#ident)?;
        }
    }
}

fn expand_sort_field(
    ident: &Ident,
    field_name: &str,
    ty: &Type,
    is_option: bool,
    error_ty: &Path,
    target: &Path,
) -> Result<proc_macro2::TokenStream, syn::Error> {
    if !is_string_like(ty) {
        return Err(syn::Error::new_spanned(
            ty,
            "sort_field can only be used on string-like fields",
        ));
    }
    let field_name = LitStr::new(field_name, proc_macro2::Span::call_site());
    let check = quote! {
        let allowed = sortguard_domain::allowed_sort_values_of::<#target>();
        if !allowed.contains(value) {
            return Err(<#error_ty as sortguard_shared::ValidationError>::not_one_of(
                #field_name,
                value.to_string(),
                allowed.into_vec(),
            ));
        }
    };
    if is_option {
        Ok(quote! {
            if let Some(value) = self.#ident.as_deref() {
                #check
            }
        })
    } else {
        Ok(quote! {
            {
                let value: &str = &self.#ident;
                #check
            }
        })
    }
}

fn expand_sort_target(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let fields = &named_fields(input, "SortTarget")?.named;

    let mut descriptors = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let tags = parse_sort_tags(&field.attrs)?;
        let field_name = LitStr::new(&ident.unraw().to_string(), ident.span());
        let mut descriptor = quote! { sortguard_domain::FieldDescriptor::new(#field_name) };
        if let Some(intent) = tags.intent {
            descriptor = quote! { #descriptor.with_sort(#intent) };
        }
        if let Some(column) = tags.column {
            descriptor = quote! { #descriptor.with_column(#column) };
        }
        descriptors.push(descriptor);
    }

    let name = &input.ident;
    let target_name = LitStr::new(&name.unraw().to_string(), name.span());
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics sortguard_domain::SortTarget for #name #ty_generics #where_clause {
            fn target_name() -> &'static str {
                #target_name
            }

            fn sort_fields() -> &'static [sortguard_domain::FieldDescriptor] {
                const FIELDS: &[sortguard_domain::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }
        }
    })
}

#[derive(Debug, Default)]
struct SortTags {
    intent: Option<LitStr>,
    column: Option<LitStr>,
}

fn parse_sort_tags(attrs: &[Attribute]) -> Result<SortTags, syn::Error> {
    let mut tags = SortTags::default();
    for attr in attrs {
        if !attr.path().is_ident("sort") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("intent") {
                if tags.intent.is_some() {
                    return Err(meta.error("duplicate sort(intent = ...)"));
                }
                tags.intent = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("column") {
                if tags.column.is_some() {
                    return Err(meta.error("duplicate sort(column = ...)"));
                }
                tags.column = Some(meta.value()?.parse()?);
                return Ok(());
            }
            Err(meta.error("unsupported sort attribute on field"))
        })?;
    }
    Ok(tags)
}

fn is_string_like(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => is_string_like(&reference.elem),
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return false;
            };
            if segment.ident == "String" {
                return true;
            }
            if segment.ident == "str" {
                return true;
            }
            if segment.ident == "Box" {
                let PathArguments::AngleBracketed(args) = &segment.arguments else {
                    return false;
                };
                let mut inner = None;
                for arg in &args.args {
                    if let GenericArgument::Type(inner_ty) = arg {
                        inner = Some(inner_ty);
                        break;
                    }
                }
                if let Some(inner_ty) = inner {
                    return is_str_type(inner_ty);
                }
            }
            false
        },
        _ => false,
    }
}

fn is_str_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "str"),
        Type::Reference(reference) => is_str_type(&reference.elem),
        _ => false,
    }
}
