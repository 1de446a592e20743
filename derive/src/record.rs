use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, LitInt, LitStr, Result, Token, Type,
    ext::IdentExt,
    parse::{Parse, ParseStream},
};

pub(crate) fn expand_record(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`Record` may only be derived on structs.",
        ))?
    };

    let fields = match &data.fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .map(FieldMetadata::parse)
            .map(Result::transpose)
            .flatten() // Skip fields without an attribute.
            .collect::<Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => Err(Error::new_spanned(
            input,
            "`Record` may only be derived on structs with named fields.",
        ))?,
    };

    let registrations = fields.iter().map(|field| {
        let FieldMetadata { name, ty, tag } = field;
        let label = name.unraw().to_string();

        quote! {
            fields.field::<#ty>(#label, #tag, |r| &r.#name, |r| &mut r.#name);
        }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // A static cannot name the type's generic parameters, so generic records
    // fall back to the shared registry.
    let descriptor = input.generics.params.is_empty().then(|| {
        quote! {
            fn descriptor() -> ::core::result::Result<
                &'static ::fixedwidth::Descriptor<Self>,
                ::fixedwidth::InvalidTag,
            > {
                static DESCRIPTOR: ::fixedwidth::DescriptorCache<#name> =
                    ::fixedwidth::DescriptorCache::new();
                DESCRIPTOR.get()
            }
        }
    });

    let expanded = quote! {
        #[automatically_derived]
        impl #impl_generics ::fixedwidth::Record for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn describe(fields: &mut ::fixedwidth::DescriptorBuilder<Self>) {
                #(#registrations)*
            }

            #descriptor
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    tag: LitStr,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let mut attrs = field.attrs.iter().filter(|a| a.path().is_ident("fixed"));

        let Some(attr) = attrs.next() else {
            return Ok(None);
        };

        if let Some(duplicate) = attrs.next() {
            Err(Error::new_spanned(
                duplicate,
                "Field may only have one `fixed` attribute.",
            ))?
        }

        let RangeAttribute { tag } = attr.meta.require_list()?.parse_args()?;

        match &field.ty {
            Type::Array(_)
            | Type::BareFn(_)
            | Type::ImplTrait(_)
            | Type::Never(_)
            | Type::Ptr(_)
            | Type::Reference(_)
            | Type::Slice(_)
            | Type::TraitObject(_)
            | Type::Tuple(_) => Err(Error::new_spanned(
                &field.ty,
                "Field type is unsupported; use text, an integer, a float, or a type implementing `TextCodec`.",
            ))?,
            _ => {}
        }

        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        Ok(Some(Self {
            name,
            ty: field.ty.clone(),
            tag,
        }))
    }
}

/// Either `"<start>,<end>"` or `<start>, <end>`, normalized to the former.
///
/// Bounds are validated when the descriptor is built, not here.
#[derive(Debug)]
struct RangeAttribute {
    tag: LitStr,
}

impl Parse for RangeAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let lookahead = input.lookahead1();

        let tag = if lookahead.peek(LitStr) {
            input.parse::<LitStr>()?
        } else if lookahead.peek(LitInt) {
            let start = input.parse::<LitInt>()?;
            input.parse::<Token![,]>()?;
            let end = input.parse::<LitInt>()?;

            let tag = format!("{},{}", start.base10_digits(), end.base10_digits());
            LitStr::new(&tag, start.span())
        } else {
            Err(lookahead.error())?
        };

        Ok(Self { tag })
    }
}
