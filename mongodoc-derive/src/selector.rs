use proc_macro2::TokenStream;
use quote::quote;

use crate::ast::Container;

pub fn expand_derive_selector(input: &syn::DeriveInput) -> Result<TokenStream, Vec<syn::Error>> {
    let container = Container::from(input)?;

    let name = &container.ident;
    let (impl_generics, ty_generics, where_clause) = container.generics.split_for_impl();
    let rule = container.attrs.rename_all;

    let sets = container.fields.iter().filter(|f| !f.attrs.skip).map(|f| {
        let key = f.key(rule);
        let ident = &f.ident;
        let ty = f.ty;
        quote! {
            selector.set(#key, <#ty as ::core::convert::Into<_mongodoc::Token>>::into(value.#ident));
        }
    });

    Ok(quote! {
        #[allow(non_upper_case_globals, unused_attributes, unused_mut, unused_qualifications, unused_variables)]
        const _: () = {
            extern crate mongodoc as _mongodoc;

            #[automatically_derived]
            impl #impl_generics ::core::convert::From<#name #ty_generics> for _mongodoc::Selector #where_clause {
                fn from(value: #name #ty_generics) -> Self {
                    let mut selector = _mongodoc::Selector::new();
                    #(#sets)*
                    selector
                }
            }

            #[automatically_derived]
            impl #impl_generics _mongodoc::IntoDocument for #name #ty_generics #where_clause {
                fn into_document(self) -> ::core::result::Result<_mongodoc::bson::Document, _mongodoc::Error> {
                    _mongodoc::IntoDocument::into_document(_mongodoc::Selector::from(self))
                }
            }
        };
    })
}
