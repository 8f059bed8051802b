use crate::utils::{apply_derives, message_derives};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, parse_macro_input};

pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[dto] takes no arguments")
            .to_compile_error()
            .into();
    }

    let mut input = parse_macro_input!(item as Item);
    let (ident, generics) = match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, message_derives());
            (st.ident.clone(), st.generics.clone())
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, message_derives());
            (en.ident.clone(), en.generics.clone())
        }
        other => {
            return syn::Error::new(other.span(), "#[dto] only supports struct or enum")
                .to_compile_error()
                .into();
        }
    };

    // 泛型 DTO 由 Self 约束兜底（例如 PaginatedView<T> 要求 T: Serialize）
    let mut bounded = generics.clone();
    bounded.make_where_clause().predicates.push(syn::parse_quote! {
        Self: serde::Serialize + ::std::marker::Send + ::std::marker::Sync + 'static
    });
    let (impl_generics, ty_generics, _) = generics.split_for_impl();
    let where_clause = &bounded.where_clause;

    TokenStream::from(quote! {
        #input

        impl #impl_generics ::quill_application::dto::Dto for #ident #ty_generics #where_clause {}
    })
}
