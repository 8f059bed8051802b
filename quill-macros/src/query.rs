use crate::utils::{apply_derives, logical_name, message_derives, parse_args};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, parse_macro_input};

/// #[query(dto = T)] 宏实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_args(attr, &["name", "dto"]) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut st = match parse_macro_input!(item as Item) {
        Item::Struct(st) => st,
        other => {
            return syn::Error::new(other.span(), "#[query] only supports struct")
                .to_compile_error()
                .into();
        }
    };

    let Some(dto) = args.dto else {
        return syn::Error::new(st.ident.span(), "#[query] requires `dto = Type`")
            .to_compile_error()
            .into();
    };

    let name = match logical_name(&st.ident, args.name) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error().into(),
    };

    apply_derives(&mut st.attrs, message_derives());

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    TokenStream::from(quote! {
        #st

        impl #impl_generics ::quill_application::query::Query for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Dto = #dto;
        }
    })
}
