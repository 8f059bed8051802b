use crate::utils::{apply_derives, logical_name, message_derives, parse_args};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Fields, Item, parse_macro_input};

/// #[domain_event] 宏实现
/// - 仅支持具名字段结构体（事件携带完整状态而非增量）
/// - `aggregate_id()` 通过 `ToString` 读取 id 字段，默认字段名 `id`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_args(attr, &["name", "id"]) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut st = match parse_macro_input!(item as Item) {
        Item::Struct(st) => st,
        other => {
            return syn::Error::new(other.span(), "#[domain_event] only supports struct")
                .to_compile_error()
                .into();
        }
    };

    let Fields::Named(fields) = &st.fields else {
        return syn::Error::new(
            st.span(),
            "#[domain_event] supports only named-field struct, e.g. struct X { id: Uuid }",
        )
        .to_compile_error()
        .into();
    };

    let id_field = args
        .id
        .unwrap_or_else(|| syn::Ident::new("id", proc_macro2::Span::call_site()));
    let has_id = fields
        .named
        .iter()
        .any(|f| f.ident.as_ref().is_some_and(|i| *i == id_field));
    if !has_id {
        return syn::Error::new(
            st.ident.span(),
            format!("#[domain_event] requires field `{id_field}`"),
        )
        .to_compile_error()
        .into();
    }

    let name = match logical_name(&st.ident, args.name) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error().into(),
    };

    apply_derives(&mut st.attrs, message_derives());

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    TokenStream::from(quote! {
        #st

        impl #impl_generics ::quill_domain::domain_event::DomainEvent for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;

            fn aggregate_id(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(&self.#id_field)
            }
        }
    })
}
