use quote::ToTokens;
use syn::parse::{ParseStream, Parser};
use syn::{Attribute, Ident, LitStr, Token, Type};

// 提取非 derive 属性与已有 derive 列表
fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("derive") {
            if let Ok(list) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, Token![,]>::parse_terminated,
            ) {
                existing.extend(list);
            }
        } else {
            retained.push(attr.clone());
        }
    }
    (retained, existing)
}

// 归一化 derive 的 key，避免 Serialize/serde::Serialize 重复
fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => {
            let ident = last.ident.to_string();
            match ident.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{ident}"),
                _ => ident,
            }
        }
        None => p.to_token_stream().to_string(),
    }
}

/// 合并必需派生与已有派生（去重，必需项在前）
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);
    let mut seen = std::collections::HashSet::<String>::new();
    let merged: Vec<syn::Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();
    let derive: Attribute = syn::parse_quote!(#[derive(#(#merged),*)]);
    *attrs = std::iter::once(derive).chain(retained).collect();
}

/// 消息类型（命令/查询/事件/DTO）共用的派生集合
pub(crate) fn message_derives() -> Vec<syn::Path> {
    vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ]
}

/// 属性参数：`name = "..."`, `dto = Type`, `id = field`
#[derive(Default)]
pub(crate) struct AttrArgs {
    pub name: Option<LitStr>,
    pub dto: Option<Type>,
    pub id: Option<Ident>,
}

pub(crate) fn parse_args(
    attr: proc_macro::TokenStream,
    allowed: &'static [&'static str],
) -> syn::Result<AttrArgs> {
    let parser = move |input: ParseStream| -> syn::Result<AttrArgs> {
        let mut args = AttrArgs::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let key_str = key.to_string();
            if !allowed.contains(&key_str.as_str()) {
                return Err(syn::Error::new(
                    key.span(),
                    format!(
                        "unknown key `{key_str}` in attribute; expected one of: {}",
                        allowed.join(", ")
                    ),
                ));
            }
            input.parse::<Token![=]>()?;
            match key_str.as_str() {
                "name" => set_once(&mut args.name, input.parse()?, &key)?,
                "dto" => set_once(&mut args.dto, input.parse()?, &key)?,
                _ => set_once(&mut args.id, input.parse()?, &key)?,
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(args)
    };
    parser.parse(attr)
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &Ident) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate key `{key}` in attribute"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

/// 解析逻辑名称：显式 `name` 优先，否则取类型标识符
pub(crate) fn logical_name(ident: &Ident, explicit: Option<LitStr>) -> syn::Result<LitStr> {
    let lit = explicit.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let value = lit.value();
    if value.is_empty() || value.contains('.') || value.chars().any(char::is_whitespace) {
        return Err(syn::Error::new(
            lit.span(),
            "logical name must be non-empty and must not contain '.' or whitespace",
        ));
    }
    Ok(lit)
}
