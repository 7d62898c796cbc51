use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[derive(Command)] 宏实现
/// - 支持结构体（具名、tuple、unit）与枚举
/// - 参数：`#[command(result = Ty)]`，可选，至多一个
pub(crate) fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if let Data::Union(u) = &input.data {
        return syn::Error::new(
            u.union_token.span(),
            "#[derive(Command)] only supports struct or enum",
        )
        .to_compile_error()
        .into();
    }

    let cfg = match CommandAttrConfig::from_attrs(&input.attrs) {
        Ok(cfg) => cfg,
        Err(e) => return e.to_compile_error().into(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let typed = cfg.result.map(|result| {
        quote! {
            impl #impl_generics ::command_bus::command::TypedCommand<#result> for #ident #ty_generics #where_clause {}
        }
    });

    let expanded = quote! {
        impl #impl_generics ::command_bus::command::Command for #ident #ty_generics #where_clause {}

        #typed
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

#[derive(Default)]
struct CommandAttrConfig {
    result: Option<Type>,
}

impl CommandAttrConfig {
    // 允许拆成多个 #[command(...)]，但键不得重复
    fn from_attrs(attrs: &[syn::Attribute]) -> Result<Self> {
        let mut cfg = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("command")) {
            let elems = attr
                .parse_args_with(Punctuated::<CommandAttrElem, Token![,]>::parse_terminated)?;

            for elem in elems {
                match elem {
                    CommandAttrElem::Result(ty) => {
                        if cfg.result.is_some() {
                            return Err(syn::Error::new(
                                ty.span(),
                                "duplicate key 'result' in attribute",
                            ));
                        }
                        cfg.result = Some(ty);
                    }
                }
            }
        }

        Ok(cfg)
    }
}

enum CommandAttrElem {
    Result(Type),
}

impl Parse for CommandAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "result" {
            let _eq: Token![=] = input.parse()?;
            let ty: Type = input.parse()?;
            Ok(Self::Result(ty))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'result'",
            ))
        }
    }
}
