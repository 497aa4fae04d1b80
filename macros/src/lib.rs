use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, FnArg, ImplItem, ItemImpl, LitInt, LitStr, Meta, Type};

/// Generates an Axum router and an OpenAPI description from the handlers of
/// an impl block.
///
/// Usage:
/// ```ignore
/// struct WalletController;
///
/// #[controller(state = AppState, tag = "Wallet")]
/// impl WalletController {
///     #[get("/bal")]
///     #[secured]
///     #[utoipa_response(status = 200, body = BalanceResponse, description = "Current balance")]
///     async fn balance(/* extractors */) -> Result<Json<BalanceResponse>, AppError> {
///         /* ... */
///     }
///
///     #[post("/fund")]
///     #[secured]
///     #[request_body(FundRequest)]
///     async fn fund(/* extractors */) -> Result<Json<BalanceResponse>, AppError> {
///         /* ... */
///     }
/// }
/// ```
///
/// This expands to an `impl wallet_core::controller::Controller<AppState>`
/// whose `router(state)` mounts every annotated handler, plus a
/// `WalletControllerApi` struct deriving `utoipa::OpenApi` with one path per
/// handler.
#[proc_macro_attribute]
pub fn controller(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ControllerArgs);
    let impl_block = parse_macro_input!(input as ItemImpl);
    let self_ty = &impl_block.self_ty;
    let struct_name = match &**self_ty {
        syn::Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => &segment.ident,
            None => {
                return syn::Error::new(impl_block.span(), "Expected a struct type")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(impl_block.span(), "Expected a struct type")
                .to_compile_error()
                .into();
        }
    };
    let state_ty = &args.state;

    let mut route_registrations = Vec::new();
    let mut openapi_path_functions = Vec::new();
    let mut openapi_path_names = Vec::new();
    let mut schema_types = Vec::new();

    for item in &impl_block.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let Some((method_name, path)) = extract_route_attr(&method.attrs) else {
            continue;
        };

        if let Some(receiver) = method
            .sig
            .inputs
            .iter()
            .find(|input| matches!(input, FnArg::Receiver(_)))
        {
            return syn::Error::new(
                receiver.span(),
                "controller handlers must be associated functions without `self`",
            )
            .to_compile_error()
            .into();
        }

        let fn_name = &method.sig.ident;
        let axum_method = format_ident!("{}", method_name);
        route_registrations.push(quote! {
            router = router.route(#path, axum::routing::#axum_method(<#self_ty>::#fn_name));
        });

        let response_attrs = match extract_utoipa_response_attrs(&method.attrs) {
            Ok(responses) => responses,
            Err(err) => return err.to_compile_error().into(),
        };
        let request_body = extract_request_body(&method.attrs);
        let security = extract_security(&method.attrs);

        let mut path_args = vec![
            quote!(#axum_method),
            quote!(path = #path),
            {
                let operation_id = fn_name.to_string();
                quote!(operation_id = #operation_id)
            },
        ];
        if let Some(tag) = &args.tag {
            path_args.push(quote!(tag = #tag));
        }
        if let Some(body) = &request_body {
            path_args.push(quote!(request_body = #body));
            collect_schema_types(body, &mut schema_types);
        }
        if let Some(scheme) = &security {
            path_args.push(quote!(security((#scheme = []))));
        }
        if !response_attrs.is_empty() {
            let responses = response_attrs.iter().map(|r| &r.tokens);
            path_args.push(quote!(responses(#(#responses),*)));
        }
        for response in &response_attrs {
            collect_schema_types(&response.body, &mut schema_types);
        }

        // The documented function mirrors the handler signature at module
        // level, where `#[utoipa::path]` can see it.
        let wrapper_name = format_ident!("__utoipa_path_{}", fn_name);
        let fn_vis = &method.vis;
        let fn_async = method.sig.asyncness;
        let fn_inputs = &method.sig.inputs;
        let fn_output = &method.sig.output;
        let fn_generics = &method.sig.generics;
        let fn_where_clause = &method.sig.generics.where_clause;
        let struct_name_str = struct_name.to_string();
        let fn_name_str = fn_name.to_string();

        openapi_path_functions.push(quote! {
            #[doc = concat!("OpenAPI description of ", #struct_name_str, "::", #fn_name_str, ".")]
            #[allow(dead_code, unused_variables)]
            #[utoipa::path(#(#path_args),*)]
            #fn_vis #fn_async fn #wrapper_name #fn_generics(#fn_inputs) #fn_output #fn_where_clause {
                unimplemented!("documentation-only function")
            }
        });
        openapi_path_names.push(wrapper_name);
    }

    let mut unique_schemas = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for schema_type in schema_types {
        let type_str = quote!(#schema_type).to_string();
        if seen.insert(type_str) {
            unique_schemas.push(schema_type);
        }
    }

    let openapi_attr = if unique_schemas.is_empty() {
        quote! {
            #[derive(utoipa::OpenApi)]
            #[openapi(
                paths(
                    #(#openapi_path_names),*
                )
            )]
        }
    } else {
        quote! {
            #[derive(utoipa::OpenApi)]
            #[openapi(
                paths(
                    #(#openapi_path_names),*
                ),
                components(schemas(
                    #(#unique_schemas),*
                ))
            )]
        }
    };

    let api_struct_name = format_ident!("{}Api", struct_name);

    let expanded = quote! {
        #impl_block

        impl wallet_core::controller::Controller<#state_ty> for #self_ty {
            fn router(state: #state_ty) -> axum::Router {
                #[allow(unused_mut)]
                let mut router: axum::Router<#state_ty> = axum::Router::new();

                #(#route_registrations)*

                router.with_state(state)
            }
        }

        #(#openapi_path_functions)*

        #openapi_attr
        pub struct #api_struct_name;
    };

    TokenStream::from(expanded)
}

/// Arguments of `#[controller(state = Type, tag = "Name")]`.
struct ControllerArgs {
    state: Type,
    tag: Option<LitStr>,
}

impl syn::parse::Parse for ControllerArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut state = None;
        let mut tag = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let _eq: syn::Token![=] = input.parse()?;

            match key.to_string().as_str() {
                "state" => state = Some(input.parse()?),
                "tag" => tag = Some(input.parse()?),
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("Unknown argument: {}", other),
                    ));
                }
            }

            if !input.is_empty() {
                let _comma: syn::Token![,] = input.parse()?;
            }
        }

        let state = state.ok_or_else(|| input.error("missing `state = <Type>`"))?;

        Ok(ControllerArgs { state, tag })
    }
}

fn last_segment_is(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .map(|segment| segment.ident == name)
        .unwrap_or(false)
}

/// Finds `#[get("/path")]` style attributes, qualified or not.
fn extract_route_attr(attrs: &[Attribute]) -> Option<(String, LitStr)> {
    for attr in attrs {
        let Some(last_segment) = attr.path().segments.last() else {
            continue;
        };

        let method = last_segment.ident.to_string().to_lowercase();
        if matches!(method.as_str(), "get" | "post" | "put" | "delete" | "patch") {
            if let Meta::List(meta) = &attr.meta {
                if let Ok(path_lit) = syn::parse2::<LitStr>(meta.tokens.clone()) {
                    return Some((method, path_lit));
                }
            }
        }
    }
    None
}

fn extract_request_body(attrs: &[Attribute]) -> Option<Type> {
    attrs
        .iter()
        .filter(|attr| last_segment_is(attr, "request_body"))
        .find_map(|attr| attr.parse_args::<Type>().ok())
}

/// `#[secured]` defaults to the `basicAuth` scheme; `#[secured("name")]`
/// picks another one.
fn extract_security(attrs: &[Attribute]) -> Option<LitStr> {
    let attr = attrs.iter().find(|attr| last_segment_is(attr, "secured"))?;

    match &attr.meta {
        Meta::List(_) => attr.parse_args::<LitStr>().ok(),
        _ => Some(LitStr::new("basicAuth", attr.span())),
    }
}

struct ResponseAttr {
    tokens: proc_macro2::TokenStream,
    body: Type,
}

/// Reads every `#[utoipa_response(...)]`:
/// - `#[utoipa_response(Type)]` is a 200 with `Type` as body
/// - `#[utoipa_response(status = 201, body = Type, description = "Created")]`
fn extract_utoipa_response_attrs(attrs: &[Attribute]) -> syn::Result<Vec<ResponseAttr>> {
    let mut responses = Vec::new();

    for attr in attrs.iter().filter(|attr| last_segment_is(attr, "utoipa_response")) {
        let Meta::List(meta) = &attr.meta else {
            continue;
        };
        let tokens = meta.tokens.clone();

        if let Ok(parsed) = syn::parse2::<UtoipaResponseArgs>(tokens.clone()) {
            let status = proc_macro2::Literal::u16_unsuffixed(parsed.status.unwrap_or(200));
            let description = parsed.description.as_deref().unwrap_or("Success");
            let body = parsed.body;

            responses.push(ResponseAttr {
                tokens: quote! {
                    (status = #status, description = #description, body = #body)
                },
                body,
            });
            continue;
        }

        let body = syn::parse2::<Type>(tokens)?;
        responses.push(ResponseAttr {
            tokens: quote! {
                (status = 200, description = "Success", body = #body)
            },
            body,
        });
    }

    Ok(responses)
}

/// Collects the named schema types behind a body type. Generic wrappers such
/// as `Vec<T>` contribute their arguments instead of themselves.
fn collect_schema_types(ty: &Type, schema_types: &mut Vec<Type>) {
    let Type::Path(type_path) = ty else {
        return;
    };
    let Some(segment) = type_path.path.segments.last() else {
        return;
    };

    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => {
            for arg in &args.args {
                if let syn::GenericArgument::Type(inner) = arg {
                    collect_schema_types(inner, schema_types);
                }
            }
        }
        _ => schema_types.push(ty.clone()),
    }
}

/// Helper struct to parse utoipa_response attribute arguments
#[derive(Debug)]
struct UtoipaResponseArgs {
    status: Option<u16>,
    body: Type,
    description: Option<String>,
}

impl syn::parse::Parse for UtoipaResponseArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut status = None;
        let mut body = None;
        let mut description = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let _eq: syn::Token![=] = input.parse()?;

            match key.to_string().as_str() {
                "status" => {
                    let lit: LitInt = input.parse()?;
                    status = Some(lit.base10_parse::<u16>()?);
                }
                "body" => body = Some(input.parse()?),
                "description" => {
                    let lit: LitStr = input.parse()?;
                    description = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("Unknown argument: {}", other),
                    ));
                }
            }

            if !input.is_empty() {
                let _comma: syn::Token![,] = input.parse()?;
            }
        }

        let body = body.ok_or_else(|| input.error("missing `body = <Type>`"))?;

        Ok(UtoipaResponseArgs {
            status,
            body,
            description,
        })
    }
}

/// Macro for GET route
#[proc_macro_attribute]
pub fn get(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro("get", args, input)
}

/// Macro for POST route
#[proc_macro_attribute]
pub fn post(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro("post", args, input)
}

/// Macro for PUT route
#[proc_macro_attribute]
pub fn put(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro("put", args, input)
}

/// Macro for DELETE route
#[proc_macro_attribute]
pub fn delete(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro("delete", args, input)
}

/// Macro for PATCH route
#[proc_macro_attribute]
pub fn patch(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro("patch", args, input)
}

/// Documents one response of a handler. Chain several for several status
/// codes:
///
/// ```ignore
/// #[post("/pay")]
/// #[utoipa_response(status = 200, body = BalanceResponse, description = "Transfer done")]
/// #[utoipa_response(status = 404, body = ErrorBody, description = "Unknown recipient")]
/// async fn pay() -> Result<Json<BalanceResponse>, AppError> { /* ... */ }
/// ```
///
/// Read by `#[controller]`; the attribute itself is a pass-through.
#[proc_macro_attribute]
pub fn utoipa_response(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Documents the JSON request body type of a handler. Pass-through.
#[proc_macro_attribute]
pub fn request_body(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a handler as requiring a security scheme in the OpenAPI document.
/// Pass-through; enforcement is up to the handler's extractors.
#[proc_macro_attribute]
pub fn secured(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

// `#[controller]` expands first and reads the route attributes off the
// methods; by the time these run there is nothing left to do.
fn route_attr_macro(_method: &str, _args: TokenStream, input: TokenStream) -> TokenStream {
    input
}
