use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote, quote_spanned};
use std::path::Path;
use syn::spanned::Spanned;

/// Runs an async contract test and overwrites its markdown baseline with the
/// calls it made.
///
/// ```ignore
/// #[baseline_record_test("baselines/teams.md", configure)]
/// async fn lists_teams(session: &TestSession) {
///     session.client().get("/v1/teams", RequestOptions::new()).await.unwrap();
/// }
/// ```
#[proc_macro_attribute]
pub fn baseline_record_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    contract_test(attrs, item, quote! { ::api_contract::BaselineMode::Record })
}

/// Runs an async contract test and fails it when its calls differ from the
/// markdown baseline.
#[proc_macro_attribute]
pub fn baseline_compare_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    contract_test(attrs, item, quote! { ::api_contract::BaselineMode::Compare })
}

fn contract_test(
    attrs: TokenStream,
    item: TokenStream,
    mode: proc_macro2::TokenStream,
) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    match expand(&input, &args, mode) {
        Ok(stream) | Err(stream) => stream.into(),
    }
}

fn expand(
    input: &syn::ItemFn,
    args: &[syn::NestedMeta],
    mode: proc_macro2::TokenStream,
) -> Result<proc_macro2::TokenStream, proc_macro2::TokenStream> {
    if args.len() != 2 {
        return Err(quote! {
            compile_error!("A baseline path and a configuration function should be passed to the macro");
        });
    }

    let baseline_path = match &args[0] {
        syn::NestedMeta::Lit(syn::Lit::Str(path)) => {
            validate_baseline_path(path.value(), path.span())?;
            path.value()
        }
        other => {
            return Err(quote_spanned! {other.span()=>
                compile_error!("The first argument should be a string literal!");
            })
        }
    };

    let configure = match &args[1] {
        syn::NestedMeta::Meta(syn::Meta::Path(path)) => path,
        other => {
            return Err(quote_spanned! {other.span()=>
                compile_error!("The second argument should be a configuration function!");
            })
        }
    };

    let signature = &input.sig;
    if signature.asyncness.is_none() {
        return Err(quote_spanned! {signature.fn_token.span()=>
            compile_error!("Contract tests have to be async functions!");
        });
    }
    if signature.inputs.len() != 1 {
        return Err(quote_spanned! {signature.inputs.span()=>
            compile_error!("Contract tests take exactly one argument: the test session");
        });
    }

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let name = &signature.ident;
    let output = &signature.output;
    let block = &input.block;

    let mut body_signature = signature.clone();
    body_signature.ident = format_ident!("__contract_test_body");

    Ok(quote! {
        #(#attributes)*
        #[::tokio::test]
        #visibility async fn #name() #output {
            #body_signature #block

            let mut __contract_configuration =
                ::api_contract::ContractConfiguration::new(#mode, #baseline_path);
            #configure(&mut __contract_configuration);
            let __contract_session = ::api_contract::TestSession::start(__contract_configuration);

            let __contract_outcome = ::api_contract::__private::FutureExt::catch_unwind(
                ::std::panic::AssertUnwindSafe(__contract_test_body(&__contract_session)),
            )
            .await;

            match __contract_outcome {
                Ok(__contract_value) => {
                    if let Err(e) = __contract_session.finish().await {
                        panic!("contract baseline error: {}", e);
                    }
                    __contract_value
                }
                Err(__contract_panic) => ::std::panic::resume_unwind(__contract_panic),
            }
        }
    })
}

fn validate_baseline_path<P: AsRef<Path>>(
    path: P,
    span: Span,
) -> Result<(), proc_macro2::TokenStream> {
    if !path.as_ref().to_string_lossy().ends_with(".md") {
        return Err(quote_spanned! {span=>
            compile_error!("The path should point to a .md file!");
        });
    }

    Ok(())
}
