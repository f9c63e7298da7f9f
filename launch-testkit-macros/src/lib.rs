//! Procedural macros for launch-testkit
//!
//! This crate provides the `#[launch_testkit::test]` attribute macro for
//! writing async tests that observe background work.
//!
//! # Example
//!
//! ```rust,ignore
//! use launch_testkit::prelude::*;
//!
//! #[launch_testkit::test(join_on_exit = true)]
//! async fn my_test(launcher: RecordingLauncher) {
//!     launcher.launch(None, async {});
//!     assert_eq!(launcher.call_count(), 1);
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, FnArg, Ident, ItemFn, Lit, Pat, Token, Type,
};

/// Configuration options for the test macro.
#[derive(Default)]
struct TestConfig {
    /// Which async runtime to use ("tokio" or "async-std")
    runtime: Option<String>,
    /// Flavor for tokio runtime ("current_thread" or "multi_thread")
    flavor: Option<String>,
    /// Forward requested priorities to the runtime
    forward_priority: bool,
    /// Join strategy ("notify" or "yield")
    join: Option<String>,
    /// Await `launcher.join()` after the test body
    join_on_exit: bool,
}

impl Parse for TestConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = TestConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let lit: Lit = input.parse()?;

            match (ident.to_string().as_str(), lit) {
                ("runtime", Lit::Str(s)) => config.runtime = Some(s.value()),
                ("flavor", Lit::Str(s)) => config.flavor = Some(s.value()),
                ("join", Lit::Str(s)) => config.join = Some(s.value()),
                ("forward_priority", Lit::Bool(b)) => config.forward_priority = b.value(),
                ("join_on_exit", Lit::Bool(b)) => config.join_on_exit = b.value(),
                ("runtime" | "flavor" | "join", other) => {
                    return Err(syn::Error::new_spanned(other, "expected a string literal"));
                }
                ("forward_priority" | "join_on_exit", other) => {
                    return Err(syn::Error::new_spanned(other, "expected `true` or `false`"));
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(config)
    }
}

/// Determines if a function parameter is requesting a RecordingLauncher.
fn is_launcher_param(arg: &FnArg) -> bool {
    if let FnArg::Typed(pat_type) = arg {
        if let Type::Path(type_path) = &*pat_type.ty {
            if let Some(segment) = type_path.path.segments.last() {
                return segment.ident == "RecordingLauncher";
            }
        }
    }
    false
}

/// Extracts the parameter name from a function argument.
fn get_param_name(arg: &FnArg) -> Option<&Pat> {
    if let FnArg::Typed(pat_type) = arg {
        Some(&pat_type.pat)
    } else {
        None
    }
}

/// Test attribute macro for async tests that launch background work.
///
/// # Basic Usage
///
/// ```rust,ignore
/// #[launch_testkit::test]
/// async fn test_basic() {
///     // Test runs with tokio by default
/// }
/// ```
///
/// # With RecordingLauncher Injection
///
/// Add a `launcher: RecordingLauncher` parameter to receive a fresh
/// recording launcher for the selected runtime:
///
/// ```rust,ignore
/// #[launch_testkit::test]
/// async fn test_with_launcher(launcher: RecordingLauncher) {
///     launcher.launch(None, async {});
///     launcher.join().await;
///     assert_eq!(launcher.completed(), 1);
/// }
/// ```
///
/// # Configuration Options
///
/// - `runtime = "tokio"` or `runtime = "async-std"` - Select the async runtime
/// - `flavor = "multi_thread"` - Tokio runtime flavor
/// - `forward_priority = true` - Pass requested priorities to the runtime
/// - `join = "yield"` - Join by yielding instead of parking
/// - `join_on_exit = true` - Await `join()` after the body returns
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as TestConfig);
    let input = parse_macro_input!(item as ItemFn);

    expand_test(config, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(config: TestConfig, input: ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;
    let output = &input.sig.output;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;

    // Check if function is async
    if input.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "test function must be async",
        ));
    }

    let runtime = config.runtime.as_deref().unwrap_or("tokio");
    let flavor = config.flavor.as_deref().unwrap_or("current_thread");

    let spawner_ty = match runtime {
        "tokio" => quote! { ::launch_testkit::runtime::TokioSpawner },
        "async-std" => quote! { ::launch_testkit::runtime::AsyncStdSpawner },
        _ => {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                format!("unsupported runtime: {runtime}. Use \"tokio\" or \"async-std\""),
            ));
        }
    };

    // Generate launcher initialization
    let launcher_param_name = input
        .sig
        .inputs
        .iter()
        .find(|arg| is_launcher_param(arg))
        .and_then(get_param_name);

    let launcher_init = match launcher_param_name {
        Some(launcher_name) => {
            let forward = config.forward_priority.then(|| quote! { .forward_priority() });
            let join = match config.join.as_deref() {
                None | Some("notify") => None,
                Some("yield") => Some(quote! { .yield_join() }),
                Some(other) => {
                    return Err(syn::Error::new(
                        proc_macro2::Span::call_site(),
                        format!("unsupported join strategy: {other}. Use \"notify\" or \"yield\""),
                    ));
                }
            };
            quote! {
                let #launcher_name = ::launch_testkit::RecordingLauncher::with_config(
                    <#spawner_ty>::new(),
                    ::launch_testkit::RecordingConfig::new() #forward #join,
                );
            }
        }
        None => quote! {},
    };

    // Optionally join outstanding work after the body. The body runs as an
    // inner fn so its declared return type drives `?` conversions.
    let test_body = match (config.join_on_exit, launcher_param_name) {
        (true, Some(launcher_name)) => quote! {
            async fn __launch_testkit_body(
                #launcher_name: ::launch_testkit::RecordingLauncher<#spawner_ty>,
            ) #output #body

            let __launch_testkit_output = __launch_testkit_body(#launcher_name.clone()).await;
            #launcher_name.join().await;
            __launch_testkit_output
        },
        (true, None) => {
            return Err(syn::Error::new_spanned(
                &input.sig,
                "join_on_exit requires a `RecordingLauncher` parameter",
            ));
        }
        (false, _) => quote! { #body },
    };

    let runtime_attr = match (runtime, flavor) {
        ("tokio", "multi_thread") => quote! { #[::tokio::test(flavor = "multi_thread")] },
        ("tokio", _) => quote! { #[::tokio::test] },
        _ => quote! { #[::async_std::test] },
    };

    Ok(quote! {
        #runtime_attr
        #(#attrs)*
        #vis async fn #name() #output {
            #launcher_init
            #test_body
        }
    })
}
