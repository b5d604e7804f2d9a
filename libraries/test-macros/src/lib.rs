use proc_macro::TokenStream;
use proc_macro2::Span;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote, quote_spanned};
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Error, Ident, ItemFn, LitStr, ReturnType,
};

/// Attribute macro `#[micro_test(suite)]`.
///
/// Registers the annotated function as test case `suite::<fn name>` by placing a
/// `TestRecord` for it in the `micro_tests` link section. The function must take
/// no arguments and return `micro_tests::TestResult`.
///
/// The suite may be given as an identifier or a string literal:
/// ```ignore
/// #[micro_test(base_tests)]
/// fn simple_assertion() -> TestResult {
///     ensure!(1 + 1 == 2);
///     pass!()
/// }
/// ```
#[proc_macro_attribute]
pub fn micro_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let suite = parse_macro_input!(attr as SuiteName);
    let func = parse_macro_input!(item as ItemFn);

    match expand_test(suite, func, facade_path()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct SuiteName(LitStr);

impl Parse for SuiteName {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Err(input.error("micro_test: expected a suite name, e.g. #[micro_test(my_suite)]"));
        }

        let lookahead = input.lookahead1();
        let suite = if lookahead.peek(LitStr) {
            input.parse::<LitStr>()?
        } else if lookahead.peek(Ident) {
            let ident = input.parse::<Ident>()?;
            LitStr::new(&ident.to_string(), ident.span())
        } else {
            return Err(lookahead.error());
        };

        if !input.is_empty() {
            return Err(input.error("micro_test: unexpected tokens after the suite name"));
        }

        if suite.value().is_empty() {
            return Err(Error::new(suite.span(), "micro_test: suite name must not be empty"));
        }

        Ok(SuiteName(suite))
    }
}

// Resolve the `micro-tests` crate path (handles dependency renames).
fn facade_path() -> syn::Path {
    match crate_name("micro-tests") {
        Ok(FoundCrate::Itself) => syn::parse_quote!(crate),
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            syn::parse_quote!(::#ident)
        }
        Err(_) => syn::parse_quote!(::micro_tests), // fallback
    }
}

fn check_signature(func: &ItemFn) -> syn::Result<()> {
    let sig = &func.sig;

    if !sig.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &sig.generics,
            "micro_test: generic functions are not supported",
        ));
    }
    if sig.asyncness.is_some() {
        return Err(Error::new_spanned(
            sig.asyncness,
            "micro_test: async functions are not supported (wrap in a sync function)",
        ));
    }
    if sig.constness.is_some() {
        return Err(Error::new_spanned(sig.constness, "micro_test: test function cannot be const"));
    }
    if sig.unsafety.is_some() {
        return Err(Error::new_spanned(sig.unsafety, "micro_test: test function cannot be unsafe"));
    }
    if !sig.inputs.is_empty() {
        return Err(Error::new_spanned(
            &sig.inputs,
            "micro_test: test function must have no parameters",
        ));
    }
    if let ReturnType::Default = sig.output {
        return Err(Error::new_spanned(
            &sig.ident,
            "micro_test: test function must return `TestResult`",
        ));
    }

    Ok(())
}

fn expand_test(suite: SuiteName, func: ItemFn, facade: syn::Path) -> syn::Result<proc_macro2::TokenStream> {
    check_signature(&func)?;

    let ident = &func.sig.ident;
    let suite = suite.0;
    let record = format_ident!("__micro_test_record_{}", ident);

    // `line!()`/`column!()` spanned on the identifier report where the test is declared
    let line = quote_spanned!(ident.span()=> ::core::line!());
    let column = quote_spanned!(ident.span()=> ::core::column!());

    Ok(quote! {
        #func

        #[doc(hidden)]
        const _: () = {
            #[used]
            #[doc(hidden)]
            #[allow(non_upper_case_globals)]
            #[cfg_attr(
                any(
                    target_os = "linux",
                    target_os = "android",
                    target_os = "freebsd",
                    target_os = "netbsd",
                    target_os = "openbsd",
                    target_os = "dragonfly",
                    target_os = "illumos",
                    target_os = "fuchsia",
                ),
                unsafe(link_section = "micro_tests")
            )]
            #[cfg_attr(
                any(target_os = "macos", target_os = "ios", target_os = "tvos", target_os = "watchos"),
                unsafe(link_section = "__DATA,__micro_tests,regular,no_dead_strip")
            )]
            static #record: #facade::__private::TestRecord = #facade::__private::TestRecord::new(
                #facade::__private::TestDesc {
                    suite: #suite,
                    name: ::core::stringify!(#ident),
                    function_name: ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)),
                    source_file: ::core::file!(),
                    position: #facade::__private::SourcePosition {
                        line: #line,
                        column: #column,
                    },
                    func: #ident,
                },
            );
        };
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(attr: proc_macro2::TokenStream, item: proc_macro2::TokenStream) -> syn::Result<String> {
        let suite = syn::parse2::<SuiteName>(attr)?;
        let func = syn::parse2::<ItemFn>(item)?;

        expand_test(suite, func, syn::parse_quote!(::micro_tests)).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_expansion_registers_record() {
        let output = expand(
            quote!(base_tests),
            quote! {
                fn simple_assertion() -> TestResult { Ok(()) }
            },
        )
        .unwrap();

        assert!(output.contains("fn simple_assertion"));
        assert!(output.contains("__micro_test_record_simple_assertion"));
        assert!(output.contains("link_section = \"micro_tests\""));
        assert!(output.contains("suite : \"base_tests\""));
        assert!(output.contains("TestRecord :: new"));
    }

    #[test]
    fn test_suite_as_string_literal() {
        let output = expand(quote!("base tests"), quote!(fn t() -> TestResult { Ok(()) })).unwrap();

        assert!(output.contains("suite : \"base tests\""));
    }

    #[test]
    fn test_missing_suite_is_rejected() {
        assert!(syn::parse2::<SuiteName>(quote!()).is_err());
        assert!(syn::parse2::<SuiteName>(quote!("")).is_err());
        assert!(syn::parse2::<SuiteName>(quote!(a, b)).is_err());
        assert!(syn::parse2::<SuiteName>(quote!(42)).is_err());
    }

    #[test]
    fn test_bad_signatures_are_rejected() {
        let cases = [
            (quote!(async fn t() -> TestResult { Ok(()) }), "async"),
            (quote!(const fn t() -> TestResult { Ok(()) }), "const"),
            (quote!(unsafe fn t() -> TestResult { Ok(()) }), "unsafe"),
            (quote!(fn t<T>() -> TestResult { Ok(()) }), "generic"),
            (quote!(fn t(x: u32) -> TestResult { Ok(()) }), "parameters"),
            (quote!(fn t() {}), "TestResult"),
        ];

        for (item, expected) in cases {
            let err = expand(quote!(suite), item).unwrap_err();
            assert!(err.to_string().contains(expected), "{} does not mention {}", err, expected);
        }
    }
}
