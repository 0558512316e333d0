use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Derives the component registry traits for a payload type.
///
/// Generates a process-wide `type_index` (cached in a `OnceLock`) and a
/// `Component` impl with the default `on_removed` hook. Types that need a
/// custom removal finalizer implement `Component` by hand instead.
#[proc_macro_derive(Component)]
pub fn component_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    let gen = quote! {
        // Use absolute paths that work both inside and outside the crate
        impl ::groupset_ecs::component::Registered for #name {
            fn type_index() -> usize {
                static TYPE_INDEX: ::std::sync::OnceLock<usize> = ::std::sync::OnceLock::new();

                *TYPE_INDEX.get_or_init(|| ::groupset_ecs::component::next_type_index())
            }
        }

        impl ::groupset_ecs::component::Component for #name {}
    };

    gen.into()
}

/// Derives the registry traits for a zero-payload flag component.
///
/// Identical expansion to `derive(Component)`; the separate name documents
/// that the type exists only to gate filtered iteration.
#[proc_macro_derive(Tag)]
pub fn tag_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    let gen = quote! {
        impl ::groupset_ecs::component::Registered for #name {
            fn type_index() -> usize {
                static TYPE_INDEX: ::std::sync::OnceLock<usize> = ::std::sync::OnceLock::new();

                *TYPE_INDEX.get_or_init(|| ::groupset_ecs::component::next_type_index())
            }
        }

        impl ::groupset_ecs::component::Component for #name {}
    };

    gen.into()
}
