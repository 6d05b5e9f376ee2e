//! Deferred render regions for streamed HTML pages
//!
//! A page using `Suspense` is sent as two body chunks:
//!
//! 1. the shell, containing the boundary element with the fallback inside;
//! 2. once the content future resolves, a `<template>` with the content and
//!    an inline script moving it into the boundary, followed by the tail.
//!
//! The shell never waits on the content future. If the client goes away the
//! body stream is dropped and the pending content future with it.

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};
use futures::{future, stream, Future, StreamExt};
use maud::{html, Markup, PreEscaped};
use std::convert::Infallible;

/// A region whose content is rendered after the page shell has been sent
pub struct Suspense<F> {
    boundary_id: String,
    fallback: Markup,
    content: F,
}

impl<F> Suspense<F>
where
    F: Future<Output = Markup> + Send + 'static,
{
    pub fn new(boundary_id: impl Into<String>, fallback: Markup, content: F) -> Self {
        Self {
            boundary_id: boundary_id.into(),
            fallback,
            content,
        }
    }

    /// Boundary element to place inside the shell
    pub fn boundary(&self) -> Markup {
        html! {
            div id=(self.boundary_id) data-suspense="pending" aria-busy="true" {
                (self.fallback)
            }
        }
    }

    /// Stream `shell`, then the resolved content followed by `tail`
    pub fn into_body(self, shell: Markup, tail: Markup) -> Body {
        let Suspense {
            boundary_id,
            content,
            ..
        } = self;

        let first = stream::once(future::ready(Ok::<_, Infallible>(shell.into_string())));
        let second = stream::once(async move {
            let resolved = content.await;
            Ok::<_, Infallible>(resolved_chunk(&boundary_id, resolved, tail).into_string())
        });

        Body::from_stream(first.chain(second))
    }

    /// Streamed `text/html` response
    pub fn into_response(self, shell: Markup, tail: Markup) -> Response {
        (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            self.into_body(shell, tail),
        )
            .into_response()
    }
}

fn resolved_chunk(boundary_id: &str, content: Markup, tail: Markup) -> Markup {
    let template_id = format!("{}-content", boundary_id);
    html! {
        template id=(template_id) { (content) }
        script { (PreEscaped(swap_script(boundary_id, &template_id))) }
        (tail)
    }
}

/// Script replacing the boundary's children with the template contents
fn swap_script(boundary_id: &str, template_id: &str) -> String {
    format!(
        concat!(
            "(function(){{",
            "var b=document.getElementById({b}),t=document.getElementById({t});",
            "if(!b||!t)return;",
            "b.replaceChildren(t.content.cloneNode(true));",
            "b.setAttribute(\"data-suspense\",\"resolved\");",
            "b.removeAttribute(\"aria-busy\");",
            "t.remove();",
            "}})();"
        ),
        b = js_string(boundary_id),
        t = js_string(template_id),
    )
}

/// JSON string literal safe to embed in an inline script
pub(crate) fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string().replace('<', "\\u003c")
}
