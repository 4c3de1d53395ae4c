use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{Error, Expr, Ident, LitStr, Result, Token};

pub(crate) struct SqlInput {
    format: LitStr,
    positional: Vec<Expr>,
    named: Vec<(Ident, Expr)>,
}

impl Parse for SqlInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let format: LitStr = input.parse()?;
        let mut positional = Vec::new();
        let mut named: Vec<(Ident, Expr)> = Vec::new();

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }

            if input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![==]) {
                let name: Ident = input.parse()?;
                input.parse::<Token![=]>()?;
                let expr: Expr = input.parse()?;
                if named.iter().any(|(n, _)| *n == name) {
                    return Err(Error::new(
                        name.span(),
                        format!("duplicate argument named `{name}`"),
                    ));
                }
                named.push((name, expr));
            } else {
                if !named.is_empty() {
                    return Err(input.error("positional arguments must come before named arguments"));
                }
                positional.push(input.parse()?);
            }
        }

        Ok(Self {
            format,
            positional,
            named,
        })
    }
}

/// A piece of the scanned format string.
#[derive(Debug, PartialEq)]
enum Piece {
    Literal(String),
    Placeholder { body: String, format: Option<String> },
}

/// Where a placeholder's value comes from.
enum Source {
    /// Index into the macro arguments (positional first, then named).
    Arg(usize),
    /// An expression written inside the braces.
    Inline(Expr),
}

enum Step {
    Literal(String),
    Value(Source, Option<String>),
}

pub(crate) fn expand(input: SqlInput) -> Result<TokenStream> {
    let span = input.format.span();
    let pieces = scan(&input.format.value(), span)?;

    let positional_count = input.positional.len();
    let names: Vec<Ident> = input.named.iter().map(|(n, _)| n.clone()).collect();
    let args: Vec<Expr> = input
        .positional
        .into_iter()
        .chain(input.named.into_iter().map(|(_, e)| e))
        .collect();

    let mut uses = vec![0usize; args.len()];
    let mut next_positional = 0;
    let mut steps = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let (body, format) = match piece {
            Piece::Literal(text) => {
                steps.push(Step::Literal(text));
                continue;
            }
            Piece::Placeholder { body, format } => (body, format),
        };

        let source = if body.is_empty() {
            if next_positional >= positional_count {
                return Err(Error::new(
                    span,
                    format!(
                        "placeholder {{}} number {} has no matching positional argument",
                        next_positional + 1
                    ),
                ));
            }
            next_positional += 1;
            Source::Arg(next_positional - 1)
        } else if positional_count > 0 && body.bytes().all(|b| b.is_ascii_digit()) {
            let index: usize = body
                .parse()
                .map_err(|_| Error::new(span, format!("invalid argument index `{body}`")))?;
            if index >= positional_count {
                return Err(Error::new(
                    span,
                    format!(
                        "invalid reference to positional argument {index} ({positional_count} given)"
                    ),
                ));
            }
            Source::Arg(index)
        } else if let Some(i) = names.iter().position(|n| n == body.as_str()) {
            Source::Arg(positional_count + i)
        } else {
            let expr: Expr = syn::parse_str(&body).map_err(|e| {
                Error::new(span, format!("invalid expression `{body}` in placeholder: {e}"))
            })?;
            Source::Inline(expr)
        };

        if let Source::Arg(i) = source {
            uses[i] += 1;
        }
        steps.push(Step::Value(source, format));
    }

    if let Some(unused) = uses.iter().position(|&n| n == 0) {
        let message = if unused >= positional_count {
            format!(
                "named argument `{}` is never used",
                names[unused - positional_count]
            )
        } else {
            "argument never used".to_string()
        };
        return Err(Error::new_spanned(&args[unused], message));
    }

    let bindings = args.iter().enumerate().map(|(i, expr)| {
        let ident = format_ident!("__sqlstitch_arg{}", i);
        quote! { let #ident = #expr; }
    });

    let capacity = steps.len();
    let mut remaining = uses;
    let pushes: Vec<TokenStream> = steps
        .into_iter()
        .map(|step| match step {
            Step::Literal(text) => quote! { __sqlstitch_template.push_literal(#text); },
            Step::Value(source, format) => {
                let value = match source {
                    Source::Arg(i) => {
                        let ident = format_ident!("__sqlstitch_arg{}", i);
                        remaining[i] -= 1;
                        // The last use moves; earlier uses clone.
                        if remaining[i] == 0 {
                            quote! { #ident }
                        } else {
                            quote! { ::core::clone::Clone::clone(&#ident) }
                        }
                    }
                    Source::Inline(expr) => quote! { #expr },
                };
                let format = match format {
                    Some(f) => quote! {
                        ::core::option::Option::Some(::std::borrow::Cow::Borrowed(#f))
                    },
                    None => quote! { ::core::option::Option::None },
                };
                quote! {
                    __sqlstitch_template.push_arg(::sqlstitch::IntoArg::into_arg(#value), #format);
                }
            }
        })
        .collect();

    Ok(quote! {{
        #(#bindings)*
        #[allow(unused_mut)]
        let mut __sqlstitch_template = ::sqlstitch::Template::with_capacity(#capacity);
        #(#pushes)*
        __sqlstitch_template
    }})
}

/// Split a format string into literal text and placeholders.
fn scan(src: &str, span: Span) -> Result<Vec<Piece>> {
    let chars: Vec<char> = src.chars().collect();
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '{' if chars.get(i + 1) == Some(&'{') => {
                literal.push('{');
                i += 2;
            }
            '{' => {
                let mut body = String::new();
                let mut depth = 0usize;
                i += 1;
                loop {
                    let Some(&c) = chars.get(i) else {
                        return Err(Error::new(
                            span,
                            "unterminated placeholder in format string: expected `}`",
                        ));
                    };
                    if let Some(end) = literal_end(&chars, i) {
                        body.extend(&chars[i..end]);
                        i = end;
                        continue;
                    }
                    i += 1;
                    match c {
                        '}' if depth == 0 => break,
                        '}' => depth -= 1,
                        '{' => depth += 1,
                        _ => {}
                    }
                    body.push(c);
                }

                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                let (expr, format) = split_format(&body);
                pieces.push(Piece::Placeholder {
                    body: expr.trim().to_string(),
                    format: format
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string),
                });
            }
            '}' if chars.get(i + 1) == Some(&'}') => {
                literal.push('}');
                i += 2;
            }
            '}' => {
                return Err(Error::new(
                    span,
                    "unmatched `}` in format string; use `}}` for a literal brace",
                ));
            }
            c => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

/// If a string or char literal starts at `start`, the index just past it.
///
/// A `'` that does not close as a char literal is a lifetime or label.
fn literal_end(chars: &[char], start: usize) -> Option<usize> {
    match chars[start] {
        '"' => {
            let mut i = start + 1;
            while i < chars.len() {
                match chars[i] {
                    '\\' => i += 2,
                    '"' => return Some(i + 1),
                    _ => i += 1,
                }
            }
            None
        }
        '\'' => match chars.get(start + 1) {
            Some('\\') => (start + 3..chars.len())
                .find(|&i| chars[i] == '\'')
                .map(|i| i + 1),
            Some(_) if chars.get(start + 2) == Some(&'\'') => Some(start + 3),
            _ => None,
        },
        _ => None,
    }
}

/// Split `expr:format` on the last top-level `:` that is not part of `::`
/// and not inside a string or char literal.
fn split_format(body: &str) -> (&str, Option<&str>) {
    let (offsets, chars): (Vec<usize>, Vec<char>) = body.char_indices().unzip();
    let mut depth = 0i32;
    let mut split = None;
    let mut i = 0;

    while i < chars.len() {
        if let Some(end) = literal_end(&chars, i) {
            i = end;
            continue;
        }
        match chars[i] {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ':' if depth == 0 => {
                let prev = i.checked_sub(1).map(|j| chars[j]);
                let next = chars.get(i + 1).copied();
                if prev != Some(':') && next != Some(':') {
                    split = Some(offsets[i]);
                }
            }
            _ => {}
        }
        i += 1;
    }

    match split {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(body: &str, format: Option<&str>) -> Piece {
        Piece::Placeholder {
            body: body.to_string(),
            format: format.map(str::to_string),
        }
    }

    #[test]
    fn scan_splits_literals_and_placeholders() {
        let pieces = scan("WHERE Id = {id} AND T = {table:raw}", Span::call_site()).unwrap();
        assert_eq!(
            pieces,
            vec![
                Piece::Literal("WHERE Id = ".to_string()),
                placeholder("id", None),
                Piece::Literal(" AND T = ".to_string()),
                placeholder("table", Some("raw")),
            ]
        );
    }

    #[test]
    fn scan_unescapes_braces() {
        let pieces = scan("'{{}}' {}", Span::call_site()).unwrap();
        assert_eq!(
            pieces,
            vec![Piece::Literal("'{}' ".to_string()), placeholder("", None)]
        );
    }

    #[test]
    fn scan_rejects_unbalanced_braces() {
        assert!(scan("Id = {id", Span::call_site()).is_err());
        assert!(scan("Id = }", Span::call_site()).is_err());
    }

    #[test]
    fn split_format_ignores_paths() {
        assert_eq!(split_format("a::b"), ("a::b", None));
        assert_eq!(split_format("a::b:raw"), ("a::b", Some("raw")));
        assert_eq!(split_format("f(x:y)"), ("f(x:y)", None));
    }

    #[test]
    fn literals_inside_placeholders_are_opaque() {
        let pieces = scan(r#"At = {"12:30"} AND C = {'}'} AND D = {"{x}":raw}"#, Span::call_site())
            .unwrap();
        assert_eq!(
            pieces,
            vec![
                Piece::Literal("At = ".to_string()),
                placeholder(r#""12:30""#, None),
                Piece::Literal(" AND C = ".to_string()),
                placeholder("'}'", None),
                Piece::Literal(" AND D = ".to_string()),
                placeholder(r#""{x}""#, Some("raw")),
            ]
        );
    }

    #[test]
    fn split_format_skips_literals() {
        assert_eq!(split_format(r#""a:b""#), (r#""a:b""#, None));
        assert_eq!(split_format(r#""a\":b":raw"#), (r#""a\":b""#, Some("raw")));
        assert_eq!(split_format("':':raw"), ("':'", Some("raw")));
        assert_eq!(split_format(r"'\'':raw"), (r"'\''", Some("raw")));
    }

    #[test]
    fn expand_accepts_colon_in_string_literal() {
        let input: SqlInput = syn::parse_str(r#""At = {\"12:30\"}""#).unwrap();
        let tokens = expand(input).unwrap().to_string();
        assert!(tokens.contains("\"12:30\""));
    }

    #[test]
    fn parse_named_and_positional_args() {
        let input: SqlInput = syn::parse_str(r#""{} {x}", a + 1, x = b == c"#).unwrap();
        assert_eq!(input.positional.len(), 1);
        assert_eq!(input.named.len(), 1);
        assert_eq!(input.named[0].0, "x");
    }

    #[test]
    fn expand_reports_unused_and_missing_args() {
        let unused: SqlInput = syn::parse_str(r#""Id = 1", x"#).unwrap();
        assert!(expand(unused).is_err());

        let missing: SqlInput = syn::parse_str(r#""{} {}", x"#).unwrap();
        assert!(expand(missing).is_err());

        let out_of_range: SqlInput = syn::parse_str(r#""{1}", x"#).unwrap();
        assert!(expand(out_of_range).is_err());
    }

    #[test]
    fn digits_are_literals_without_positional_args() {
        let input: SqlInput = syn::parse_str(r#""Id = {10}""#).unwrap();
        let tokens = expand(input).unwrap().to_string();
        assert!(tokens.contains("10"));
        assert!(!tokens.contains("__sqlstitch_arg"));
    }
}
