use quote::ToTokens;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;

pub const RENAME: &str = "rename";
pub const RENAME_ALL: &str = "rename_all";
pub const SELECTOR: &str = "selector";
pub const SKIP: &str = "skip";

pub struct Container<'a> {
    pub ident: syn::Ident,

    pub attrs: attr::Container,
    pub fields: Vec<Field<'a>>,
    pub generics: &'a syn::Generics,
}

pub struct Field<'a> {
    pub ident: syn::Ident,

    pub attrs: attr::Field,
    pub ty: &'a syn::Type,
}

impl<'a> Container<'a> {
    pub fn from(input: &'a syn::DeriveInput) -> Result<Container<'a>, Vec<syn::Error>> {
        let mut errors: Vec<syn::Error> = vec![];
        let attrs = match attr::Container::from(input) {
            Ok(attrs) => Some(attrs),
            Err(errs) => {
                errors.extend(errs);
                None
            }
        };
        let fields = match &input.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(fields),
                ..
            }) => match fields_from(&fields.named) {
                Ok(fields) => Some(fields),
                Err(errs) => {
                    errors.extend(errs);
                    None
                }
            },
            _ => {
                errors.push(syn::Error::new_spanned(
                    input.into_token_stream(),
                    "#[derive(Selector)] can only be derived on structs with named fields",
                ));
                None
            }
        };

        match (attrs, fields) {
            (Some(attrs), Some(fields)) if errors.is_empty() => Ok(Container {
                ident: input.ident.clone(),
                attrs,
                fields,
                generics: &input.generics,
            }),
            _ => Err(errors),
        }
    }
}

fn fields_from(
    fields: &Punctuated<syn::Field, Token![,]>,
) -> Result<Vec<Field<'_>>, Vec<syn::Error>> {
    let mut errors: Vec<syn::Error> = vec![];
    let fields = fields
        .iter()
        .filter_map(|f| {
            let attrs = match attr::Field::from(f) {
                Ok(attrs) => attrs,
                Err(errs) => {
                    errors.extend(errs);
                    return None;
                }
            };
            Some(Field {
                ident: f.ident.clone()?,
                attrs,
                ty: &f.ty,
            })
        })
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(fields)
}

impl<'a> Field<'a> {
    /// The key this field is stored under.
    pub fn key(&self, rule: Option<attr::RenameRule>) -> String {
        if let Some(rename) = &self.attrs.rename {
            return rename.clone();
        }
        let name = self.ident.unraw().to_string();
        match rule {
            Some(rule) => rule.apply(&name),
            None => name,
        }
    }
}

pub mod attr {
    use super::*;

    use inflector::cases::camelcase::to_camel_case;
    use inflector::cases::kebabcase::to_kebab_case;
    use inflector::cases::pascalcase::to_pascal_case;
    use inflector::cases::screamingsnakecase::to_screaming_snake_case;
    use inflector::cases::snakecase::to_snake_case;
    use syn::meta::ParseNestedMeta;

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum RenameRule {
        Camel,
        Kebab,
        Pascal,
        ScreamingSnake,
        Snake,
    }

    impl std::str::FromStr for RenameRule {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "camelCase" => Ok(Self::Camel),
                "kebab-case" => Ok(Self::Kebab),
                "PascalCase" => Ok(Self::Pascal),
                "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
                "snake_case" => Ok(Self::Snake),
                _ => Err(format!("unknown `rename_all` rule {}", s)),
            }
        }
    }

    impl RenameRule {
        pub fn apply(self, name: &str) -> String {
            match self {
                Self::Camel => to_camel_case(name),
                Self::Kebab => to_kebab_case(name),
                Self::Pascal => to_pascal_case(name),
                Self::ScreamingSnake => to_screaming_snake_case(name),
                Self::Snake => to_snake_case(name),
            }
        }
    }

    pub struct Container {
        pub rename_all: Option<RenameRule>,
    }
    pub struct Field {
        pub rename: Option<String>,
        pub skip: bool,
    }

    impl Container {
        pub fn from(item: &syn::DeriveInput) -> Result<Self, Vec<syn::Error>> {
            let mut errors: Vec<syn::Error> = Vec::new();

            let mut rename_all = None;

            for attr in &item.attrs {
                if !attr.path().is_ident(SELECTOR) {
                    continue;
                }

                if let syn::Meta::List(meta) = &attr.meta {
                    if meta.tokens.is_empty() {
                        continue;
                    }
                }

                if let Err(err) = attr.parse_nested_meta(|meta| {
                    // Parse `#[selector(rename_all = "camelCase")]`
                    if meta.path.is_ident(RENAME_ALL) {
                        let s = get_lit_str(RENAME_ALL, &meta)?;
                        match str::parse::<RenameRule>(&s.value()) {
                            Ok(rule) => rename_all = Some(rule),
                            Err(e) => errors.push(syn::Error::new_spanned(s, e)),
                        }
                    } else {
                        let path = meta.path.to_token_stream().to_string().replace(' ', "");
                        return Err(syn::Error::new_spanned(
                            meta.path,
                            format!("unknown selector container attribute `{}`", path),
                        ));
                    }
                    Ok(())
                }) {
                    errors.push(err);
                }
            }

            if !errors.is_empty() {
                return Err(errors);
            }
            Ok(Container { rename_all })
        }
    }

    impl Field {
        pub fn from(field: &syn::Field) -> Result<Self, Vec<syn::Error>> {
            let mut errors: Vec<syn::Error> = Vec::new();

            let mut rename = None;
            let mut skip = false;

            for attr in &field.attrs {
                if !attr.path().is_ident(SELECTOR) {
                    continue;
                }

                if let syn::Meta::List(meta) = &attr.meta {
                    if meta.tokens.is_empty() {
                        continue;
                    }
                }

                if let Err(err) = attr.parse_nested_meta(|meta| {
                    // Parse `#[selector(rename = "foo")]`
                    if meta.path.is_ident(RENAME) {
                        let s = get_lit_str(RENAME, &meta)?;
                        if s.value().is_empty() {
                            return Err(syn::Error::new_spanned(s, "keys cannot be empty"));
                        }
                        rename = Some(s.value());
                    // Parse `#[selector(skip)]`
                    } else if meta.path.is_ident(SKIP) {
                        skip = true;
                    } else {
                        let path = meta.path.to_token_stream().to_string().replace(' ', "");
                        return Err(syn::Error::new_spanned(
                            meta.path,
                            format!("unknown selector field attribute `{}`", path),
                        ));
                    }
                    Ok(())
                }) {
                    errors.push(err);
                }
            }

            if !errors.is_empty() {
                return Err(errors);
            }
            Ok(Field { rename, skip })
        }
    }

    pub fn get_lit_str(
        attr_name: &'static str,
        meta: &ParseNestedMeta,
    ) -> Result<syn::LitStr, syn::Error> {
        let expr: syn::Expr = meta.value()?.parse()?;
        let mut value = &expr;
        while let syn::Expr::Group(e) = value {
            value = &e.expr;
        }
        if let syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) = value
        {
            let suffix = lit.suffix();
            if !suffix.is_empty() {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("unexpected suffix `{}` on string literal", suffix),
                ));
            }
            Ok(lit.clone())
        } else {
            Err(syn::Error::new_spanned(
                expr,
                format!(
                    "expected selector {} attribute to be a string: `{} = \"...\"`",
                    attr_name, attr_name
                ),
            ))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn rename_rules() {
            let rule: RenameRule = "camelCase".parse().unwrap();
            assert_eq!(rule.apply("created_at"), "createdAt");
            let rule: RenameRule = "PascalCase".parse().unwrap();
            assert_eq!(rule.apply("created_at"), "CreatedAt");
            let rule: RenameRule = "kebab-case".parse().unwrap();
            assert_eq!(rule.apply("created_at"), "created-at");
            let rule: RenameRule = "SCREAMING_SNAKE_CASE".parse().unwrap();
            assert_eq!(rule.apply("created_at"), "CREATED_AT");
            assert!("lowercase".parse::<RenameRule>().is_err());
        }
    }
}
