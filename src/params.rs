//! ApiParam trees: the documentation view of parameters and their fields.

use crate::mock::{field_mock, parse_literal, primitive_value, terminal_placeholder, value_to_string, MockSynthesizer, RecursionContext};
use crate::taxonomy::BindingKind;
use crate::type_resolver::{field_in_groups, field_required, TypeKind, TypeRef, TypeResolver};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One documented parameter or field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParam {
    /// Sequential from 1 within its list
    pub id: u32,
    pub field: String,
    #[serde(rename = "type")]
    pub type_label: String,
    pub required: bool,
    pub binding: BindingKind,
    pub value: String,
    pub desc: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ApiParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_info: Option<EnumInfo>,
    /// Set for arrays of files
    #[serde(default)]
    pub has_items: bool,
    /// Set for globally configured parameters
    #[serde(default)]
    pub config_param: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumInfo {
    pub name: String,
    pub items: Vec<EnumItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumItem {
    pub name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
}

impl ApiParam {
    pub fn new(field: impl Into<String>, type_label: impl Into<String>, binding: BindingKind) -> Self {
        Self {
            id: 0,
            field: field.into(),
            type_label: type_label.into(),
            required: false,
            binding,
            value: String::new(),
            desc: String::new(),
            children: Vec::new(),
            enum_values: Vec::new(),
            enum_info: None,
            has_items: false,
            config_param: false,
        }
    }
}

/// Assign ids 1..n to a list and, independently, to every child list
pub fn renumber(params: &mut [ApiParam]) {
    for (idx, param) in params.iter_mut().enumerate() {
        param.id = idx as u32 + 1;
        renumber(&mut param.children);
    }
}

/// First paragraph of a doc comment, trimmed
pub fn short_desc(comment: Option<&str>) -> String {
    comment
        .map(|c| c.split("\n\n").next().unwrap_or(c).trim().to_string())
        .unwrap_or_default()
}

/// Builds ApiParam trees mirroring what the synthesizer produces
pub struct ParamTreeBuilder<'a> {
    resolver: &'a TypeResolver<'a>,
    synthesizer: MockSynthesizer<'a>,
    recursion_limit: usize,
}

impl<'a> ParamTreeBuilder<'a> {
    pub fn new(resolver: &'a TypeResolver<'a>, recursion_limit: usize) -> Self {
        Self {
            resolver,
            synthesizer: MockSynthesizer::new(resolver),
            recursion_limit,
        }
    }

    /// Parameters documenting a whole payload type.
    ///
    /// Composite types (or collections/maps of them) are flattened into their
    /// fields; anything else is one parameter named `root_name`.
    pub fn tree_for(&self, root_name: &str, ty: &TypeRef, binding: BindingKind, groups: &[String]) -> Vec<ApiParam> {
        let mut ctx = RecursionContext::new(self.recursion_limit);
        let mut params = match self.composite_of(ty) {
            Some(composite) => self.fields(&composite, binding, groups, &mut ctx),
            None => vec![self.leaf(root_name, ty, binding, groups, &mut ctx)],
        };
        renumber(&mut params);
        params
    }

    /// A single parameter with children when its type is composite
    pub fn param(&self, name: &str, ty: &TypeRef, binding: BindingKind, groups: &[String]) -> ApiParam {
        let mut ctx = RecursionContext::new(self.recursion_limit);
        let mut param = self.leaf(name, ty, binding, groups, &mut ctx);
        renumber(&mut param.children);
        param
    }

    /// The composite type whose fields document `ty`, if any
    fn composite_of(&self, ty: &TypeRef) -> Option<TypeRef> {
        match self.resolver.classify(ty) {
            TypeKind::Object => Some(self.resolver.unwrap(ty)),
            TypeKind::Collection(element) | TypeKind::Array(element) => self.composite_of(&element),
            TypeKind::Map(_, value) => self.composite_of(&value),
            _ => None,
        }
    }

    fn leaf(&self, name: &str, ty: &TypeRef, binding: BindingKind, groups: &[String], ctx: &mut RecursionContext) -> ApiParam {
        let mut param = ApiParam::new(name, self.resolver.type_label(ty), binding);
        let kind = self.resolver.classify(ty);
        param.value = match &kind {
            TypeKind::Primitive(p) => value_to_string(&primitive_value(*p, name)),
            TypeKind::Enum | TypeKind::Collection(_) | TypeKind::Array(_) => {
                let mut scratch = RecursionContext::new(self.recursion_limit);
                let value = self.synthesizer.synthesize(ty, name, groups, &mut scratch);
                if value.is_object() || value.as_array().is_some_and(|a| a.iter().any(Value::is_object)) {
                    String::new()
                } else {
                    value_to_string(&value)
                }
            }
            _ => String::new(),
        };
        self.attach_enum(&mut param, ty);
        if let TypeKind::Collection(element) | TypeKind::Array(element) = &kind {
            if self.resolver.classify(element) == TypeKind::File {
                param.type_label = "file".to_string();
                param.has_items = true;
            } else {
                self.attach_enum(&mut param, element);
            }
        }
        if let Some(composite) = self.composite_of(ty) {
            let key = composite.to_string();
            match ctx.enter(&key) {
                Ok(()) => {
                    param.children = self.fields_inner(&composite, binding, groups, ctx);
                    ctx.leave();
                }
                Err(terminal) => {
                    param.value = terminal_placeholder(terminal, &composite).to_string();
                }
            }
        }
        param
    }

    fn fields(&self, ty: &TypeRef, binding: BindingKind, groups: &[String], ctx: &mut RecursionContext) -> Vec<ApiParam> {
        let key = ty.to_string();
        if ctx.enter(&key).is_err() {
            return Vec::new();
        }
        let fields = self.fields_inner(ty, binding, groups, ctx);
        ctx.leave();
        fields
    }

    fn fields_inner(&self, ty: &TypeRef, binding: BindingKind, groups: &[String], ctx: &mut RecursionContext) -> Vec<ApiParam> {
        let registry = self.resolver.registry();
        self.resolver
            .fields_of(ty)
            .into_iter()
            .filter(|f| field_in_groups(f.field, groups, registry))
            .map(|f| {
                let mut param = self.leaf(&f.name, &f.ty, binding, groups, ctx);
                if let Some(literal) = field_mock(f.field) {
                    let primitive = match self.resolver.classify(&f.ty) {
                        TypeKind::Primitive(p) => Some(p),
                        _ => None,
                    };
                    param.value = value_to_string(&parse_literal(literal, primitive));
                }
                param.required = field_required(f.field, groups, registry);
                param.desc = short_desc(f.field.comment.as_deref());
                param
            })
            .collect()
    }

    fn attach_enum(&self, param: &mut ApiParam, ty: &TypeRef) {
        if self.resolver.classify(ty) != TypeKind::Enum {
            return;
        }
        let Some(class) = self.resolver.class_of(&self.resolver.unwrap(ty)) else {
            return;
        };
        param.enum_values = self.resolver.enum_values(ty);
        param.enum_info = Some(EnumInfo {
            name: class.name.clone(),
            items: class
                .enum_constants
                .iter()
                .map(|c| EnumItem {
                    name: c.name.clone(),
                    value: c.value.clone().unwrap_or_else(|| Value::String(c.name.clone())),
                    desc: c.description.clone().unwrap_or_default(),
                })
                .collect(),
        });
    }
}
