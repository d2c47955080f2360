//! Entry point discovery: which classes are documented and which of their
//! methods make up the endpoint set.

use crate::config::PackageFilters;
use crate::framework::FrameworkTemplate;
use crate::source::{AnnotationModel, ClassModel, Documented, MethodModel};
use crate::type_resolver::{Ancestor, TypeMap, TypeRef, TypeResolver};
use log::{debug, warn};
use std::borrow::Cow;
use std::collections::HashSet;

/// A documentable class with its folder order
#[derive(Debug, Clone)]
pub struct EntryClass<'a> {
    pub class: &'a ClassModel,
    /// Explicit `@order` tag or 1-based discovery sequence
    pub order: u32,
    /// Whether `order` came from an explicit tag
    pub custom_order: bool,
}

/// A method in a class's endpoint set, paired with the class that declares it
/// and the substitution map of its origin.
///
/// `method` is owned only when annotations were inherited from an interface
/// declaration.
#[derive(Debug, Clone)]
pub struct DocMethod<'a> {
    pub method: Cow<'a, MethodModel>,
    pub declaring_class: &'a ClassModel,
    /// Empty for the class's own methods
    pub actual_types: TypeMap,
}

impl DocMethod<'_> {
    /// Name plus resolved parameter types
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .method
            .params
            .iter()
            .map(|p| TypeRef::parse(&p.type_name).substitute(&self.actual_types).to_string())
            .collect();
        format!("{}({})", self.method.name, params.join(","))
    }
}

pub struct EntryPointResolver<'a> {
    resolver: &'a TypeResolver<'a>,
    template: &'a dyn FrameworkTemplate,
    filters: &'a PackageFilters,
}

impl<'a> EntryPointResolver<'a> {
    pub fn new(resolver: &'a TypeResolver<'a>, template: &'a dyn FrameworkTemplate, filters: &'a PackageFilters) -> Self {
        Self {
            resolver,
            template,
            filters,
        }
    }

    /// Effective class annotations: the class's own, then each ancestor's,
    /// stopping at the first class that declares an entry annotation.
    /// Nearer classes come first, so their mapping shadows an ancestor's.
    pub fn class_annotations(&self, class: &'a ClassModel) -> Vec<&'a AnnotationModel> {
        let registry = self.template.registry();
        let mut annotations = Vec::new();
        let chain = self.resolver.superclass_chain(class, TypeMap::new());

        for ancestor in &chain {
            let own = &ancestor.class.annotations;
            annotations.extend(own.iter());
            if own.iter().any(|a| registry.is_entry(&a.name)) {
                break;
            }
        }
        annotations
    }

    /// Whether a class is documented
    pub fn is_entry_point(&self, class: &'a ClassModel) -> bool {
        if class.is_annotation() || class.is_enum() {
            return false;
        }
        if class.has_tag("ignore") {
            debug!("Skipping {}: @ignore", class.canonical());
            return false;
        }
        if !self.filters.accepts_class(class.canonical()) {
            debug!("Skipping {}: package filters", class.canonical());
            return false;
        }
        if class.is_interface() && self.is_implemented(class) {
            debug!("Skipping {}: documented through its implementation", class.canonical());
            return false;
        }
        let registry = self.template.registry();
        self.class_annotations(class)
            .iter()
            .any(|a| registry.is_entry(&a.name))
            || self.template.is_entry_point(class, self.resolver.model())
    }

    fn is_implemented(&self, interface: &ClassModel) -> bool {
        self.resolver.model().classes().iter().any(|class| {
            class
                .interfaces
                .iter()
                .map(|descriptor| TypeRef::parse(descriptor))
                .filter_map(|ty| self.resolver.class_of(&ty))
                .any(|implemented| implemented.canonical() == interface.canonical())
        })
    }

    /// All entry classes in discovery order
    pub fn entry_points(&self) -> Vec<EntryClass<'a>> {
        let mut discovered = 0u32;
        let mut entries = Vec::new();
        for class in self.resolver.model().classes() {
            if !self.is_entry_point(class) {
                continue;
            }
            discovered += 1;
            let explicit = class.tag_value("order").and_then(|value| match value.parse::<u32>() {
                Ok(order) => Some(order),
                Err(_) => {
                    warn!("Ignoring non-numeric @order '{}' on {}", value, class.canonical());
                    None
                }
            });
            entries.push(EntryClass {
                class,
                order: explicit.unwrap_or(discovered),
                custom_order: explicit.is_some(),
            });
        }
        debug!("Discovered {} entry classes", entries.len());
        entries
    }

    /// The endpoint method set of a class.
    ///
    /// Own methods come first, then methods inherited through the superclass
    /// chain, then default methods of implemented interfaces. A signature is
    /// kept once, from the most-derived declaration.
    pub fn methods(&self, class: &'a ClassModel) -> Vec<DocMethod<'a>> {
        let chain = self.resolver.superclass_chain(class, TypeMap::new());
        let interfaces = self.resolver.interfaces(&chain);

        let mut seen = HashSet::new();
        let mut methods = Vec::new();
        let mut push = |ancestor: &Ancestor<'a>, method: &'a MethodModel| {
            if method.is_private || method.has_tag("ignore") {
                return;
            }
            if self.filters.excludes_method(class.canonical(), &method.name) {
                debug!("Excluded {}.{}", class.canonical(), method.name);
                return;
            }
            let doc_method = DocMethod {
                method: Cow::Borrowed(method),
                declaring_class: ancestor.class,
                actual_types: ancestor.actual_types.clone(),
            };
            if seen.insert(doc_method.signature()) {
                methods.push(doc_method);
            }
        };

        for ancestor in &chain {
            for method in &ancestor.class.methods {
                push(ancestor, method);
            }
        }
        for interface in &interfaces {
            for method in interface.class.methods.iter().filter(|m| m.is_default) {
                push(interface, method);
            }
        }

        for doc_method in methods.iter_mut() {
            if self.has_mapping(&doc_method.method) {
                continue;
            }
            if let Some(declared) = self.interface_declaration(&doc_method.method, &interfaces) {
                debug!("{}.{} inherits its mapping from an interface", class.canonical(), declared.name);
                doc_method.method = Cow::Owned(inherit_annotations(&doc_method.method, declared));
            }
        }
        methods
    }

    fn has_mapping(&self, method: &MethodModel) -> bool {
        let registry = self.template.registry();
        method.annotations.iter().any(|a| registry.mapping(&a.name).is_some())
    }

    /// The mapped interface method an implementation overrides
    fn interface_declaration(&self, method: &MethodModel, interfaces: &[Ancestor<'a>]) -> Option<&'a MethodModel> {
        interfaces.iter().find_map(|interface| {
            interface
                .class
                .methods
                .iter()
                .find(|m| m.name == method.name && m.params.len() == method.params.len() && self.has_mapping(m))
        })
    }
}

/// Fill in what an implementation left to its interface declaration:
/// method and parameter annotations, comment and doc tags.
fn inherit_annotations(method: &MethodModel, declared: &MethodModel) -> MethodModel {
    let mut merged = method.clone();
    if merged.annotations.is_empty() {
        merged.annotations = declared.annotations.clone();
    } else {
        merged.annotations.extend(declared.annotations.iter().cloned());
    }
    for (param, declared_param) in merged.params.iter_mut().zip(&declared.params) {
        if param.annotations.is_empty() {
            param.annotations = declared_param.annotations.clone();
        }
    }
    if merged.comment.as_deref().is_none_or(|c| c.trim().is_empty()) {
        merged.comment = declared.comment.clone();
    }
    if merged.tags.is_empty() {
        merged.tags = declared.tags.clone();
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::spring::SpringTemplate;
    use crate::source::{ClassKind, ParamModel, SourceModel};
    use crate::taxonomy::AnnotationRegistry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn controller(name: &str) -> ClassModel {
        ClassModel::new(name).annotated(AnnotationModel::new("RestController"))
    }

    fn with_resolver<F>(model: SourceModel, filters: PackageFilters, f: F)
    where
        F: for<'m> FnOnce(&EntryPointResolver<'m>, &'m SourceModel),
    {
        let template = SpringTemplate::new();
        let registry: &AnnotationRegistry = template.registry();
        let resolver = TypeResolver::new(&model, registry);
        let entry = EntryPointResolver::new(&resolver, &template, &filters);
        f(&entry, &model);
    }

    #[test]
    fn test_entry_point_predicate() {
        let model = SourceModel::new(vec![
            controller("com.example.UserController"),
            controller("com.example.HiddenController").tagged("ignore", ""),
            controller("com.example.Status").kind(ClassKind::Enum),
            ClassModel::new("com.example.User"),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, model| {
            let names: Vec<&str> = entry.entry_points().iter().map(|e| e.class.name.as_str()).collect();
            assert_eq!(names, vec!["UserController"]);
            assert!(!entry.is_entry_point(model.class_by_name("User").unwrap()));
        });
    }

    #[test]
    fn test_entry_annotation_inherited_from_ancestor() {
        let model = SourceModel::new(vec![
            controller("com.example.BaseController"),
            ClassModel::new("com.example.OrderController").extends("com.example.BaseController"),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, model| {
            assert!(entry.is_entry_point(model.class_by_name("OrderController").unwrap()));
        });
    }

    #[test]
    fn test_ancestor_walk_continues_past_own_mapping() {
        let model = SourceModel::new(vec![
            ClassModel::new("com.example.Root").annotated(AnnotationModel::new("Deprecated")),
            controller("com.example.Base")
                .extends("com.example.Root")
                .annotated(AnnotationModel::new("RequestMapping").with("value", json!("/base"))),
            ClassModel::new("com.example.Child")
                .extends("com.example.Base")
                .annotated(AnnotationModel::new("RequestMapping").with("value", json!("/child"))),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, model| {
            let child = model.class_by_name("Child").unwrap();
            let names: Vec<&str> = entry.class_annotations(child).iter().map(|a| a.simple_name()).collect();
            assert_eq!(names, vec!["RequestMapping", "RestController", "RequestMapping"]);
            assert!(entry.is_entry_point(child));
        });
    }

    #[test]
    fn test_order_tag_and_discovery_sequence() {
        let model = SourceModel::new(vec![
            controller("com.example.A"),
            controller("com.example.B").tagged("order", "9"),
            controller("com.example.C"),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, _| {
            let orders: Vec<(u32, bool)> = entry.entry_points().iter().map(|e| (e.order, e.custom_order)).collect();
            assert_eq!(orders, vec![(1, false), (9, true), (3, false)]);
        });
    }

    #[test]
    fn test_method_set_dedups_by_signature() {
        let model = SourceModel::new(vec![
            ClassModel::new("com.example.CrudController")
                .type_params(&["T"])
                .method(MethodModel::new("get").param(ParamModel::new("id", "long")))
                .method(MethodModel::new("save").param(ParamModel::new("entity", "T")))
                .method(MethodModel {
                    is_private: true,
                    ..MethodModel::new("helper")
                }),
            controller("com.example.UserController")
                .extends("com.example.CrudController<com.example.User>")
                .method(MethodModel::new("get").param(ParamModel::new("id", "long")))
                .method(MethodModel::new("skip").tagged("ignore", "")),
            ClassModel::new("com.example.User"),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, model| {
            let class = model.class_by_name("UserController").unwrap();
            let methods = entry.methods(class);
            let summary: Vec<(String, &str)> = methods
                .iter()
                .map(|m| (m.signature(), m.declaring_class.name.as_str()))
                .collect();
            assert_eq!(
                summary,
                vec![
                    ("get(long)".to_string(), "UserController"),
                    ("save(com.example.User)".to_string(), "CrudController"),
                ]
            );
            assert_eq!(methods[1].actual_types["T"].name, "com.example.User");
        });
    }

    #[test]
    fn test_interface_default_methods_with_substitution() {
        let model = SourceModel::new(vec![
            ClassModel::new("com.example.Exporter")
                .kind(ClassKind::Interface)
                .type_params(&["E"])
                .method(MethodModel {
                    is_default: true,
                    ..MethodModel::new("export").param(ParamModel::new("filter", "E"))
                })
                .method(MethodModel::new("abstractOne")),
            controller("com.example.ReportController").implements("com.example.Exporter<com.example.Report>"),
            ClassModel::new("com.example.Report"),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, model| {
            let class = model.class_by_name("ReportController").unwrap();
            let methods = entry.methods(class);
            assert_eq!(methods.len(), 1);
            assert_eq!(methods[0].signature(), "export(com.example.Report)");
            assert_eq!(methods[0].declaring_class.name, "Exporter");
        });
    }

    #[test]
    fn test_mapping_inherited_from_interface_declaration() {
        let model = SourceModel::new(vec![
            ClassModel::new("com.example.UserApi").kind(ClassKind::Interface).method(
                MethodModel::new("get")
                    .annotated(AnnotationModel::new("GetMapping").with("value", json!("/users/{id}")))
                    .param(ParamModel::new("id", "long").annotated(AnnotationModel::new("PathVariable")))
                    .commented("Get a user"),
            ),
            controller("com.example.UserController")
                .implements("com.example.UserApi")
                .method(MethodModel::new("get").param(ParamModel::new("id", "long")))
                .method(MethodModel::new("audit")),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, model| {
            let class = model.class_by_name("UserController").unwrap();
            let methods = entry.methods(class);
            assert_eq!(methods.len(), 2);

            let get = &methods[0];
            assert!(matches!(get.method, Cow::Owned(_)));
            assert_eq!(get.declaring_class.name, "UserController");
            assert_eq!(get.method.annotations[0].simple_name(), "GetMapping");
            assert_eq!(get.method.params[0].annotations[0].simple_name(), "PathVariable");
            assert_eq!(get.method.comment.as_deref(), Some("Get a user"));

            assert!(matches!(methods[1].method, Cow::Borrowed(_)));
        });
    }

    #[test]
    fn test_implemented_interface_is_not_an_entry_point() {
        let model = SourceModel::new(vec![
            controller("com.example.OrderApi").kind(ClassKind::Interface),
            controller("com.example.ClientApi").kind(ClassKind::Interface),
            ClassModel::new("com.example.OrderController").implements("com.example.OrderApi"),
        ]);

        with_resolver(model, PackageFilters::default(), |entry, _| {
            let names: Vec<&str> = entry.entry_points().iter().map(|e| e.class.name.as_str()).collect();
            assert_eq!(names, vec!["ClientApi"]);
        });
    }
}
