use crate::framework::{class_base_path, FrameworkTemplate};
use crate::source::{AnnotationModel, ClassModel, SourceModel};
use crate::taxonomy::{AnnotationRegistry, AnnotationTaxonomy};
use log::debug;

/// JAX-RS template.
///
/// Resources are often split into an annotated interface and a plain
/// implementation class. The implementation is an entry point when one of
/// its interfaces carries `@Path`, and it inherits that base path.
pub struct JaxRsTemplate {
    registry: AnnotationRegistry,
}

impl JaxRsTemplate {
    pub fn new() -> Self {
        Self {
            registry: AnnotationRegistry::new(AnnotationTaxonomy::jaxrs()),
        }
    }

    fn annotated_interface<'a>(&self, class: &ClassModel, model: &'a SourceModel) -> Option<&'a ClassModel> {
        class.interfaces.iter().find_map(|descriptor| {
            let name = descriptor.split('<').next().unwrap_or(descriptor).trim();
            let interface = model.class_by_name(name)?;
            interface
                .annotations
                .iter()
                .any(|a| self.registry.is_entry(&a.name))
                .then_some(interface)
        })
    }
}

impl Default for JaxRsTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkTemplate for JaxRsTemplate {
    fn name(&self) -> &str {
        "jaxrs"
    }

    fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    fn is_entry_point(&self, class: &ClassModel, model: &SourceModel) -> bool {
        let accepted = self.annotated_interface(class, model).is_some();
        if accepted {
            debug!("{} is a resource through its @Path interface", class.canonical());
        }
        accepted
    }

    fn base_path(&self, class: &ClassModel, annotations: &[AnnotationModel], model: &SourceModel) -> String {
        let own = class_base_path(&self.registry, annotations);
        if !own.is_empty() {
            return own;
        }
        self.annotated_interface(class, model)
            .map(|interface| class_base_path(&self.registry, &interface.annotations))
            .unwrap_or_default()
    }
}
